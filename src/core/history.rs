//! Rebuilds provider history from the transcript.

use crate::api::{Content, Part};
use crate::core::message::Message;

/// Strips a `data:<mime>;base64,` header, leaving only the payload.
///
/// Input without a comma is returned unchanged.
pub fn strip_data_uri_prefix(data: &str) -> &str {
    match data.split_once(',') {
        Some((_, payload)) if !payload.is_empty() => payload,
        _ => data,
    }
}

/// Converts the transcript into provider exchanges, one per retained message.
///
/// Error bubbles and the welcome greeting are dropped; everything else is
/// kept in order, including messages with empty text.
pub fn format_history(messages: &[Message]) -> Vec<Content> {
    messages
        .iter()
        .filter(|message| !message.is_error && !message.is_welcome())
        .map(to_content)
        .collect()
}

fn to_content(message: &Message) -> Content {
    let mut parts = Vec::new();
    if let Some(image) = &message.image {
        parts.push(Part::inline_image(strip_data_uri_prefix(image)));
    }
    if !message.content.is_empty() {
        parts.push(Part::text(message.content.clone()));
    }
    Content::new(message.role.as_str(), parts)
}
