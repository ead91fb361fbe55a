//! The message composer: a text area plus at most one attached image.

use std::path::{Path, PathBuf};

use ratatui::style::Style;
use tui_textarea::{CursorMove, TextArea};

use crate::ui::theme::Theme;
use crate::utils::image::{data_uri_decoded_len, data_uri_mime, file_to_data_uri, AttachmentError};

const TEXT_PLACEHOLDER: &str = "Paste your math problem or ask a question...";
const IMAGE_PLACEHOLDER: &str = "Add a specific question about this image...";

/// An image waiting to be sent with the next message.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub path: PathBuf,
    pub data_uri: String,
}

impl Attachment {
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        Ok(Self {
            path: path.to_path_buf(),
            data_uri: file_to_data_uri(path)?,
        })
    }

    pub fn mime_type(&self) -> &str {
        data_uri_mime(&self.data_uri).unwrap_or("image")
    }

    pub fn size_kb(&self) -> usize {
        data_uri_decoded_len(&self.data_uri).div_ceil(1024)
    }
}

pub struct Composer {
    textarea: TextArea<'static>,
    attachment: Option<Attachment>,
    theme: Theme,
}

impl Composer {
    pub fn new(theme: &Theme) -> Self {
        let mut composer = Self {
            textarea: TextArea::default(),
            attachment: None,
            theme: theme.clone(),
        };
        composer.configure_textarea();
        composer
    }

    /// Applies theme styles and the placeholder matching the attachment state.
    fn configure_textarea(&mut self) {
        let theme = &self.theme;
        self.textarea.set_style(
            theme
                .input_text_style
                .patch(Style::default().bg(theme.background_color)),
        );
        self.textarea.set_cursor_style(theme.input_cursor_style);
        self.textarea
            .set_cursor_line_style(theme.input_cursor_line_style);
        self.textarea
            .set_placeholder_style(theme.input_disabled_style);
        self.refresh_placeholder();
    }

    fn refresh_placeholder(&mut self) {
        let placeholder = if self.attachment.is_some() {
            IMAGE_PLACEHOLDER
        } else {
            TEXT_PLACEHOLDER
        };
        self.textarea.set_placeholder_text(placeholder);
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(|line| line.is_empty())
    }

    /// Replaces the text and leaves the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        let lines: Vec<String> = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').map(|s| s.to_string()).collect()
        };
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
        self.configure_textarea();
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Replaces any previous attachment; only one image per message.
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
        self.refresh_placeholder();
    }

    pub fn detach(&mut self) -> Option<Attachment> {
        let removed = self.attachment.take();
        self.refresh_placeholder();
        removed
    }

    pub fn can_submit(&self, busy: bool) -> bool {
        !busy && (!self.text().trim().is_empty() || self.attachment.is_some())
    }

    /// Takes the text exactly as typed plus the image data URI, leaving the
    /// composer empty.
    ///
    /// Returns `None` while a reply is pending or when there is nothing to
    /// send. Whitespace only decides whether there is anything to send.
    pub fn submit(&mut self, busy: bool) -> Option<(String, Option<String>)> {
        if !self.can_submit(busy) {
            return None;
        }
        let text = self.text();
        let image = self.attachment.take().map(|a| a.data_uri);
        self.clear();
        Some((text, image))
    }
}
