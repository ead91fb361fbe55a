//! Sends one user turn through the active session.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::api::connectivity::ConnectivityProbe;
use crate::api::{MessagePayload, Part, ProviderError};
use crate::core::history::strip_data_uri_prefix;
use crate::core::policy::EMPTY_REPLY_TEXT;
use crate::core::session::SessionManager;

/// Failure of a single turn. None of these are retried.
#[derive(Debug)]
pub enum DispatchError {
    /// The network was reported unreachable before the provider was called.
    NoConnection,

    /// No session exists to send through.
    NotInitialized,

    /// The provider could not be reached during the call.
    NetworkUnreachable(ProviderError),

    /// The provider rejected or failed the request.
    Provider(ProviderError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NoConnection => {
                write!(f, "No internet connection. Please check your network settings.")
            }
            DispatchError::NotInitialized => write!(f, "Gemini session not initialized."),
            DispatchError::NetworkUnreachable(_) => write!(
                f,
                "Network error: Unable to reach Gemini servers. Please check your internet connection."
            ),
            DispatchError::Provider(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::NetworkUnreachable(err) | DispatchError::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProviderError> for DispatchError {
    fn from(err: ProviderError) -> Self {
        if err.is_network_failure() {
            DispatchError::NetworkUnreachable(err)
        } else {
            DispatchError::Provider(err)
        }
    }
}

/// Builds the outgoing payload: bare text, or `[image, text]` when an image
/// is attached.
pub fn build_payload(text: &str, image: Option<&str>) -> MessagePayload {
    match image {
        None => MessagePayload::Text(text.to_string()),
        Some(image) => MessagePayload::Parts(vec![
            Part::inline_image(strip_data_uri_prefix(image)),
            Part::text(text),
        ]),
    }
}

pub struct MessageDispatcher {
    connectivity: Arc<dyn ConnectivityProbe>,
}

impl MessageDispatcher {
    pub fn new(connectivity: Arc<dyn ConnectivityProbe>) -> Self {
        Self { connectivity }
    }

    /// Sends `text` (and optionally an image data URI) and returns the reply
    /// text, substituting a fallback when the provider returns nothing.
    pub async fn send(
        &self,
        sessions: &mut SessionManager,
        text: &str,
        image: Option<&str>,
    ) -> Result<String, DispatchError> {
        if !self.connectivity.is_online().await {
            warn!("connectivity probe reports offline; turn not dispatched");
            return Err(DispatchError::NoConnection);
        }

        let session = sessions
            .session_mut()
            .ok_or(DispatchError::NotInitialized)?;

        info!(with_image = image.is_some(), "dispatching turn");
        match session.send_message(build_payload(text, image)).await {
            Ok(reply) => Ok(reply
                .text
                .unwrap_or_else(|| EMPTY_REPLY_TEXT.to_string())),
            Err(err) => {
                warn!(error = %err, "Gemini API error");
                Err(DispatchError::from(err))
            }
        }
    }
}
