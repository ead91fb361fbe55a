//! Owns the single live provider session.

use std::sync::Arc;

use tracing::debug;

use crate::api::{ChatSession, Content, ProviderConnector, SessionConfig};
use crate::core::policy::{SYSTEM_INSTRUCTION, TEMPERATURE};

/// Holds at most one [`ChatSession`] and replaces it wholesale.
///
/// A new session is built from the latest credential and a history rebuilt
/// from the transcript before every send, so the policy instruction and
/// temperature can never be lost to a stale handle.
pub struct SessionManager {
    connector: Arc<dyn ProviderConnector>,
    model: String,
    session: Option<ChatSession>,
}

impl SessionManager {
    pub fn new(connector: Arc<dyn ProviderConnector>, model: impl Into<String>) -> Self {
        Self {
            connector,
            model: model.into(),
            session: None,
        }
    }

    pub fn session_config() -> SessionConfig {
        SessionConfig {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            temperature: TEMPERATURE,
        }
    }

    /// Discards any existing session and starts a fresh one. Last call wins.
    pub fn initialize_session(&mut self, credential: &str, history: Vec<Content>) {
        debug!(
            model = %self.model,
            history_len = history.len(),
            replacing = self.session.is_some(),
            "initializing chat session"
        );
        let client = self.connector.connect(credential);
        self.session = Some(ChatSession::new(
            client,
            self.model.clone(),
            Self::session_config(),
            history,
        ));
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_mut(&mut self) -> Option<&mut ChatSession> {
        self.session.as_mut()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn clear(&mut self) {
        self.session = None;
    }
}
