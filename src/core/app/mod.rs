//! Application state shared by the renderer, the key handlers and the
//! command registry.

use std::path::Path;

use ratatui::style::Style;
use tracing::{debug, warn};
use tui_textarea::TextArea;

use crate::auth::{validate_key, AuthError};
use crate::core::config::data::{path_display, Config};
use crate::core::conversation::Conversation;
use crate::core::message::Message;
use crate::core::tutor::{TurnOutcome, TurnRequest};
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

pub mod composer;

#[cfg(test)]
mod tests;

pub use composer::{Attachment, Composer};

pub const NO_CREDENTIAL_STATUS: &str = "Please select an API key first.";

/// Which screen the terminal shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// No credential yet; only the key form is usable.
    KeyEntry,

    /// Normal conversation view.
    Chat,
}

pub struct App {
    pub conversation: Conversation,
    pub composer: Composer,
    pub key_input: TextArea<'static>,
    credential: Option<String>,
    pub model: String,
    pub theme: Theme,
    pub status: Option<String>,
    /// Rows scrolled up from the newest message; 0 follows new output.
    pub scroll_from_bottom: u16,
    pub exit_requested: bool,
    pub logging: LoggingState,
}

fn key_textarea(theme: &Theme) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_mask_char('•');
    textarea.set_style(
        theme
            .input_text_style
            .patch(Style::default().bg(theme.background_color)),
    );
    textarea.set_cursor_style(theme.input_cursor_style);
    textarea.set_cursor_line_style(theme.input_cursor_line_style);
    textarea.set_placeholder_text("Paste your Gemini API key");
    textarea
}

impl App {
    pub fn new(config: &Config, credential: Option<String>, theme: Theme) -> Self {
        Self {
            conversation: Conversation::new(),
            composer: Composer::new(&theme),
            key_input: key_textarea(&theme),
            credential,
            model: config.model_or_default(),
            theme,
            status: None,
            scroll_from_bottom: 0,
            exit_requested: false,
            logging: LoggingState::disabled(),
        }
    }

    pub fn mode(&self) -> AppMode {
        if self.credential.is_some() {
            AppMode::Chat
        } else {
            AppMode::KeyEntry
        }
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn set_credential(&mut self, credential: Option<String>) {
        self.credential = credential;
    }

    pub fn is_busy(&self) -> bool {
        self.conversation.is_busy()
    }

    /// The composer accepts keys only in chat mode with no reply pending.
    pub fn input_enabled(&self) -> bool {
        self.mode() == AppMode::Chat && !self.is_busy()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Takes the composer contents and records a user turn.
    ///
    /// Without a credential nothing changes except the status line. While
    /// busy, or with nothing to send, returns `None` and leaves the composer
    /// untouched.
    pub fn submit(&mut self) -> Option<TurnRequest> {
        let Some(credential) = self.credential.clone() else {
            self.set_status(NO_CREDENTIAL_STATUS);
            return None;
        };

        let (text, image) = self.composer.submit(self.is_busy())?;
        let request = TurnRequest::start(&mut self.conversation, credential, &text, image);
        if let Some(message) = self.conversation.messages().last() {
            self.log_entry(message);
        }
        self.clear_status();
        self.scroll_to_bottom();
        Some(request)
    }

    /// Records the reply or error bubble for a finished turn.
    pub fn settle(&mut self, outcome: TurnOutcome) {
        debug!(turn_id = %outcome.turn_id, "settling turn");
        let message = self.conversation.settle_turn(outcome.result).clone();
        self.log_entry(&message);
        self.scroll_to_bottom();
    }

    fn log_entry(&self, message: &Message) {
        if let Err(err) = self.logging.log_entry(message) {
            warn!(error = %err, "failed to write transcript log");
        }
    }

    /// Accepts the key typed on the key screen and switches to chat mode.
    pub fn submit_key(&mut self) -> Result<String, AuthError> {
        let key = validate_key(&self.key_input.lines().join(""))?;
        self.key_input = key_textarea(&self.theme);
        self.credential = Some(key.clone());
        self.clear_status();
        Ok(key)
    }

    pub fn attach_image(&mut self, path: &Path) {
        match Attachment::from_path(path) {
            Ok(attachment) => {
                let status = format!(
                    "Attached {} ({}, {} KB)",
                    path_display(&attachment.path),
                    attachment.mime_type(),
                    attachment.size_kb()
                );
                self.composer.attach(attachment);
                self.set_status(status);
            }
            Err(err) => self.set_status(err.to_string()),
        }
    }

    pub fn detach_image(&mut self) {
        match self.composer.detach() {
            Some(attachment) => {
                self.set_status(format!("Removed {}", path_display(&attachment.path)))
            }
            None => self.set_status("No image attached"),
        }
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(rows);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }

    /// Top row to render for a transcript that can scroll `max_offset` rows.
    /// Clamps the stored position so later scroll-downs respond at once.
    pub fn clamp_scroll(&mut self, max_offset: u16) -> u16 {
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_offset);
        max_offset - self.scroll_from_bottom
    }
}
