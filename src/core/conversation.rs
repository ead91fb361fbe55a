//! The transcript and its busy flag.

use tracing::debug;

use crate::api::Content;
use crate::core::dispatcher::DispatchError;
use crate::core::history::format_history;
use crate::core::message::{Message, MessageIdGenerator};

/// Ordered, append-only transcript plus the in-flight flag.
///
/// The store does not refuse a second `begin_turn` while busy; the composer
/// is disabled instead.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    busy: bool,
    ids: MessageIdGenerator,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::welcome()],
            busy: false,
            ids: MessageIdGenerator::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }

    /// Provider history for everything recorded so far.
    pub fn history(&self) -> Vec<Content> {
        format_history(&self.messages)
    }

    /// Records a user turn and marks the conversation busy.
    ///
    /// Returns the history as it stood before this turn; the new turn itself
    /// is carried by the dispatched payload.
    pub fn begin_turn(&mut self, message: Message) -> Vec<Content> {
        let history = self.history();
        debug!(id = %message.id, history_len = history.len(), "turn started");
        self.messages.push(message);
        self.busy = true;
        history
    }

    /// Records how a turn ended and clears the busy flag.
    pub fn settle_turn(&mut self, outcome: Result<String, DispatchError>) -> &Message {
        let id = self.next_id();
        let message = match outcome {
            Ok(text) => Message::model(id, text),
            Err(err) => {
                debug!(error = %err, "turn failed");
                Message::error(id)
            }
        };
        self.messages.push(message);
        self.busy = false;
        &self.messages[self.messages.len() - 1]
    }
}
