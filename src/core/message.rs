use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::policy::{ERROR_REPLY_TEXT, WELCOME_TEXT};

/// Reserved id of the greeting shown at conversation start.
pub const WELCOME_ID: &str = "welcome";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Role name understood by the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transcript entry. Messages are never edited after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Inline image as a `data:` URI.
    pub image: Option<String>,
    pub is_error: bool,
}

impl Message {
    pub fn welcome() -> Self {
        Self {
            id: WELCOME_ID.to_string(),
            role: Role::Model,
            content: WELCOME_TEXT.to_string(),
            image: None,
            is_error: false,
        }
    }

    pub fn user(id: impl Into<String>, content: impl Into<String>, image: Option<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: content.into(),
            image,
            is_error: false,
        }
    }

    pub fn model(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Model,
            content: content.into(),
            image: None,
            is_error: false,
        }
    }

    /// Apology bubble standing in for a failed turn.
    pub fn error(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Model,
            content: ERROR_REPLY_TEXT.to_string(),
            image: None,
            is_error: true,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_welcome(&self) -> bool {
        self.id == WELCOME_ID
    }
}

/// Hands out ids that are unique for the life of the process.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    sequence: AtomicU64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", Utc::now().timestamp_millis(), seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique_and_never_welcome() {
        let ids = MessageIdGenerator::new();
        let generated: HashSet<String> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 100);
        assert!(!generated.contains(WELCOME_ID));
    }

    #[test]
    fn error_messages_are_model_role_and_flagged() {
        let message = Message::error("7");
        assert_eq!(message.role, Role::Model);
        assert!(message.is_error);
        assert_eq!(message.content, ERROR_REPLY_TEXT);
    }

    #[test]
    fn roles_serialize_as_provider_names() {
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        assert_eq!(Role::User.to_string(), "user");
    }
}
