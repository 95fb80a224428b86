use crate::attachment::Attachment;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message of the conversation. Never mutated once created.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub attachments: Vec<Attachment>,
    /// Local time of creation, display only
    pub created_at: DateTime<Local>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            role,
            text: text.into(),
            attachments,
            created_at: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self::new(Role::User, text, attachments)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text, Vec::new())
    }
}

/// Append-only transcript of the session.
#[derive(Debug, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn all(&self) -> &[Turn] {
        &self.turns
    }
}
