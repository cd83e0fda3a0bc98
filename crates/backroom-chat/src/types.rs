//! Transcript and session types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Who produced a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// A single chat message. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Message {
    id: Uuid,
    origin: Sender,
    content: String,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(origin: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, content)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn origin(&self) -> Sender {
        self.origin
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered, append-only list of messages for one visible session.
///
/// Only the conversation sequencer appends to or clears a transcript.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a message and return its index.
    pub(crate) fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Rendering affordances for the current session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// The greeting has been started for this visible session.
    pub initialized: bool,
    /// At least one assistant reply is pending.
    pub typing_indicator_active: bool,
    /// Suggested-action shortcuts are on screen.
    pub suggestions_visible: bool,
}
