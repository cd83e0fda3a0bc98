//! Error types for the conversation engine.

use backroom_core::error::BackroomError;

use crate::state::ConversationState;

/// Errors from the conversation engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("invalid conversation transition: {from} -> {to}")]
    InvalidTransition {
        from: ConversationState,
        to: ConversationState,
    },
    #[error("config error: {0}")]
    Config(String),
}

impl From<BackroomError> for ChatError {
    fn from(err: BackroomError) -> Self {
        ChatError::Config(err.to_string())
    }
}
