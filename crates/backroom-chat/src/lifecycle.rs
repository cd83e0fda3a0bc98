//! Visibility-driven lifecycle of the chat widget.
//!
//! The hosting page owns the visibility flag. [`ChatWidget`] watches its
//! edges: showing the widget starts one greeting per visible session, hiding
//! it discards the session. Nothing survives a hide.

use backroom_core::config::ChatConfig;
use backroom_core::types::StatisticsSnapshot;

use crate::error::ChatError;
use crate::sequencer::{Conversation, ConversationUpdate};

/// Sink invoked when the user asks to dismiss the widget.
pub type CloseFn = Box<dyn FnMut() + Send>;

/// A conversation bound to the host's visibility flag.
pub struct ChatWidget {
    visible: bool,
    conversation: Conversation,
    on_close: Option<CloseFn>,
}

impl std::fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatWidget")
            .field("visible", &self.visible)
            .field("conversation", &self.conversation)
            .field("has_close_handler", &self.on_close.is_some())
            .finish()
    }
}

impl ChatWidget {
    /// Create a hidden widget.
    pub fn new(config: ChatConfig, stats: StatisticsSnapshot) -> Result<Self, ChatError> {
        Ok(Self {
            visible: false,
            conversation: Conversation::new(config, stats)?,
            on_close: None,
        })
    }

    /// Register the sink called by [`ChatWidget::request_close`].
    pub fn with_close_handler(mut self, on_close: impl FnMut() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(on_close));
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Observe the host's visibility flag. Only edges do anything.
    pub fn set_visible(&mut self, visible: bool) -> Result<(), ChatError> {
        if visible == self.visible {
            return Ok(());
        }
        self.visible = visible;
        if visible {
            if !self.conversation.session().initialized {
                self.conversation.start_session()?;
            }
        } else {
            self.conversation.end_session();
        }
        Ok(())
    }

    /// Ask the host to hide the widget. The host answers with `set_visible(false)`.
    pub fn request_close(&mut self) {
        match self.on_close.as_mut() {
            Some(on_close) => on_close(),
            None => tracing::debug!("Close requested with no handler registered"),
        }
    }

    /// Refresh the statistics snapshot, typically once per host render.
    pub fn update_stats(&mut self, stats: StatisticsSnapshot) {
        self.conversation.update_stats(stats);
    }

    /// Submit typed text. Ignored while hidden.
    pub fn send(&mut self, text: &str) -> Result<bool, ChatError> {
        if !self.visible {
            return Ok(false);
        }
        self.conversation.send(text)
    }

    /// Submit a suggested action by position. Ignored while hidden.
    pub fn choose_suggestion(&mut self, index: usize) -> Result<bool, ChatError> {
        if !self.visible {
            return Ok(false);
        }
        self.conversation.choose_suggestion(index)
    }

    pub fn has_pending_timers(&self) -> bool {
        self.conversation.has_pending_timers()
    }

    /// Wait for the next scheduled change. See [`Conversation::step`].
    pub async fn step(&mut self) -> Result<Option<ConversationUpdate>, ChatError> {
        self.conversation.step().await
    }
}
