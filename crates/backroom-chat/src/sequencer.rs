//! Conversation sequencer: transcript, greeting delivery, replies, reveal.
//!
//! The sequencer owns every timer of a session. Greeting lines are
//! scheduled as `(offset, message)` pairs from one anchor instant, replies
//! after a randomised thinking delay, and reveal ticks one interval apart.
//! Ending a session cancels all of them at once.

use rand::Rng;
use tokio::time::Instant;

use backroom_core::config::ChatConfig;
use backroom_core::types::StatisticsSnapshot;

use crate::classifier::IntentClassifier;
use crate::error::ChatError;
use crate::reveal::{Reveal, RevealStep};
use crate::script::{GreetingScript, GREETING_LEN};
use crate::state::{ConversationState, StateMachine};
use crate::timer::{TimerId, Timers};
use crate::types::{Message, SessionState, Transcript};

/// Payload of a scheduled timer.
#[derive(Debug)]
enum ConversationEvent {
    /// Append a pre-rendered greeting line.
    Greeting(String),
    ShowSuggestions,
    /// Answer this user input.
    Reply(String),
    RevealTick,
}

/// What changed after a timer fired. Hosts re-render on each update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationUpdate {
    /// An assistant message was appended at `index` and is now revealing.
    MessageAppended { index: usize },
    /// Suggested actions became visible.
    SuggestionsShown,
    /// One more character of message `index` is visible.
    RevealFrame { index: usize, visible: String },
    /// Message `index` is fully revealed.
    RevealComplete { index: usize },
}

#[derive(Debug)]
struct ActiveReveal {
    index: usize,
    reveal: Reveal,
}

/// Scripted conversation for one widget.
///
/// Must be used from within a tokio runtime: scheduling spawns timer tasks.
#[derive(Debug)]
pub struct Conversation {
    config: ChatConfig,
    classifier: IntentClassifier,
    script: GreetingScript,
    stats: StatisticsSnapshot,
    transcript: Transcript,
    session: SessionState,
    machine: StateMachine,
    timers: Timers<ConversationEvent>,
    suggestions_timer: Option<TimerId>,
    reveal: Option<ActiveReveal>,
    reveal_timer: Option<TimerId>,
    pending_replies: usize,
}

impl Conversation {
    /// Create an idle conversation. Fails if the timing config is unusable.
    pub fn new(config: ChatConfig, stats: StatisticsSnapshot) -> Result<Self, ChatError> {
        config.validate()?;
        Ok(Self {
            classifier: IntentClassifier::new(config.currency.clone()),
            script: GreetingScript::new(config.currency.clone()),
            config,
            stats,
            transcript: Transcript::new(),
            session: SessionState::default(),
            machine: StateMachine::new(),
            timers: Timers::new(),
            suggestions_timer: None,
            reveal: None,
            reveal_timer: None,
            pending_replies: 0,
        })
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn state(&self) -> ConversationState {
        self.machine.current()
    }

    pub fn stats(&self) -> &StatisticsSnapshot {
        &self.stats
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// The fixed suggested-action phrases.
    pub fn suggestions(&self) -> &'static [&'static str] {
        self.script.suggestions()
    }

    /// Message currently being revealed and its visible prefix.
    pub fn revealing(&self) -> Option<(usize, &str)> {
        self.reveal
            .as_ref()
            .filter(|r| r.reveal.is_active())
            .map(|r| (r.index, r.reveal.visible()))
    }

    /// Text to render for message `index`: the reveal prefix for the message
    /// being revealed, the full content for everything else.
    pub fn visible_text(&self, index: usize) -> Option<&str> {
        if let Some((revealing, prefix)) = self.revealing() {
            if revealing == index {
                return Some(prefix);
            }
        }
        self.transcript.messages().get(index).map(|m| m.content())
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Replace the statistics snapshot. Used by replies scheduled from now on
    /// and by replies still thinking; an in-flight greeting keeps the figures
    /// it started with.
    pub fn update_stats(&mut self, stats: StatisticsSnapshot) {
        self.stats = stats;
    }

    // -----------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------

    /// Begin a visible session: reset the transcript and schedule the greeting.
    pub fn start_session(&mut self) -> Result<(), ChatError> {
        self.machine.transition(ConversationState::Greeting)?;
        self.transcript.clear();
        self.session = SessionState {
            initialized: true,
            ..SessionState::default()
        };

        let unit = self.config.greeting_delay();
        let anchor = Instant::now();
        let mut offset = anchor;
        for line in self.script.render(&self.stats) {
            offset += unit;
            self.timers
                .schedule_at(offset, ConversationEvent::Greeting(line));
        }
        let suggestions_at = offset + self.config.suggestions_delay();
        self.suggestions_timer = Some(
            self.timers
                .schedule_at(suggestions_at, ConversationEvent::ShowSuggestions),
        );

        tracing::info!(
            greeting_messages = GREETING_LEN,
            suggestions_after_ms = (suggestions_at - anchor).as_millis() as u64,
            "Chat session started"
        );
        Ok(())
    }

    /// End the session: cancel every timer and clear all session state.
    pub fn end_session(&mut self) {
        self.timers.cancel_all();
        self.suggestions_timer = None;
        self.reveal_timer = None;
        if let Some(mut active) = self.reveal.take() {
            active.reveal.teardown();
        }
        self.pending_replies = 0;
        let discarded = self.transcript.len();
        self.transcript.clear();
        self.session = SessionState::default();
        self.machine.reset();
        tracing::info!(discarded_messages = discarded, "Chat session ended");
    }

    // -----------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------

    /// Submit user text. Empty or whitespace-only input, or input while the
    /// conversation is idle, is ignored and returns `false`.
    pub fn send(&mut self, text: &str) -> Result<bool, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        match self.machine.current() {
            ConversationState::Idle => {
                tracing::debug!("Ignoring chat input while idle");
                return Ok(false);
            }
            ConversationState::Greeting => {
                // The user spoke first; remaining greeting lines still arrive
                // but the suggestions never pop up over the conversation.
                if let Some(id) = self.suggestions_timer.take() {
                    self.timers.cancel(id);
                }
                self.machine.transition(ConversationState::AwaitingInput)?;
            }
            ConversationState::AwaitingInput | ConversationState::AssistantThinking => {}
        }

        self.transcript.push(Message::user(text));
        self.session.suggestions_visible = false;
        self.session.typing_indicator_active = true;
        if self.machine.current() == ConversationState::AwaitingInput {
            self.machine
                .transition(ConversationState::AssistantThinking)?;
        }

        let delay = self.thinking_delay();
        self.pending_replies += 1;
        self.timers
            .schedule_after(delay, ConversationEvent::Reply(text.to_string()));
        tracing::debug!(
            delay_ms = delay.as_millis() as u64,
            pending = self.pending_replies,
            "Reply scheduled"
        );
        Ok(true)
    }

    /// Submit the suggested action at `index` as if it had been typed.
    pub fn choose_suggestion(&mut self, index: usize) -> Result<bool, ChatError> {
        match self.suggestions().get(index) {
            Some(text) => self.send(text),
            None => Ok(false),
        }
    }

    // -----------------------------------------------------------------
    // Timer processing
    // -----------------------------------------------------------------

    /// Wait for the next timer and apply it.
    ///
    /// Returns `Ok(None)` once nothing is scheduled. Cancel-safe: dropping
    /// the future before it completes loses nothing.
    pub async fn step(&mut self) -> Result<Option<ConversationUpdate>, ChatError> {
        while let Some(event) = self.timers.next().await {
            if let Some(update) = self.apply(event)? {
                return Ok(Some(update));
            }
        }
        Ok(None)
    }

    fn apply(&mut self, event: ConversationEvent) -> Result<Option<ConversationUpdate>, ChatError> {
        match event {
            ConversationEvent::Greeting(line) => {
                let index = self.append_assistant(line);
                Ok(Some(ConversationUpdate::MessageAppended { index }))
            }
            ConversationEvent::ShowSuggestions => {
                self.suggestions_timer = None;
                self.machine.transition(ConversationState::AwaitingInput)?;
                self.session.suggestions_visible = true;
                Ok(Some(ConversationUpdate::SuggestionsShown))
            }
            ConversationEvent::Reply(input) => {
                let reply = self.classifier.classify(&input, &self.stats);
                let index = self.append_assistant(reply);
                self.pending_replies = self.pending_replies.saturating_sub(1);
                if self.pending_replies == 0 {
                    self.session.typing_indicator_active = false;
                    self.machine.transition(ConversationState::AwaitingInput)?;
                }
                Ok(Some(ConversationUpdate::MessageAppended { index }))
            }
            ConversationEvent::RevealTick => {
                self.reveal_timer = None;
                Ok(self.tick_reveal())
            }
        }
    }

    /// Append an assistant message and make it the reveal target.
    fn append_assistant(&mut self, content: String) -> usize {
        let index = self.transcript.push(Message::assistant(content.as_str()));

        if let Some(id) = self.reveal_timer.take() {
            self.timers.cancel(id);
        }
        match self.reveal.as_mut() {
            Some(active) => {
                active.reveal.teardown();
                active.reveal.restart(&content);
                active.index = index;
            }
            None => {
                self.reveal = Some(ActiveReveal {
                    index,
                    reveal: Reveal::new(content.as_str(), self.config.reveal_interval()),
                });
            }
        }

        // Empty text completes on the very next tick.
        let delay = if content.is_empty() {
            std::time::Duration::ZERO
        } else {
            self.config.reveal_interval()
        };
        self.reveal_timer = Some(
            self.timers
                .schedule_after(delay, ConversationEvent::RevealTick),
        );
        index
    }

    fn tick_reveal(&mut self) -> Option<ConversationUpdate> {
        let active = self.reveal.as_mut()?;
        let index = active.index;
        let interval = active.reveal.interval();
        let update = match active.reveal.advance() {
            RevealStep::Frame(prefix) => ConversationUpdate::RevealFrame {
                index,
                visible: prefix.to_string(),
            },
            RevealStep::Complete => return Some(ConversationUpdate::RevealComplete { index }),
            RevealStep::Finished => return None,
        };
        self.reveal_timer = Some(
            self.timers
                .schedule_after(interval, ConversationEvent::RevealTick),
        );
        Some(update)
    }

    fn thinking_delay(&self) -> std::time::Duration {
        let ms = rand::rng().random_range(
            self.config.thinking_delay_min_ms..=self.config.thinking_delay_max_ms,
        );
        std::time::Duration::from_millis(ms)
    }
}
