//! Conversation state machine with validated transitions.
//!
//! - Idle -> Greeting (widget shown, greeting scheduled)
//! - Greeting -> AwaitingInput (suggestions shown, or the user spoke first)
//! - AwaitingInput -> AssistantThinking (user message accepted)
//! - AssistantThinking -> AwaitingInput (reply appended)
//! - any non-Idle state -> Idle (widget hidden)

use std::fmt;

use crate::error::ChatError;

/// Phase of the scripted conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConversationState {
    /// Widget hidden; nothing scheduled.
    #[default]
    Idle,
    /// Greeting script is being delivered.
    Greeting,
    /// Waiting for the user to type or pick a suggestion.
    AwaitingInput,
    /// A reply is scheduled and the typing indicator is on.
    AssistantThinking,
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationState::Idle => write!(f, "Idle"),
            ConversationState::Greeting => write!(f, "Greeting"),
            ConversationState::AwaitingInput => write!(f, "AwaitingInput"),
            ConversationState::AssistantThinking => write!(f, "AssistantThinking"),
        }
    }
}

impl ConversationState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &ConversationState) -> bool {
        matches!(
            (self, target),
            (ConversationState::Idle, ConversationState::Greeting)
                | (ConversationState::Greeting, ConversationState::AwaitingInput)
                | (ConversationState::AwaitingInput, ConversationState::AssistantThinking)
                | (ConversationState::AssistantThinking, ConversationState::AwaitingInput)
                // Session end
                | (ConversationState::Greeting, ConversationState::Idle)
                | (ConversationState::AwaitingInput, ConversationState::Idle)
                | (ConversationState::AssistantThinking, ConversationState::Idle)
        )
    }
}

/// Owner of the current [`ConversationState`].
///
/// All transitions are validated before being applied.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    state: ConversationState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ConversationState {
        self.state
    }

    /// Attempt to transition to the target state.
    pub fn transition(&mut self, target: ConversationState) -> Result<(), ChatError> {
        if self.state.can_transition_to(&target) {
            tracing::debug!("Conversation state: {} -> {}", self.state, target);
            self.state = target;
            Ok(())
        } else {
            Err(ChatError::InvalidTransition {
                from: self.state,
                to: target,
            })
        }
    }

    /// Force the machine back to Idle from wherever it is.
    pub fn reset(&mut self) {
        if self.state != ConversationState::Idle {
            tracing::debug!("Conversation state reset to Idle from {}", self.state);
        }
        self.state = ConversationState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(ConversationState::Idle.to_string(), "Idle");
        assert_eq!(ConversationState::Greeting.to_string(), "Greeting");
        assert_eq!(ConversationState::AwaitingInput.to_string(), "AwaitingInput");
        assert_eq!(
            ConversationState::AssistantThinking.to_string(),
            "AssistantThinking"
        );
    }

    #[test]
    fn test_valid_transitions() {
        use ConversationState::*;
        assert!(Idle.can_transition_to(&Greeting));
        assert!(Greeting.can_transition_to(&AwaitingInput));
        assert!(AwaitingInput.can_transition_to(&AssistantThinking));
        assert!(AssistantThinking.can_transition_to(&AwaitingInput));

        assert!(Greeting.can_transition_to(&Idle));
        assert!(AwaitingInput.can_transition_to(&Idle));
        assert!(AssistantThinking.can_transition_to(&Idle));
    }

    #[test]
    fn test_invalid_transitions() {
        use ConversationState::*;
        // No skipping the greeting
        assert!(!Idle.can_transition_to(&AwaitingInput));
        assert!(!Idle.can_transition_to(&AssistantThinking));
        // Thinking is only entered from AwaitingInput
        assert!(!Greeting.can_transition_to(&AssistantThinking));
        // No going back into the greeting
        assert!(!AwaitingInput.can_transition_to(&Greeting));
        assert!(!AssistantThinking.can_transition_to(&Greeting));

        for s in [Idle, Greeting, AwaitingInput, AssistantThinking] {
            assert!(!s.can_transition_to(&s), "{} -> {} must be rejected", s, s);
        }
    }

    #[test]
    fn test_state_machine_happy_path() {
        let mut sm = StateMachine::new();
        assert_eq!(sm.current(), ConversationState::Idle);

        sm.transition(ConversationState::Greeting).unwrap();
        sm.transition(ConversationState::AwaitingInput).unwrap();
        sm.transition(ConversationState::AssistantThinking).unwrap();
        sm.transition(ConversationState::AwaitingInput).unwrap();
        sm.transition(ConversationState::Idle).unwrap();
        assert_eq!(sm.current(), ConversationState::Idle);
    }

    #[test]
    fn test_state_machine_invalid_transition_keeps_state() {
        let mut sm = StateMachine::new();
        let err = sm.transition(ConversationState::AssistantThinking).unwrap_err();
        assert!(matches!(
            err,
            ChatError::InvalidTransition {
                from: ConversationState::Idle,
                to: ConversationState::AssistantThinking,
            }
        ));
        assert_eq!(sm.current(), ConversationState::Idle);
    }

    #[test]
    fn test_state_machine_reset() {
        let mut sm = StateMachine::new();
        sm.transition(ConversationState::Greeting).unwrap();
        sm.transition(ConversationState::AwaitingInput).unwrap();
        sm.reset();
        assert_eq!(sm.current(), ConversationState::Idle);

        // Reset from Idle is harmless
        sm.reset();
        assert_eq!(sm.current(), ConversationState::Idle);
    }
}
