//! Scripted conversation engine for the Backroom dashboard chat widget.
//!
//! Sequences a staggered greeting, classifies operator questions with
//! ordered keyword rules against a statistics snapshot, and reveals
//! assistant replies character by character.

pub mod classifier;
pub mod error;
pub mod lifecycle;
pub mod reveal;
pub mod script;
pub mod sequencer;
pub mod state;
pub mod timer;
pub mod types;

pub use classifier::{Intent, IntentClassifier};
pub use error::ChatError;
pub use lifecycle::{ChatWidget, CloseFn};
pub use reveal::{Reveal, RevealStep};
pub use script::GreetingScript;
pub use sequencer::{Conversation, ConversationUpdate};
pub use state::ConversationState;
pub use timer::{TimerId, Timers};
pub use types::{Message, Sender, SessionState, Transcript};
