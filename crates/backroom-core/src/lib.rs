pub mod config;
pub mod error;
pub mod types;

pub use config::BackroomConfig;
pub use error::{BackroomError, Result};
pub use types::*;
