use thiserror::Error;

/// Top-level error type for Backroom.
///
/// Subsystem crates define their own error types and implement
/// `From<BackroomError>` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackroomError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for BackroomError {
    fn from(err: toml::de::Error) -> Self {
        BackroomError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BackroomError {
    fn from(err: toml::ser::Error) -> Self {
        BackroomError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BackroomError {
    fn from(err: serde_json::Error) -> Self {
        BackroomError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Backroom operations.
pub type Result<T> = std::result::Result<T, BackroomError>;
