//! Error types for the Silkflow system.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("pipeline failure: {0}")]
    Pipeline(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("agent error: {0}")]
    Agent(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("session {0} not found")]
    SessionNotFound(crate::SessionId),

    #[error("timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
}

impl Error {
    /// Machine-readable error kind for structured API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::Transport(_) => "transport",
            Error::Pipeline(_) => "pipeline",
            Error::Config(_) => "config",
            Error::Agent(_) => "agent",
            Error::Serialization(_) => "serialization",
            Error::SessionNotFound(_) => "session_not_found",
            Error::Timeout { .. } => "timeout",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
