//! Common agent error and result types.

/// Result type for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Agent error types
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("inference error: {0}")]
    Inference(String),

    #[error("timeout after {0}ms")]
    Timeout(u64),

    #[error("refiner not configured for this capability")]
    NotConfigured,
}

impl From<AgentError> for silk_core::Error {
    fn from(e: AgentError) -> Self {
        silk_core::Error::Agent(e.to_string())
    }
}
