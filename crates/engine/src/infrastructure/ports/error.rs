//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Stored value could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// Rejected before any network call.
    #[error("Please set your Claude API key in Settings first.")]
    MissingCredential,
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    /// Non-2xx answer; `message` is the provider's error text when present.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("LLM request timed out after {0}s")]
    Timeout(u64),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
