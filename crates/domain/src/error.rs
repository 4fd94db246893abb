//! Unified error type for the domain layer
//!
//! Every rejected session operation is reported through [`DomainError`], so
//! the engine can map admission failures without falling back to strings.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., empty free text)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// An oracle exchange is already running for this session
    #[error("The NPC is still responding; wait for the current exchange to finish")]
    ExchangeInFlight,

    /// Action needs the player to stand next to the NPC
    #[error("Move closer to the NPC to {action}")]
    OutOfRange { action: String },

    /// Mission cannot end yet
    #[error("Mission needs {threshold} interactions before it can be completed ({count} so far)")]
    ThresholdNotMet { count: u32, threshold: u32 },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    pub fn out_of_range(action: impl Into<String>) -> Self {
        Self::OutOfRange {
            action: action.into(),
        }
    }

    pub fn threshold_not_met(count: u32, threshold: u32) -> Self {
        Self::ThresholdNotMet { count, threshold }
    }
}
