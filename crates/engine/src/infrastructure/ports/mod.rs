//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Preferences storage (could swap SQLite -> a platform key store)
//! - LLM calls (could swap Claude -> another provider)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::{LlmError, RepoError};
pub use external::{
    ApiKey, ChatMessage, FinishReason, LlmPort, LlmRequest, LlmResponse, MessageRole, TokenUsage,
};
pub use repos::{PlayerSettings, PreferencesRepo, SavedProgress, DEFAULT_PLAYER_NAME};
pub use testing::ClockPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::MockLlmPort;
#[cfg(test)]
pub use repos::MockPreferencesRepo;
#[cfg(test)]
pub use testing::MockClockPort;
