//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod anthropic;
pub mod clock;
pub mod config;
pub mod ports;
pub mod preferences;
pub mod resilient_llm;
