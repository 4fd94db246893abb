//! Aggregates - mutable roots that enforce invariants across entities.

mod session;

pub use session::{ActionRequest, SessionSnapshot, SessionState, FAILED_EXCHANGE_SPEECH};
