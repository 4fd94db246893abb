//! Use cases - User story orchestration.
//!
//! `dialogue` talks to the oracle; `session` owns the live game and the
//! frame loop that drives it.

pub mod dialogue;
pub mod session;

pub use dialogue::DialogueOrchestrator;
pub use session::{spawn_frame_loop, PendingExchange, SessionController, SessionError};
