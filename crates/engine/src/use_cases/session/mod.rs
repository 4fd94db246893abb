//! Session use cases.
//!
//! The controller owns the live session; the frame loop drives it.

mod controller;
mod frame_loop;

pub use controller::{PendingExchange, SessionController, SessionError};
pub use frame_loop::spawn_frame_loop;
