//! HeartQuest Engine library.
//!
//! Hosts the live game session on top of `heartquest-domain`.
//!
//! ## Structure
//!
//! - `use_cases/` - Session controller, frame loop and dialogue orchestration
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
