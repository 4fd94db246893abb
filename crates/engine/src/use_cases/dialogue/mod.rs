//! NPC dialogue: prompts, oracle calls and reply parsing.

mod orchestrator;
pub mod prompt;
pub mod response_parser;

pub use orchestrator::DialogueOrchestrator;
