//! Application state and composition.

use std::sync::Arc;

use heartquest_domain::{Catalog, SessionState, SimulationConfig};

use crate::infrastructure::ports::{ClockPort, LlmPort, PreferencesRepo};
use crate::use_cases::{DialogueOrchestrator, SessionController, SessionError};

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub session: Arc<SessionController>,
}

impl App {
    /// Wire ports into use cases. The session starts on the title screen;
    /// call [`App::init`] before serving.
    pub fn new(
        catalog: Arc<Catalog>,
        simulation: SimulationConfig,
        preferences: Arc<dyn PreferencesRepo>,
        llm: Arc<dyn LlmPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let dialogue = Arc::new(DialogueOrchestrator::new(llm));
        let state = SessionState::new(catalog, simulation);
        let session = Arc::new(SessionController::new(state, preferences, dialogue, clock));
        Self { session }
    }

    pub async fn init(&self) -> Result<(), SessionError> {
        self.session.init().await
    }
}
