//! Session controller: the only writer of [`SessionState`].
//!
//! The frame loop, HTTP handlers and spawned oracle tasks all go through
//! one `RwLock`. Oracle calls never run while the lock is held: an exchange
//! is admitted under the lock, awaited outside it, then merged under it
//! again. Every mutation publishes a fresh snapshot on a `watch` channel.

use std::sync::Arc;

use heartquest_domain::{
    ActionRequest, DomainError, ExchangeId, ExchangeTicket, MergeOutcome, Mission,
    MissionAnalysis, SessionSnapshot, SessionState, TickReport, Vec2,
};
use tokio::sync::{watch, RwLock};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::infrastructure::ports::{
    ApiKey, ClockPort, LlmError, PlayerSettings, PreferencesRepo, RepoError, SavedProgress,
    DEFAULT_PLAYER_NAME,
};
use crate::use_cases::dialogue::DialogueOrchestrator;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Session state plus the task currently allowed to merge into it.
struct Inner {
    state: SessionState,
    task: Option<AbortHandle>,
}

impl Inner {
    /// Abort the outstanding exchange, if any.
    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// An admitted exchange running in the background.
pub struct PendingExchange {
    pub id: ExchangeId,
    handle: JoinHandle<MergeOutcome>,
}

impl PendingExchange {
    /// Wait for the merge. `None` when the task was cancelled by a new game
    /// or mission.
    pub async fn outcome(self) -> Option<MergeOutcome> {
        self.handle.await.ok()
    }
}

pub struct SessionController {
    inner: RwLock<Inner>,
    snapshots: watch::Sender<SessionSnapshot>,
    settings: RwLock<PlayerSettings>,
    preferences: Arc<dyn PreferencesRepo>,
    dialogue: Arc<DialogueOrchestrator>,
    clock: Arc<dyn ClockPort>,
}

impl SessionController {
    pub fn new(
        state: SessionState,
        preferences: Arc<dyn PreferencesRepo>,
        dialogue: Arc<DialogueOrchestrator>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let (snapshots, _) = watch::channel(state.snapshot());
        Self {
            inner: RwLock::new(Inner { state, task: None }),
            snapshots,
            settings: RwLock::new(PlayerSettings::default()),
            preferences,
            dialogue,
            clock,
        }
    }

    /// Load stored settings into the controller's cache.
    pub async fn init(&self) -> Result<(), SessionError> {
        let settings = self.preferences.load_settings().await?;
        info!(
            has_api_key = settings.has_api_key(),
            player_name = %settings.player_name,
            "Loaded player settings"
        );
        *self.settings.write().await = settings;
        Ok(())
    }

    // =========================================================================
    // Game flow
    // =========================================================================

    /// Start over from the first mission and forget saved progress.
    pub async fn new_game(&self) -> Result<(), SessionError> {
        {
            let mut inner = self.inner.write().await;
            inner.cancel_task();
            inner.state.reset();
            inner.state.start_mission();
            self.publish(&inner.state);
        }
        self.preferences.clear_progress().await?;
        info!("New game started");
        Ok(())
    }

    /// Resume from saved progress (a fresh start when nothing was saved).
    pub async fn continue_game(&self) -> Result<(), SessionError> {
        let progress = self.preferences.load_progress().await?;
        let mut inner = self.inner.write().await;
        inner.cancel_task();
        inner
            .state
            .restore_progress(progress.mission_index, progress.affection);
        self.publish(&inner.state);
        info!(
            mission_index = inner.state.mission_index(),
            affection = inner.state.affection().value(),
            "Game continued"
        );
        Ok(())
    }

    pub async fn has_saved_game(&self) -> Result<bool, SessionError> {
        Ok(self.preferences.load_progress().await?.is_meaningful())
    }

    /// Move on after a completed mission. Returns false at the last mission.
    ///
    /// Rejected with `ExchangeInFlight` until the mission analysis has merged.
    pub async fn advance_to_next_mission(&self) -> Result<bool, SessionError> {
        let (advanced, progress) = {
            let mut inner = self.inner.write().await;
            if !inner.state.is_mission_complete() {
                return Err(DomainError::invalid_state_transition(
                    "finish the current mission before moving on",
                )
                .into());
            }
            if inner.state.is_loading() {
                return Err(DomainError::ExchangeInFlight.into());
            }
            let advanced = inner.state.advance_to_next_mission();
            if advanced {
                inner.cancel_task();
                self.publish(&inner.state);
            }
            (advanced, Self::progress_of(&inner.state))
        };

        if advanced {
            self.preferences.save_progress(progress).await?;
            info!(mission_index = progress.mission_index, "Advanced to next mission");
        }
        Ok(advanced)
    }

    // =========================================================================
    // Oracle exchanges
    // =========================================================================

    /// Admit a player action and run the NPC exchange in the background.
    ///
    /// A missing credential is rejected before admission and shown to the
    /// player; every other rejection leaves the session untouched.
    pub async fn perform_action(
        self: &Arc<Self>,
        request: ActionRequest,
    ) -> Result<PendingExchange, SessionError> {
        let settings = self.settings.read().await.clone();
        let mut inner = self.inner.write().await;

        let Some(api_key) = ApiKey::new(&settings.api_key) else {
            let err = LlmError::MissingCredential;
            inner.state.report_error(err.to_string());
            self.publish(&inner.state);
            return Err(err.into());
        };

        let mut ticket = inner.state.admit_action(request)?;
        ticket.context = ticket.context.with_player_name(settings.display_name());
        let id = ticket.id;
        debug!(exchange_id = %id, action = ?ticket.action().map(|a| &a.id), "Exchange admitted");

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.run_action(ticket, api_key).await });
        inner.task = Some(handle.abort_handle());
        self.publish(&inner.state);

        Ok(PendingExchange { id, handle })
    }

    async fn run_action(self: Arc<Self>, ticket: ExchangeTicket, api_key: ApiKey) -> MergeOutcome {
        let Some(action) = ticket.action() else {
            return MergeOutcome::Stale;
        };
        let result = self
            .dialogue
            .submit_action(&ticket.context, action, Some(api_key))
            .await;
        let now = self.clock.now();

        let mut inner = self.inner.write().await;
        let outcome = match result {
            Ok(reaction) => inner.state.merge_reaction(&ticket, reaction, now),
            Err(e) => inner.state.merge_failure(&ticket, e.to_string()),
        };
        self.finish(&mut inner, &ticket, outcome);
        outcome
    }

    /// Close the current mission and ask the narrator for a review.
    ///
    /// Oracle trouble, including a missing credential, never blocks
    /// completion: a neutral fallback analysis is merged instead.
    pub async fn complete_mission(self: &Arc<Self>) -> Result<PendingExchange, SessionError> {
        let settings = self.settings.read().await.clone();
        let mut inner = self.inner.write().await;

        let mut ticket = inner.state.admit_completion()?;
        ticket.context = ticket.context.with_player_name(settings.display_name());
        let id = ticket.id;
        debug!(exchange_id = %id, mission = %ticket.context.mission.title, "Mission completion admitted");

        let api_key = ApiKey::new(&settings.api_key);
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.run_analysis(ticket, api_key).await });
        inner.task = Some(handle.abort_handle());
        self.publish(&inner.state);

        Ok(PendingExchange { id, handle })
    }

    async fn run_analysis(self: Arc<Self>, ticket: ExchangeTicket, api_key: Option<ApiKey>) -> MergeOutcome {
        let analysis = match self.dialogue.analyze_mission(&ticket.context, api_key).await {
            Ok(analysis) => analysis,
            Err(e) => MissionAnalysis::fallback(Some(&e.to_string()), ticket.context.mood),
        };

        let (outcome, progress) = {
            let mut inner = self.inner.write().await;
            let outcome = inner.state.merge_analysis(&ticket, analysis);
            self.finish(&mut inner, &ticket, outcome);
            (outcome, Self::progress_of(&inner.state))
        };

        if outcome.is_applied() {
            if let Err(e) = self.preferences.save_progress(progress).await {
                warn!(error = %e, "Failed to save progress after mission completion");
            }
        }
        outcome
    }

    fn finish(&self, inner: &mut Inner, ticket: &ExchangeTicket, outcome: MergeOutcome) {
        if outcome.is_applied() {
            inner.task = None;
            self.publish(&inner.state);
            debug!(exchange_id = %ticket.id, "Exchange merged");
        } else {
            debug!(
                exchange_id = %ticket.id,
                ticket_epoch = ticket.epoch,
                session_epoch = inner.state.epoch(),
                "Discarded stale exchange result"
            );
        }
    }

    // =========================================================================
    // Frame loop and input
    // =========================================================================

    pub async fn tick(&self, raw_dt: f32) -> TickReport {
        let mut inner = self.inner.write().await;
        let report = inner.state.tick(raw_dt);
        if let Some(previous) = report.npc_transition {
            debug!(
                from = previous.name(),
                to = inner.state.world().npc.behavior.name(),
                "NPC behavior changed"
            );
        }
        self.publish(&inner.state);
        report
    }

    pub async fn set_joystick(&self, input: Vec2) {
        self.inner.write().await.state.set_joystick(input);
    }

    pub async fn send_npc_to(&self, target: Vec2) {
        self.inner.write().await.state.send_npc_to(target);
    }

    pub async fn clear_error(&self) {
        let mut inner = self.inner.write().await;
        inner.state.clear_error();
        self.publish(&inner.state);
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub async fn settings(&self) -> PlayerSettings {
        self.settings.read().await.clone()
    }

    /// Persist both settings. A blank name falls back to the default.
    pub async fn save_settings(
        &self,
        api_key: &str,
        player_name: &str,
    ) -> Result<PlayerSettings, SessionError> {
        let player_name = player_name.trim();
        let settings = PlayerSettings {
            api_key: api_key.trim().to_string(),
            player_name: if player_name.is_empty() {
                DEFAULT_PLAYER_NAME.to_string()
            } else {
                player_name.to_string()
            },
        };
        self.preferences.save_settings(&settings).await?;
        *self.settings.write().await = settings.clone();
        info!(has_api_key = settings.has_api_key(), "Settings saved");
        Ok(settings)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub async fn missions(&self) -> Vec<Mission> {
        self.inner.read().await.state.catalog().missions().to_vec()
    }

    fn publish(&self, state: &SessionState) {
        self.snapshots.send_replace(state.snapshot());
    }

    fn progress_of(state: &SessionState) -> SavedProgress {
        SavedProgress {
            mission_index: state.mission_index(),
            affection: state.affection().value(),
        }
    }
}
