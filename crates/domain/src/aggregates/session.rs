//! Session aggregate - the single mutable root of a play session
//!
//! # Design
//!
//! - **Private fields**: the host reads through accessors and [`SessionSnapshot`]
//! - **Admit / merge**: oracle exchanges are admitted here (which sets the
//!   in-flight guard in the same call) and folded back by `merge_*` methods
//!   that compare the ticket's epoch before touching anything
//! - **Epoch**: bumped by `reset` and `start_mission`, so results that belong
//!   to an abandoned mission are discarded as [`MergeOutcome::Stale`]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::entities::{
    ExchangeContext, ExchangeKind, ExchangeTicket, InteractionRecord, MergeOutcome, Mission,
    MissionAnalysis, NpcReaction, PlayerAction, SceneDefinition,
};
use crate::error::DomainError;
use crate::ids::ExchangeId;
use crate::simulation::{clamp_to_bounds, FrameClock, SimulationConfig, TickReport, World};
use crate::value_objects::{Affection, NpcMood, Vec2};

/// Speech shown over the NPC when an exchange fails in transport.
pub const FAILED_EXCHANGE_SPEECH: &str = "...";

/// How the player asked to act.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    /// An entry from the current scene's action catalog.
    Catalog(String),
    /// Typed message, sent as a `say` action labelled with the raw text.
    FreeText(String),
}

/// Mutable state of one play session.
///
/// # Invariants
///
/// - `affection` is always within [0, 100] (enforced by [`Affection`])
/// - `mission_index` is always a valid catalog index
/// - `loading` is true exactly while `in_flight` holds an exchange
/// - `history.len() == interaction_count`
#[derive(Debug, Clone)]
pub struct SessionState {
    catalog: Arc<Catalog>,
    config: SimulationConfig,
    clock: FrameClock,

    mission_index: usize,
    affection: Affection,
    interaction_count: u32,
    mood: NpcMood,
    analysis: Option<MissionAnalysis>,
    mission_complete: bool,
    game_started: bool,
    history: Vec<InteractionRecord>,

    scene: SceneDefinition,
    world: World,

    loading: bool,
    in_flight: Option<ExchangeId>,
    epoch: u64,
    last_error: Option<String>,
}

impl SessionState {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn new(catalog: Arc<Catalog>, config: SimulationConfig) -> Self {
        let scene = catalog.scene(0).clone();
        let world = World::spawn(&scene, &config);
        Self {
            catalog,
            config,
            clock: FrameClock::new(),
            mission_index: 0,
            affection: Affection::default(),
            interaction_count: 0,
            mood: NpcMood::Neutral,
            analysis: None,
            mission_complete: false,
            game_started: false,
            history: Vec::new(),
            scene,
            world,
            loading: false,
            in_flight: None,
            epoch: 0,
            last_error: None,
        }
    }

    /// Back to the first mission with zero affection.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.mission_index = 0;
        self.affection = Affection::default();
        self.mood = NpcMood::Neutral;
        self.last_error = None;
        self.clear_mission_state();
        self.scene = self.catalog.scene(0).clone();
        self.world = World::spawn(&self.scene, &self.config);
    }

    /// (Re)start the current mission. Affection and mood carry over.
    pub fn start_mission(&mut self) {
        self.epoch += 1;
        self.last_error = None;
        self.clear_mission_state();
        self.scene = self.catalog.scene(self.mission_index).clone();
        self.world = World::spawn(&self.scene, &self.config);
        self.game_started = true;
    }

    /// Move to the next mission. Returns false (and changes nothing) at the last one.
    pub fn advance_to_next_mission(&mut self) -> bool {
        if self.catalog.is_last_mission(self.mission_index) {
            return false;
        }
        self.mission_index += 1;
        self.start_mission();
        true
    }

    /// Resume from persisted progress; out-of-range values are clamped.
    pub fn restore_progress(&mut self, mission_index: usize, affection: i32) {
        self.mission_index = self.catalog.clamp_index(mission_index);
        self.affection = Affection::new(affection);
        self.start_mission();
    }

    fn clear_mission_state(&mut self) {
        self.interaction_count = 0;
        self.history.clear();
        self.analysis = None;
        self.mission_complete = false;
        self.loading = false;
        self.in_flight = None;
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    pub fn set_joystick(&mut self, input: Vec2) {
        self.world.set_joystick(input);
    }

    /// Advance the world by one frame of (unsanitized) wall-clock delta.
    pub fn tick(&mut self, raw_dt: f32) -> TickReport {
        let dt = self.clock.advance(raw_dt, self.config.max_frame_dt);
        self.world.tick(dt, &self.scene, &self.config)
    }

    /// Route an NPC to a point in the scene.
    pub fn send_npc_to(&mut self, target: Vec2) {
        let target = clamp_to_bounds(target, self.config.character_radius);
        self.world.npc.walk_to(target);
    }

    // =========================================================================
    // Action exchanges
    // =========================================================================

    /// Check and claim the in-flight slot for a player action.
    ///
    /// On success the player's action caption is shown and `loading` is set.
    pub fn admit_action(&mut self, request: ActionRequest) -> Result<ExchangeTicket, DomainError> {
        if self.loading {
            return Err(DomainError::ExchangeInFlight);
        }
        if self.mission_complete {
            return Err(DomainError::invalid_state_transition(
                "mission already completed",
            ));
        }

        let action = match request {
            ActionRequest::Catalog(id) => self
                .scene
                .find_action(&id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("PlayerAction", id))?,
            ActionRequest::FreeText(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(DomainError::validation("message cannot be empty"));
                }
                PlayerAction::free_text(text)
            }
        };

        if action.requires_proximity && !self.world.near_npc {
            return Err(DomainError::out_of_range(action.label));
        }

        self.world
            .action_text
            .show(action.label.clone(), self.config.action_text_duration);
        Ok(self.claim(ExchangeKind::Action { action }))
    }

    /// Fold a successful reaction into the session.
    pub fn merge_reaction(
        &mut self,
        ticket: &ExchangeTicket,
        reaction: NpcReaction,
        now: DateTime<Utc>,
    ) -> MergeOutcome {
        if !self.owns(ticket) {
            return MergeOutcome::Stale;
        }
        let Some(action) = ticket.action() else {
            return MergeOutcome::Stale;
        };

        let speech_duration = self.config.speech_duration(&reaction.dialogue);
        self.world.speech.show(reaction.dialogue.clone(), speech_duration);
        self.mood = reaction.mood;
        self.world.npc.apply_directive(reaction.directive, &self.config);

        let before = self.affection;
        self.affection = before.apply(reaction.affection_delta);
        self.world.badge.show(
            self.affection.value() - before.value(),
            self.config.affection_badge_duration,
        );

        self.history.push(InteractionRecord {
            action_id: action.id.clone(),
            action_label: action.label.clone(),
            npc_dialogue: reaction.dialogue,
            npc_mood: reaction.mood,
            timestamp: now,
        });
        self.interaction_count += 1;

        self.release();
        MergeOutcome::Applied
    }

    /// Record a transport failure: the NPC shows "..." and the player sees `message`.
    pub fn merge_failure(&mut self, ticket: &ExchangeTicket, message: impl Into<String>) -> MergeOutcome {
        if !self.owns(ticket) {
            return MergeOutcome::Stale;
        }
        self.last_error = Some(message.into());
        let duration = self.config.speech_duration(FAILED_EXCHANGE_SPEECH);
        self.world.speech.show(FAILED_EXCHANGE_SPEECH, duration);
        self.release();
        MergeOutcome::Applied
    }

    // =========================================================================
    // Mission completion
    // =========================================================================

    /// Claim the in-flight slot for the end-of-mission analysis.
    ///
    /// Only the interaction count gates completion; affection does not.
    pub fn admit_completion(&mut self) -> Result<ExchangeTicket, DomainError> {
        if self.loading {
            return Err(DomainError::ExchangeInFlight);
        }
        if self.mission_complete {
            return Err(DomainError::invalid_state_transition(
                "mission already completed",
            ));
        }
        let threshold = self.mission().completion_threshold;
        if !self.mission().can_complete(self.interaction_count) {
            return Err(DomainError::threshold_not_met(
                self.interaction_count,
                threshold,
            ));
        }

        self.mission_complete = true;
        Ok(self.claim(ExchangeKind::MissionAnalysis))
    }

    /// Apply an analysis (real or fallback) and release the slot.
    pub fn merge_analysis(&mut self, ticket: &ExchangeTicket, analysis: MissionAnalysis) -> MergeOutcome {
        if !self.owns(ticket) || ticket.kind != ExchangeKind::MissionAnalysis {
            return MergeOutcome::Stale;
        }
        self.affection = self.affection.apply(analysis.affection_change);
        self.mood = analysis.npc_mood;
        self.analysis = Some(analysis);
        self.release();
        MergeOutcome::Applied
    }

    // =========================================================================
    // Errors surfaced to the player
    // =========================================================================

    pub fn report_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn mission_index(&self) -> usize {
        self.mission_index
    }

    pub fn mission(&self) -> &Mission {
        self.catalog.mission(self.mission_index)
    }

    pub fn affection(&self) -> Affection {
        self.affection
    }

    pub fn interaction_count(&self) -> u32 {
        self.interaction_count
    }

    pub fn mood(&self) -> NpcMood {
        self.mood
    }

    pub fn analysis(&self) -> Option<&MissionAnalysis> {
        self.analysis.as_ref()
    }

    pub fn is_mission_complete(&self) -> bool {
        self.mission_complete
    }

    pub fn game_started(&self) -> bool {
        self.game_started
    }

    pub fn history(&self) -> &[InteractionRecord] {
        &self.history
    }

    pub fn scene(&self) -> &SceneDefinition {
        &self.scene
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn in_flight(&self) -> Option<ExchangeId> {
        self.in_flight
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    /// Read-only view for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        let mission = self.mission();
        SessionSnapshot {
            frame: self.clock.frame(),
            elapsed: self.clock.elapsed(),
            epoch: self.epoch,
            game_started: self.game_started,
            mission_index: self.mission_index,
            mission_count: self.catalog.mission_count(),
            mission: mission.clone(),
            can_complete: !self.mission_complete && mission.can_complete(self.interaction_count),
            has_next_mission: !self.catalog.is_last_mission(self.mission_index),
            affection: self.affection.value(),
            interaction_count: self.interaction_count,
            mood: self.mood,
            mood_emoji: self.mood.emoji(),
            loading: self.loading,
            mission_complete: self.mission_complete,
            analysis: self.analysis.clone(),
            history: self.history.clone(),
            scene: self.scene.clone(),
            world: self.world.clone(),
            speech: self.world.speech.text().map(str::to_string),
            action_text: self.world.action_text.text().map(str::to_string),
            affection_badge: self.world.badge.label(),
            last_error: self.last_error.clone(),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn claim(&mut self, kind: ExchangeKind) -> ExchangeTicket {
        let id = ExchangeId::new();
        self.loading = true;
        self.in_flight = Some(id);
        self.last_error = None;
        ExchangeTicket {
            id,
            epoch: self.epoch,
            kind,
            context: ExchangeContext {
                mission: self.mission().clone(),
                affection: self.affection,
                mood: self.mood,
                history: self.history.clone(),
                player_name: None,
            },
        }
    }

    fn owns(&self, ticket: &ExchangeTicket) -> bool {
        ticket.epoch == self.epoch && self.in_flight == Some(ticket.id)
    }

    fn release(&mut self) {
        self.loading = false;
        self.in_flight = None;
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub frame: u64,
    pub elapsed: f64,
    pub epoch: u64,
    pub game_started: bool,
    pub mission_index: usize,
    pub mission_count: usize,
    pub mission: Mission,
    pub can_complete: bool,
    pub has_next_mission: bool,
    pub affection: i32,
    pub interaction_count: u32,
    pub mood: NpcMood,
    pub mood_emoji: &'static str,
    pub loading: bool,
    pub mission_complete: bool,
    pub analysis: Option<MissionAnalysis>,
    pub history: Vec<InteractionRecord>,
    pub scene: SceneDefinition,
    pub world: World,
    pub speech: Option<String>,
    pub action_text: Option<String>,
    pub affection_badge: Option<String>,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::NpcBehavior;
    use crate::value_objects::BehaviorDirective;

    fn session() -> SessionState {
        let mut s = SessionState::new(Arc::new(Catalog::standard()), SimulationConfig::default());
        s.start_mission();
        s
    }

    /// Put the player right next to the NPC.
    fn walk_to_npc(s: &mut SessionState) {
        let npc = s.world.npc.position;
        s.world.player.position = Vec2::new(npc.x, npc.y + 0.05);
        s.tick(0.0);
        assert!(s.world().near_npc);
    }

    fn reaction(dialogue: &str, mood: NpcMood, delta: i32) -> NpcReaction {
        NpcReaction {
            dialogue: dialogue.into(),
            mood,
            affection_delta: delta,
            directive: BehaviorDirective::ApproachPlayer,
        }
    }

    fn complete_exchanges(s: &mut SessionState, n: u32) {
        walk_to_npc(s);
        for _ in 0..n {
            let ticket = s.admit_action(ActionRequest::Catalog("smile".into())).unwrap();
            s.merge_reaction(&ticket, reaction("Hi", NpcMood::Happy, 1), Utc::now());
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn new_session_has_not_started() {
            let s = SessionState::new(Arc::new(Catalog::standard()), SimulationConfig::default());
            assert!(!s.game_started());
            assert_eq!(s.affection().value(), 0);
            assert_eq!(s.mission_index(), 0);
        }

        #[test]
        fn start_mission_clears_per_mission_state_but_keeps_affection() {
            let mut s = session();
            complete_exchanges(&mut s, 2);
            s.world.speech.show("lingering", 4.0);
            let affection = s.affection();
            let epoch = s.epoch();

            s.start_mission();

            assert!(s.history().is_empty());
            assert_eq!(s.interaction_count(), 0);
            assert!(!s.world().speech.is_visible());
            assert!(!s.world().action_text.is_visible());
            assert_eq!(s.world().badge.delta(), None);
            assert!(s.world().npc.behavior.is_idle());
            assert_eq!(s.world().player.position, s.scene().player_spawn);
            assert_eq!(s.affection(), affection);
            assert_eq!(s.epoch(), epoch + 1);
        }

        #[test]
        fn reset_zeroes_progress() {
            let mut s = session();
            s.restore_progress(3, 70);
            s.reset();
            assert_eq!(s.mission_index(), 0);
            assert_eq!(s.affection().value(), 0);
            assert!(s.history().is_empty());
            assert_eq!(s.mood(), NpcMood::Neutral);
        }

        #[test]
        fn restore_progress_clamps() {
            let mut s = session();
            s.restore_progress(99, 250);
            assert_eq!(s.mission_index(), 4);
            assert_eq!(s.affection().value(), 100);
            assert_eq!(s.scene(), s.catalog().scene(4));
        }

        #[test]
        fn advance_moves_forward_until_last_mission() {
            let mut s = session();
            for expected in 1..5 {
                assert!(s.advance_to_next_mission());
                assert_eq!(s.mission_index(), expected);
            }
            let epoch = s.epoch();
            assert!(!s.advance_to_next_mission());
            assert_eq!(s.mission_index(), 4);
            assert_eq!(s.epoch(), epoch);
        }
    }

    mod actions {
        use super::*;

        #[test]
        fn admission_sets_loading_and_caption() {
            let mut s = session();
            walk_to_npc(&mut s);
            let ticket = s.admit_action(ActionRequest::Catalog("compliment".into())).unwrap();

            assert!(s.is_loading());
            assert_eq!(s.in_flight(), Some(ticket.id));
            assert_eq!(s.world().action_text.text(), Some("Compliment"));
            assert_eq!(ticket.action().map(|a| a.id.as_str()), Some("compliment"));
        }

        #[test]
        fn second_submit_is_rejected_and_first_result_applies() {
            let mut s = session();
            walk_to_npc(&mut s);
            let first = s.admit_action(ActionRequest::Catalog("smile".into())).unwrap();

            let second = s.admit_action(ActionRequest::Catalog("joke".into()));
            assert_eq!(second.unwrap_err(), DomainError::ExchangeInFlight);

            let outcome = s.merge_reaction(&first, reaction("Ha", NpcMood::Happy, 5), Utc::now());
            assert_eq!(outcome, MergeOutcome::Applied);
            assert_eq!(s.history().len(), 1);
            assert_eq!(s.history()[0].action_id, "smile");
            assert!(!s.is_loading());
        }

        #[test]
        fn merge_applies_every_field() {
            let mut s = session();
            walk_to_npc(&mut s);
            let ticket = s.admit_action(ActionRequest::Catalog("smile".into())).unwrap();

            s.merge_reaction(&ticket, reaction("Hello there", NpcMood::Shy, 7), Utc::now());

            assert_eq!(s.world().speech.text(), Some("Hello there"));
            assert_eq!(s.mood(), NpcMood::Shy);
            assert_eq!(s.world().npc.behavior, NpcBehavior::ApproachingPlayer);
            assert_eq!(s.affection().value(), 7);
            assert_eq!(s.world().badge.label().as_deref(), Some("+7"));
            assert_eq!(s.interaction_count(), 1);
        }

        #[test]
        fn oversized_delta_is_clamped() {
            let mut s = session();
            walk_to_npc(&mut s);
            let ticket = s.admit_action(ActionRequest::Catalog("smile".into())).unwrap();
            s.merge_reaction(&ticket, reaction("!", NpcMood::Flirty, 500), Utc::now());
            assert_eq!(s.affection().value(), 100);

            let ticket = s.admit_action(ActionRequest::Catalog("smile".into())).unwrap();
            s.merge_reaction(&ticket, reaction("?", NpcMood::Annoyed, i32::MIN), Utc::now());
            assert_eq!(s.affection().value(), 0);
        }

        #[test]
        fn out_of_range_action_is_rejected() {
            let mut s = session();
            s.world.player.position = Vec2::new(0.05, 0.95);
            s.tick(0.0);

            let err = s.admit_action(ActionRequest::Catalog("smile".into())).unwrap_err();
            assert!(matches!(err, DomainError::OutOfRange { .. }));
            assert!(!s.is_loading());
        }

        #[test]
        fn unknown_action_and_blank_text_are_rejected() {
            let mut s = session();
            walk_to_npc(&mut s);

            let err = s.admit_action(ActionRequest::Catalog("dance".into())).unwrap_err();
            assert!(matches!(err, DomainError::NotFound { .. }));

            let err = s.admit_action(ActionRequest::FreeText("   ".into())).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
            assert!(!s.is_loading());
        }

        #[test]
        fn free_text_becomes_say_action() {
            let mut s = session();
            walk_to_npc(&mut s);
            let ticket = s
                .admit_action(ActionRequest::FreeText("  Nice weather!  ".into()))
                .unwrap();
            let action = ticket.action().unwrap();
            assert_eq!(action.id, PlayerAction::FREE_TEXT_ID);
            assert_eq!(action.label, "Nice weather!");
        }

        #[test]
        fn failure_shows_ellipsis_and_error() {
            let mut s = session();
            walk_to_npc(&mut s);
            let ticket = s.admit_action(ActionRequest::Catalog("smile".into())).unwrap();

            s.merge_failure(&ticket, "API error: 500");

            assert_eq!(s.world().speech.text(), Some(FAILED_EXCHANGE_SPEECH));
            assert_eq!(s.last_error(), Some("API error: 500"));
            assert!(!s.is_loading());
            assert!(s.history().is_empty());
        }

        #[test]
        fn result_after_restart_is_stale() {
            let mut s = session();
            walk_to_npc(&mut s);
            let ticket = s.admit_action(ActionRequest::Catalog("smile".into())).unwrap();

            s.start_mission();
            let outcome = s.merge_reaction(&ticket, reaction("late", NpcMood::Happy, 9), Utc::now());

            assert_eq!(outcome, MergeOutcome::Stale);
            assert_eq!(s.affection().value(), 0);
            assert!(s.history().is_empty());
            assert!(!s.world().speech.is_visible());
        }
    }

    mod completion {
        use super::*;

        #[test]
        fn rejected_below_threshold() {
            let mut s = session();
            complete_exchanges(&mut s, 3);
            let err = s.admit_completion().unwrap_err();
            assert_eq!(err, DomainError::threshold_not_met(3, 4));
            assert!(!s.is_mission_complete());
        }

        #[test]
        fn accepted_at_threshold_regardless_of_affection() {
            let mut s = session();
            walk_to_npc(&mut s);
            for _ in 0..4 {
                let t = s.admit_action(ActionRequest::Catalog("joke".into())).unwrap();
                s.merge_reaction(&t, reaction("Meh", NpcMood::Annoyed, -10), Utc::now());
            }
            assert_eq!(s.affection().value(), 0);

            let ticket = s.admit_completion().unwrap();
            assert!(s.is_mission_complete());
            assert!(s.is_loading());
            assert_eq!(ticket.kind, ExchangeKind::MissionAnalysis);
            assert_eq!(ticket.context.history.len(), 4);
        }

        #[test]
        fn analysis_merge_applies_change_and_mood() {
            let mut s = session();
            complete_exchanges(&mut s, 4);
            let ticket = s.admit_completion().unwrap();

            s.merge_analysis(
                &ticket,
                MissionAnalysis {
                    summary: "Went well".into(),
                    affection_change: 12,
                    npc_mood: NpcMood::Flirty,
                    advice: "Keep it up".into(),
                },
            );

            assert_eq!(s.affection().value(), 16);
            assert_eq!(s.mood(), NpcMood::Flirty);
            assert_eq!(s.analysis().map(|a| a.summary.as_str()), Some("Went well"));
            assert!(!s.is_loading());
        }

        #[test]
        fn fallback_analysis_keeps_mood() {
            let mut s = session();
            complete_exchanges(&mut s, 4);
            let mood = s.mood();
            let ticket = s.admit_completion().unwrap();

            s.merge_analysis(&ticket, MissionAnalysis::fallback(Some("timeout"), mood));

            assert_eq!(s.mood(), mood);
            assert_eq!(s.affection().value(), 4);
            assert!(s.analysis().is_some());
        }

        #[test]
        fn analysis_after_restart_is_stale() {
            let mut s = session();
            complete_exchanges(&mut s, 4);
            let ticket = s.admit_completion().unwrap();
            s.start_mission();
            let (affection, mood) = (s.affection(), s.mood());

            let outcome = s.merge_analysis(
                &ticket,
                MissionAnalysis {
                    summary: "late".into(),
                    affection_change: 12,
                    npc_mood: NpcMood::Flirty,
                    advice: "-".into(),
                },
            );

            assert_eq!(outcome, MergeOutcome::Stale);
            assert_eq!(s.affection(), affection);
            assert_eq!(s.mood(), mood);
            assert!(s.analysis().is_none());
            assert!(!s.is_mission_complete());
        }

        #[test]
        fn analysis_after_reset_is_stale() {
            let mut s = session();
            complete_exchanges(&mut s, 4);
            let ticket = s.admit_completion().unwrap();
            s.reset();

            let outcome = s.merge_analysis(&ticket, MissionAnalysis::fallback(None, NpcMood::Flirty));

            assert_eq!(outcome, MergeOutcome::Stale);
            assert_eq!(s.affection().value(), 0);
            assert_eq!(s.mood(), NpcMood::Neutral);
            assert!(s.analysis().is_none());
        }

        #[test]
        fn action_ticket_cannot_merge_as_analysis() {
            let mut s = session();
            walk_to_npc(&mut s);
            let ticket = s.admit_action(ActionRequest::Catalog("smile".into())).unwrap();

            let outcome = s.merge_analysis(&ticket, MissionAnalysis::fallback(None, NpcMood::Flirty));

            assert_eq!(outcome, MergeOutcome::Stale);
            assert!(s.is_loading());
            assert_eq!(s.in_flight(), Some(ticket.id));
            assert_eq!(s.mood(), NpcMood::Neutral);
            assert!(s.analysis().is_none());
        }

        #[test]
        fn completed_mission_rejects_more_work() {
            let mut s = session();
            complete_exchanges(&mut s, 4);
            let ticket = s.admit_completion().unwrap();
            s.merge_analysis(&ticket, MissionAnalysis::fallback(None, NpcMood::Neutral));

            assert!(matches!(
                s.admit_completion(),
                Err(DomainError::InvalidStateTransition(_))
            ));
            assert!(matches!(
                s.admit_action(ActionRequest::Catalog("smile".into())),
                Err(DomainError::InvalidStateTransition(_))
            ));
        }
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut s = session();
        complete_exchanges(&mut s, 4);
        let snap = s.snapshot();

        assert_eq!(snap.mission.title, "First Encounter");
        assert_eq!(snap.interaction_count, 4);
        assert!(snap.can_complete);
        assert!(snap.has_next_mission);
        assert_eq!(snap.affection, 4);
        assert_eq!(snap.speech.as_deref(), Some("Hi"));
        assert_eq!(snap.history.len(), 4);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["world"]["npc"]["behavior"]["state"], "approaching_player");
    }

    #[test]
    fn send_npc_to_walks_and_clamps() {
        let mut s = session();
        s.send_npc_to(Vec2::new(2.0, 0.5));
        match s.world().npc.behavior {
            NpcBehavior::Walking { target } => assert!(target.x <= 1.0 - s.config().character_radius),
            other => panic!("expected walking, got {other:?}"),
        }
    }
}
