//! HTTP routes.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures_util::stream::{self, Stream, StreamExt};
use heartquest_domain::{ActionRequest, DomainError, Mission, SessionSnapshot, Vec2};
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::infrastructure::ports::LlmError;
use crate::use_cases::{PendingExchange, SessionError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/missions", get(list_missions))
        .route("/api/settings", get(get_settings).put(update_settings))
        .route("/api/game/saved", get(saved_game))
        .route("/api/game/new", post(new_game))
        .route("/api/game/continue", post(continue_game))
        .route("/api/session", get(get_session))
        .route("/api/session/stream", get(session_stream))
        .route("/api/session/joystick", post(set_joystick))
        .route("/api/session/npc/walk", post(walk_npc))
        .route("/api/session/action", post(perform_action))
        .route("/api/session/error", axum::routing::delete(clear_error))
        .route("/api/session/mission/complete", post(complete_mission))
        .route("/api/session/mission/advance", post(advance_mission))
}

async fn health() -> &'static str {
    "OK"
}

async fn list_missions(State(app): State<Arc<App>>) -> Json<Vec<Mission>> {
    Json(app.session.missions().await)
}

// =============================================================================
// Settings
// =============================================================================

/// Settings as shown to clients; the key itself never leaves the server.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsView {
    pub has_api_key: bool,
    pub player_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    /// Omitted keeps the stored key; an empty string clears it.
    #[serde(default)]
    pub api_key: Option<String>,
    pub player_name: String,
}

async fn get_settings(State(app): State<Arc<App>>) -> Json<SettingsView> {
    let settings = app.session.settings().await;
    Json(SettingsView {
        has_api_key: settings.has_api_key(),
        player_name: settings.player_name,
    })
}

async fn update_settings(
    State(app): State<Arc<App>>,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsView>, ApiError> {
    let api_key = match body.api_key {
        Some(key) => key,
        None => app.session.settings().await.api_key,
    };
    let saved = app.session.save_settings(&api_key, &body.player_name).await?;
    Ok(Json(SettingsView {
        has_api_key: saved.has_api_key(),
        player_name: saved.player_name,
    }))
}

// =============================================================================
// Game flow
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedGameResponse {
    pub has_saved_game: bool,
}

async fn saved_game(State(app): State<Arc<App>>) -> Result<Json<SavedGameResponse>, ApiError> {
    Ok(Json(SavedGameResponse {
        has_saved_game: app.session.has_saved_game().await?,
    }))
}

async fn new_game(State(app): State<Arc<App>>) -> Result<Json<SessionSnapshot>, ApiError> {
    app.session.new_game().await?;
    Ok(Json(app.session.snapshot().await))
}

async fn continue_game(State(app): State<Arc<App>>) -> Result<Json<SessionSnapshot>, ApiError> {
    app.session.continue_game().await?;
    Ok(Json(app.session.snapshot().await))
}

// =============================================================================
// Session
// =============================================================================

async fn get_session(State(app): State<Arc<App>>) -> Json<SessionSnapshot> {
    Json(app.session.snapshot().await)
}

/// Server-sent events: the current snapshot, then one per published change.
async fn session_stream(
    State(app): State<Arc<App>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = app.session.subscribe();
    let initial = rx.borrow_and_update().clone();

    let updates = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let snapshot = rx.borrow_and_update().clone();
        Some((snapshot, rx))
    });

    let events = stream::once(async move { initial })
        .chain(updates)
        .map(|snapshot| Ok(snapshot_event(&snapshot)));

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn snapshot_event(snapshot: &SessionSnapshot) -> Event {
    Event::default()
        .event("snapshot")
        .json_data(snapshot)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to encode snapshot event");
            Event::default().comment("snapshot unavailable")
        })
}

#[derive(Debug, Deserialize)]
pub struct PointRequest {
    pub x: f32,
    pub y: f32,
}

async fn set_joystick(State(app): State<Arc<App>>, Json(body): Json<PointRequest>) -> StatusCode {
    app.session.set_joystick(Vec2::new(body.x, body.y)).await;
    StatusCode::NO_CONTENT
}

async fn walk_npc(
    State(app): State<Arc<App>>,
    Json(body): Json<PointRequest>,
) -> Result<StatusCode, ApiError> {
    let target = Vec2::new(body.x, body.y);
    if !target.is_finite() {
        return Err(ApiError::BadRequest("target must be finite".into()));
    }
    app.session.send_npc_to(target).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_error(State(app): State<Arc<App>>) -> StatusCode {
    app.session.clear_error().await;
    StatusCode::NO_CONTENT
}

/// Either a catalog action id or typed text.
#[derive(Debug, Deserialize)]
pub struct ActionBody {
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExchangeAccepted {
    pub exchange_id: String,
}

impl From<PendingExchange> for ExchangeAccepted {
    fn from(pending: PendingExchange) -> Self {
        Self {
            exchange_id: pending.id.to_string(),
        }
    }
}

async fn perform_action(
    State(app): State<Arc<App>>,
    Json(body): Json<ActionBody>,
) -> Result<(StatusCode, Json<ExchangeAccepted>), ApiError> {
    let request = match (body.action_id, body.text) {
        (Some(id), None) => ActionRequest::Catalog(id),
        (None, Some(text)) => ActionRequest::FreeText(text),
        _ => {
            return Err(ApiError::BadRequest(
                "provide exactly one of action_id or text".into(),
            ))
        }
    };
    let pending = app.session.perform_action(request).await?;
    Ok((StatusCode::ACCEPTED, Json(pending.into())))
}

async fn complete_mission(
    State(app): State<Arc<App>>,
) -> Result<(StatusCode, Json<ExchangeAccepted>), ApiError> {
    let pending = app.session.complete_mission().await?;
    Ok((StatusCode::ACCEPTED, Json(pending.into())))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub advanced: bool,
}

async fn advance_mission(State(app): State<Arc<App>>) -> Result<Json<AdvanceResponse>, ApiError> {
    let advanced = app.session.advance_to_next_mission().await?;
    Ok(Json(AdvanceResponse { advanced }))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Unprocessable(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            ApiError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        let msg = e.to_string();
        match e {
            SessionError::Domain(domain) => match domain {
                DomainError::NotFound { .. } => ApiError::NotFound(msg),
                DomainError::ExchangeInFlight => ApiError::Conflict(msg),
                DomainError::Validation(_) | DomainError::Parse(_) => ApiError::BadRequest(msg),
                DomainError::OutOfRange { .. }
                | DomainError::ThresholdNotMet { .. }
                | DomainError::InvalidStateTransition(_)
                | DomainError::Constraint(_) => ApiError::Unprocessable(msg),
            },
            SessionError::Llm(LlmError::MissingCredential) => ApiError::BadRequest(msg),
            SessionError::Llm(_) | SessionError::Repo(_) => ApiError::Internal(msg),
        }
    }
}
