use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::timer::MachineSnapshot;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TimerActionRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SessionInfoRequest {
    #[validate(length(min = 1, max = 64, message = "user_id must be 1-64 characters"))]
    pub user_id: String,

    #[serde(default)]
    #[validate(length(max = 200, message = "Label must be under 200 characters"))]
    pub label: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Note must be under 2000 characters"))]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub user_id: String,
}

fn require_user(user_id: &str) -> AppResult<()> {
    if user_id.trim().is_empty() {
        return Err(AppError::validation(
            "Missing user",
            "A user_id is required for timer operations",
        ));
    }
    Ok(())
}

pub async fn start(
    State(state): State<AppState>,
    Json(body): Json<TimerActionRequest>,
) -> AppResult<Json<MachineSnapshot>> {
    require_user(&body.user_id)?;
    let settings = state.settings.current().await;
    state.timers.start(&body.user_id, settings.clone()).await;
    Ok(Json(state.timers.snapshot(&body.user_id, settings).await))
}

pub async fn pause(
    State(state): State<AppState>,
    Json(body): Json<TimerActionRequest>,
) -> AppResult<Json<MachineSnapshot>> {
    require_user(&body.user_id)?;
    state.timers.pause(&body.user_id).await;
    let settings = state.settings.current().await;
    Ok(Json(state.timers.snapshot(&body.user_id, settings).await))
}

/// User-initiated abort: back to an idle Focus interval. The aborted run
/// never counts as completed and produces no draft.
pub async fn reset(
    State(state): State<AppState>,
    Json(body): Json<TimerActionRequest>,
) -> AppResult<Json<MachineSnapshot>> {
    require_user(&body.user_id)?;
    state.timers.reset(&body.user_id).await;
    let settings = state.settings.current().await;
    Ok(Json(state.timers.snapshot(&body.user_id, settings).await))
}

/// Label/note for the focus interval in progress; they ride along into the
/// draft when the interval completes.
pub async fn set_session_info(
    State(state): State<AppState>,
    Json(body): Json<SessionInfoRequest>,
) -> AppResult<Json<Value>> {
    body.validate()?;
    let settings = state.settings.current().await;
    state
        .timers
        .set_session_info(&body.user_id, settings, body.label, body.note)
        .await;
    Ok(Json(json!({ "updated": true })))
}

pub async fn get_state(
    State(state): State<AppState>,
    Query(query): Query<StateQuery>,
) -> AppResult<Json<TimerStateResponse>> {
    require_user(&query.user_id)?;
    let settings = state.settings.current().await;
    let snapshot = state.timers.snapshot(&query.user_id, settings.clone()).await;
    Ok(Json(TimerStateResponse {
        snapshot,
        pomodoros_until_long_break: settings.pomodoros_until_long_break,
    }))
}

#[derive(Debug, Serialize)]
pub struct TimerStateResponse {
    #[serde(flatten)]
    pub snapshot: MachineSnapshot,
    /// Echoed so clients can render "session N of M" without a second call.
    pub pomodoros_until_long_break: u32,
}
