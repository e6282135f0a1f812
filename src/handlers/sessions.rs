use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::journal::RecentQuery;
use crate::models::mood::Mood;
use crate::models::session::{CheckinRequest, FocusSession};
use crate::store::{ReadSource, StoreRead, DEFAULT_RECENT_LIMIT};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    pub id: Uuid,
    pub mood: Mood,
    pub completed: bool,
}

/// Second phase of focus-session construction: the check-in supplies
/// mood/comment/distraction and the parked draft becomes a persisted
/// record. Without a parked draft there is nothing to check in to.
pub async fn checkin(
    State(state): State<AppState>,
    Json(body): Json<CheckinRequest>,
) -> AppResult<Json<CheckinResponse>> {
    let draft = state
        .timers
        .take_draft(&body.user_id)
        .await
        .ok_or_else(|| {
            AppError::NotFound("No completed focus session awaiting check-in".into())
        })?;

    let session = draft.finish(Mood::coerce(&body.mood), body.comment, body.distraction);
    let mood = session.mood;
    let id = state.store.save_focus_session(session).await;

    let _ = state.ws_tx.send(
        serde_json::json!({
            "type": "session_saved",
            "user_id": body.user_id,
            "session_id": id,
            "mood": mood,
        })
        .to_string(),
    );

    Ok(Json(CheckinResponse {
        id,
        mood,
        completed: true,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SkipRequest {
    pub user_id: String,
}

/// Explicit skip: the draft persists with neutral defaults instead of
/// lingering unchecked.
pub async fn skip_checkin(
    State(state): State<AppState>,
    Json(body): Json<SkipRequest>,
) -> AppResult<Json<CheckinResponse>> {
    let draft = state
        .timers
        .take_draft(&body.user_id)
        .await
        .ok_or_else(|| {
            AppError::NotFound("No completed focus session awaiting check-in".into())
        })?;

    let session = draft.skip();
    let mood = session.mood;
    let id = state.store.save_focus_session(session).await;

    Ok(Json(CheckinResponse {
        id,
        mood,
        completed: true,
    }))
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<FocusSession>,
    pub source: ReadSource,
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<SessionListResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let StoreRead { records, source } = state
        .store
        .recent_focus_sessions(&query.user_id, limit)
        .await;

    Ok(Json(SessionListResponse {
        sessions: records,
        source,
    }))
}
