use axum::{extract::State, Json};

use crate::error::{AppError, AppResult};
use crate::settings::{Settings, UpdateSettingsRequest};
use crate::AppState;

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.settings.current().await)
}

/// Partial update: present fields overwrite, the rest stay. The merged
/// result is persisted immediately and pushed into every live session
/// machine (queued past the end of any interval currently running).
pub async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<UpdateSettingsRequest>,
) -> AppResult<Json<Settings>> {
    body.validate()
        .map_err(|message| AppError::validation("Invalid settings", message))?;

    let updated = state.settings.update(&body).await;
    state.timers.update_settings(updated.clone()).await;

    Ok(Json(updated))
}
