use axum::{extract::State, Json};
use serde::Deserialize;

use crate::classifier::{validate_text, MoodAnalysis};
use crate::error::AppResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

/// Strict proxy semantics: validation failures are 400, an upstream rate
/// limit is 429, anything else the completion API does wrong is 500. The
/// keyword fallback lives in the journal flow, not here — this endpoint
/// reports the remote service's real behavior.
pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> AppResult<Json<MoodAnalysis>> {
    validate_text(&body.text)?;

    tracing::info!(chars = body.text.chars().count(), "Analyzing journal entry");

    let analysis = state.classifier.classify_remote(&body.text).await?;

    tracing::info!(mood = %analysis.mood, "Analysis complete");
    Ok(Json(analysis))
}
