use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use validator::Validate;

use crate::classifier::{AnalysisSource, MoodAnalysis};
use crate::error::AppResult;
use crate::models::journal::{CreateJournalRequest, JournalEntry, NewJournalEntry, RecentQuery};
use crate::store::{ReadSource, StoreRead, DEFAULT_RECENT_LIMIT};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    pub id: Uuid,
    pub user_id: String,
    pub content: String,
    #[serde(flatten)]
    pub analysis: MoodAnalysis,
    pub timestamp: chrono::DateTime<Utc>,
    pub date: chrono::NaiveDate,
    /// "claude" when the completion API produced the analysis, "fallback"
    /// when the keyword classifier did.
    pub source: AnalysisSource,
}

/// Submits journal text: classify (the facade always produces a usable
/// analysis), then append. A failed write still answers 200 with the
/// sentinel id so the client flow isn't interrupted.
pub async fn create_entry(
    State(state): State<AppState>,
    Json(body): Json<CreateJournalRequest>,
) -> AppResult<Json<JournalEntryResponse>> {
    body.validate()?;

    let (analysis, source) = state.classifier.analyze(&body.content).await?;

    let timestamp = Utc::now();
    let entry = NewJournalEntry {
        user_id: body.user_id.clone(),
        content: body.content,
        mood: analysis.mood,
        suggestion: analysis.suggestion.clone(),
        timestamp,
    };
    let content = entry.content.clone();
    let id = state.store.save_journal_entry(entry).await;

    let _ = state.ws_tx.send(
        serde_json::json!({
            "type": "entry_saved",
            "user_id": body.user_id,
            "entry_id": id,
            "mood": analysis.mood,
        })
        .to_string(),
    );

    Ok(Json(JournalEntryResponse {
        id,
        user_id: body.user_id,
        content,
        analysis,
        timestamp,
        date: timestamp.date_naive(),
        source,
    }))
}

#[derive(Debug, Serialize)]
pub struct JournalListResponse {
    pub entries: Vec<JournalEntry>,
    /// "sample" means the built-in dataset stood in for the store.
    pub source: ReadSource,
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<JournalListResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let StoreRead { records, source } = state
        .store
        .recent_journal_entries(&query.user_id, limit)
        .await;

    Ok(Json(JournalListResponse {
        entries: records,
        source,
    }))
}
