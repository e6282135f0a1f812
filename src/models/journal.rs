use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::mood::Mood;

/// Immutable once written; the `date` column is derived from `timestamp`
/// at save time and drives streak calculation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: String,
    pub content: String,
    pub mood: Mood,
    pub suggestion: String,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
}

/// Write-side shape; the store assigns the id and derives `date`.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    pub user_id: String,
    pub content: String,
    pub mood: Mood,
    pub suggestion: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalRequest {
    #[validate(length(min = 1, max = 64, message = "user_id must be 1-64 characters"))]
    pub user_id: String,

    #[validate(length(min = 1, max = 2000, message = "Journal entry must be 1-2000 characters"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub user_id: String,
    pub limit: Option<i64>,
}
