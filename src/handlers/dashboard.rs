use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::journal::JournalEntry;
use crate::stats::{self, FocusTotals, WeeklyReport};
use crate::store::ReadSource;
use crate::AppState;

const DASHBOARD_SESSION_WINDOW: i64 = 10;
const DASHBOARD_ENTRY_WINDOW: i64 = 50;
const REPORT_WINDOW: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub focus: FocusTotals,
    pub journal_streak: u32,
    /// "None" when every session in the window was distraction-free.
    pub top_distraction: String,
    pub daily_goal: u32,
    pub goal_reached: bool,
    pub motivational_message: String,
    pub recent_entries: Vec<JournalEntry>,
    pub sessions_source: ReadSource,
    pub entries_source: ReadSource,
}

/// Pure projection of the two recent-record windows; recomputed on every
/// read, no state of its own.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let sessions = state
        .store
        .recent_focus_sessions(&query.user_id, DASHBOARD_SESSION_WINDOW)
        .await;
    let entries = state
        .store
        .recent_journal_entries(&query.user_id, DASHBOARD_ENTRY_WINDOW)
        .await;

    let today = Utc::now().date_naive();
    let focus = stats::focus_totals(&sessions.records, today);
    let journal_streak = stats::journal_streak(&entries.records, today);
    let settings = state.settings.current().await;

    Ok(Json(DashboardResponse {
        goal_reached: focus.completed_today >= settings.daily_goal,
        motivational_message: stats::motivational_message(journal_streak, focus.latest_mood),
        top_distraction: stats::top_distraction(&sessions.records)
            .unwrap_or_else(|| "None".into()),
        journal_streak,
        daily_goal: settings.daily_goal,
        focus,
        recent_entries: entries.records,
        sessions_source: sessions.source,
        entries_source: entries.source,
    }))
}

pub async fn get_weekly_report(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<WeeklyReport>> {
    let entries = state
        .store
        .recent_journal_entries(&query.user_id, REPORT_WINDOW)
        .await;
    let sessions = state
        .store
        .recent_focus_sessions(&query.user_id, REPORT_WINDOW)
        .await;

    Ok(Json(stats::weekly_report(
        &entries.records,
        &sessions.records,
        Utc::now(),
    )))
}
