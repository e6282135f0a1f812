//! Built-in sample dataset served when the backing store is unreachable, or
//! when the demo user's collections are empty. Timestamps are anchored to
//! "now" so the dashboard's streak and today-counts stay believable.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::models::journal::JournalEntry;
use crate::models::mood::Mood;
use crate::models::session::{Distraction, FocusSession};

pub fn sample_focus_sessions(user_id: &str) -> Vec<FocusSession> {
    let now = Utc::now();
    vec![
        FocusSession {
            id: Uuid::from_u128(1),
            user_id: user_id.to_string(),
            duration_minutes: 25,
            break_minutes: 5,
            mood: Mood::Happy,
            label: "Study Session".into(),
            note: "Focused on React development".into(),
            comment: "Great productivity today!".into(),
            distraction: Distraction::None,
            completed: true,
            timestamp: now - Duration::days(1),
        },
        FocusSession {
            id: Uuid::from_u128(2),
            user_id: user_id.to_string(),
            duration_minutes: 30,
            break_minutes: 5,
            mood: Mood::Neutral,
            label: "Work Session".into(),
            note: "Completed project tasks".into(),
            comment: "Steady progress".into(),
            distraction: Distraction::Phone,
            completed: true,
            timestamp: now - Duration::days(2),
        },
    ]
}

pub fn sample_journal_entries(user_id: &str) -> Vec<JournalEntry> {
    let now = Utc::now();
    let one_day_ago = now - Duration::days(1);
    let two_days_ago = now - Duration::days(2);
    vec![
        JournalEntry {
            id: Uuid::from_u128(1),
            user_id: user_id.to_string(),
            content: "Had a productive day working on my project. Feeling accomplished!".into(),
            mood: Mood::Happy,
            suggestion: "Keep up the great work! Your consistency is paying off.".into(),
            timestamp: one_day_ago,
            date: one_day_ago.date_naive(),
        },
        JournalEntry {
            id: Uuid::from_u128(2),
            user_id: user_id.to_string(),
            content: "Feeling a bit tired today but managed to get some work done.".into(),
            mood: Mood::Neutral,
            suggestion: "Consider taking a short break to recharge.".into(),
            timestamp: two_days_ago,
            date: two_days_ago.date_naive(),
        },
    ]
}
