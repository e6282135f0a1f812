//! Dashboard and weekly-report projections. Everything here is a pure
//! function of the last-read entry/session sequences; nothing holds state
//! and everything is recomputed per read.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::models::journal::JournalEntry;
use crate::models::mood::Mood;
use crate::models::session::{Distraction, FocusSession};

/// Consecutive calendar days with at least one journal entry, anchored at
/// `today` and walking backward. A most-recent entry older than today means
/// no streak.
pub fn journal_streak(entries: &[JournalEntry], today: NaiveDate) -> u32 {
    let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    dates.sort_unstable();
    dates.dedup();
    dates.reverse();

    let mut streak: u32 = 0;
    for date in dates {
        if date == today - Duration::days(streak as i64) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

#[derive(Debug, Clone, Serialize)]
pub struct FocusTotals {
    pub total_sessions: u64,
    pub total_minutes: i64,
    /// The most recent session's mood, `neutral` with no sessions.
    pub latest_mood: Mood,
    pub completed_today: u32,
}

/// Simple reductions over the recent-session window. `sessions` is expected
/// newest-first, as the store returns it.
pub fn focus_totals(sessions: &[FocusSession], today: NaiveDate) -> FocusTotals {
    FocusTotals {
        total_sessions: sessions.len() as u64,
        total_minutes: sessions.iter().map(|s| s.duration_minutes).sum(),
        latest_mood: sessions.first().map(|s| s.mood).unwrap_or_default(),
        completed_today: sessions
            .iter()
            .filter(|s| s.timestamp.date_naive() == today)
            .count() as u32,
    }
}

/// Mode of the distraction field, excluding the `None` sentinel.
pub fn top_distraction(sessions: &[FocusSession]) -> Option<String> {
    distraction_counts(sessions)
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(label, _)| label)
}

/// The `n` most frequent distractions, most frequent first.
pub fn top_distractions(sessions: &[FocusSession], n: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = distraction_counts(sessions).into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.into_iter().take(n).map(|(label, _)| label).collect()
}

fn distraction_counts(sessions: &[FocusSession]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for session in sessions {
        if session.distraction == Distraction::None {
            continue;
        }
        *counts
            .entry(session.distraction.label().to_string())
            .or_insert(0) += 1;
    }
    counts
}

/// Most frequent mood across the entries, `neutral` when empty. Ties break
/// toward the mood seen most recently (entries arrive newest-first).
pub fn dominant_mood(entries: &[JournalEntry]) -> Mood {
    let mut counts: HashMap<Mood, usize> = HashMap::new();
    let mut first_seen: HashMap<Mood, usize> = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        *counts.entry(entry.mood).or_insert(0) += 1;
        first_seen.entry(entry.mood).or_insert(index);
    }
    counts
        .into_iter()
        .min_by_key(|(mood, count)| (std::cmp::Reverse(*count), first_seen[mood]))
        .map(|(mood, _)| mood)
        .unwrap_or_default()
}

pub fn motivational_message(streak: u32, mood: Mood) -> String {
    if streak >= 7 {
        return "Amazing! You're on a 7-day streak! Keep it up!".into();
    }
    match mood {
        Mood::Happy => "Great mood! Keep spreading positivity.".into(),
        Mood::Sad => "It's okay to have down days. Tomorrow is a new start!".into(),
        _ => "Keep going! Every step counts.".into(),
    }
}

#[derive(Debug, Serialize)]
pub struct WeekFocusStats {
    pub total_sessions: u64,
    pub total_minutes: i64,
    pub average_session_minutes: i64,
    /// Share of sessions flagged completed, as a rounded percentage.
    pub completion_rate: u32,
}

#[derive(Debug, Serialize)]
pub struct WeeklyReport {
    pub summary: String,
    pub mood_trend: String,
    pub focus_stats: WeekFocusStats,
    pub top_distractions: Vec<String>,
    pub recommendations: Vec<String>,
    pub week_range: String,
}

pub fn weekly_report(
    entries: &[JournalEntry],
    sessions: &[FocusSession],
    now: DateTime<Utc>,
) -> WeeklyReport {
    let week_ago = now - Duration::days(7);
    let week_entries: Vec<JournalEntry> = entries
        .iter()
        .filter(|e| e.timestamp >= week_ago)
        .cloned()
        .collect();
    let week_sessions: Vec<FocusSession> = sessions
        .iter()
        .filter(|s| s.timestamp >= week_ago)
        .cloned()
        .collect();

    let total_sessions = week_sessions.len() as u64;
    let total_minutes: i64 = week_sessions.iter().map(|s| s.duration_minutes).sum();
    let average_session_minutes = if total_sessions > 0 {
        (total_minutes as f64 / total_sessions as f64).round() as i64
    } else {
        0
    };
    let completion_rate = if total_sessions > 0 {
        let completed = week_sessions.iter().filter(|s| s.completed).count();
        ((completed as f64 / total_sessions as f64) * 100.0).round() as u32
    } else {
        0
    };

    let mood = dominant_mood(&week_entries);
    let distractions = top_distractions(&week_sessions, 3);

    WeeklyReport {
        summary: week_summary(week_entries.len(), week_sessions.len(), mood),
        mood_trend: mood_trend(week_entries.len(), mood),
        focus_stats: WeekFocusStats {
            total_sessions,
            total_minutes,
            average_session_minutes,
            completion_rate,
        },
        recommendations: recommendations(
            week_entries.len(),
            &week_sessions,
            &distractions,
        ),
        top_distractions: distractions,
        week_range: format!(
            "{} - {}",
            week_ago.date_naive().format("%Y-%m-%d"),
            now.date_naive().format("%Y-%m-%d")
        ),
    }
}

fn week_summary(entry_count: usize, session_count: usize, mood: Mood) -> String {
    if entry_count == 0 && session_count == 0 {
        return "This week was quiet. Consider starting your wellness journey with a journal entry or focus session!".into();
    }
    format!(
        "This week, you completed {session_count} focus sessions and wrote {entry_count} journal entries. Your overall mood trended toward {mood}. Keep up the great work!"
    )
}

fn mood_trend(entry_count: usize, mood: Mood) -> String {
    if entry_count == 0 {
        return "No mood data available this week.".into();
    }
    match mood {
        Mood::Happy => "You've been feeling positive and upbeat this week!".into(),
        Mood::Sad => {
            "You've had some challenging moments this week. Remember, it's okay to not be okay."
                .into()
        }
        Mood::Neutral => "You've maintained a balanced emotional state this week.".into(),
        Mood::Anxious => {
            "You've experienced some anxiety this week. Consider practicing mindfulness.".into()
        }
        Mood::Excited => "You've been enthusiastic and motivated this week!".into(),
        _ => "Your mood has been varied this week.".into(),
    }
}

fn recommendations(
    entry_count: usize,
    sessions: &[FocusSession],
    distractions: &[String],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if sessions.len() < 3 {
        recommendations.push(
            "Try to complete at least 3 focus sessions next week for better productivity."
                .to_string(),
        );
    }
    if entry_count < 2 {
        recommendations.push(
            "Consider journaling more frequently to track your emotional well-being.".to_string(),
        );
    }
    if let Some(top) = distractions.first() {
        recommendations.push(format!(
            "Your main distraction is {top}. Try setting your phone to Do Not Disturb during focus sessions."
        ));
    }
    if !sessions.is_empty() {
        let avg = sessions.iter().map(|s| s.duration_minutes).sum::<i64>() / sessions.len() as i64;
        if avg < 25 {
            recommendations.push(
                "Your sessions are quite short. Try extending them to 25-30 minutes for better focus."
                    .to_string(),
            );
        }
    }
    if recommendations.is_empty() {
        recommendations.push(
            "You're doing great! Keep maintaining this balance of focus and reflection."
                .to_string(),
        );
    }

    recommendations.truncate(3);
    recommendations
}
