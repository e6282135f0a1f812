use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;

use super::mood::Mood;

/// What pulled the user away during a focus interval. The fixed options
/// mirror the check-in choices; anything else round-trips as free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distraction {
    None,
    SocialMedia,
    Phone,
    People,
    Thoughts,
    Other(String),
}

impl Distraction {
    pub fn label(&self) -> &str {
        match self {
            Self::None => "None",
            Self::SocialMedia => "Social media",
            Self::Phone => "Phone",
            Self::People => "People",
            Self::Thoughts => "Thoughts",
            Self::Other(text) => text,
        }
    }

    pub fn from_label(label: String) -> Self {
        match label.as_str() {
            "" | "None" => Self::None,
            "Social media" => Self::SocialMedia,
            "Phone" => Self::Phone,
            "People" => Self::People,
            "Thoughts" => Self::Thoughts,
            _ => Self::Other(label),
        }
    }
}

impl Default for Distraction {
    fn default() -> Self {
        Self::None
    }
}

impl TryFrom<String> for Distraction {
    type Error = std::convert::Infallible;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self::from_label(value))
    }
}

impl Serialize for Distraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Distraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_label(String::deserialize(deserializer)?))
    }
}

/// A fully check-ed-in focus session. `completed` is true only when the
/// whole configured duration elapsed without a reset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FocusSession {
    pub id: Uuid,
    pub user_id: String,
    pub duration_minutes: i64,
    pub break_minutes: i64,
    pub mood: Mood,
    pub label: String,
    pub note: String,
    pub comment: String,
    #[sqlx(try_from = "String")]
    pub distraction: Distraction,
    pub completed: bool,
    pub timestamp: DateTime<Utc>,
}

/// Produced by the session machine when a focus interval runs to completion.
/// Holds everything known at that point; mood/comment/distraction arrive with
/// the check-in. Only `finish` or `skip` turn it into a persistable record,
/// so a partial session can never be written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftFocusSession {
    pub user_id: String,
    pub label: String,
    pub note: String,
    pub duration_minutes: i64,
    pub break_minutes: i64,
    pub completed_at: DateTime<Utc>,
}

impl DraftFocusSession {
    pub fn finish(self, mood: Mood, comment: String, distraction: Distraction) -> NewFocusSession {
        NewFocusSession {
            user_id: self.user_id,
            duration_minutes: self.duration_minutes,
            break_minutes: self.break_minutes,
            mood,
            label: self.label,
            note: self.note,
            comment,
            distraction,
            completed: true,
            timestamp: self.completed_at,
        }
    }

    /// Explicit check-in skip: persists with neutral defaults rather than
    /// leaving a dangling draft.
    pub fn skip(self) -> NewFocusSession {
        self.finish(Mood::Neutral, String::new(), Distraction::None)
    }
}

/// Write-side shape; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewFocusSession {
    pub user_id: String,
    pub duration_minutes: i64,
    pub break_minutes: i64,
    pub mood: Mood,
    pub label: String,
    pub note: String,
    pub comment: String,
    pub distraction: Distraction,
    pub completed: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub user_id: String,
    /// Free-form label from the client; coerced into the fixed mood set.
    pub mood: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub distraction: Distraction,
}
