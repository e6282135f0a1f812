use serde::{Deserialize, Serialize};

/// The closed mood set used across the API, the timer check-in, and storage.
/// Anything outside this set entering the system is coerced to `Neutral`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "mood", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Anxious,
    Tired,
    Neutral,
    Excited,
    Calm,
}

impl Default for Mood {
    fn default() -> Self {
        Self::Neutral
    }
}

impl Mood {
    /// Case-insensitive parse; unknown labels coerce to `Neutral` rather
    /// than erroring.
    pub fn coerce(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "happy" => Self::Happy,
            "sad" => Self::Sad,
            "angry" => Self::Angry,
            "anxious" => Self::Anxious,
            "tired" => Self::Tired,
            "neutral" => Self::Neutral,
            "excited" => Self::Excited,
            "calm" => Self::Calm,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Anxious => "anxious",
            Self::Tired => "tired",
            Self::Neutral => "neutral",
            Self::Excited => "excited",
            Self::Calm => "calm",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_accepts_known_moods_case_insensitively() {
        assert_eq!(Mood::coerce("Happy"), Mood::Happy);
        assert_eq!(Mood::coerce("ANXIOUS"), Mood::Anxious);
        assert_eq!(Mood::coerce("calm"), Mood::Calm);
    }

    #[test]
    fn coerce_maps_unknown_labels_to_neutral() {
        assert_eq!(Mood::coerce("ecstatic"), Mood::Neutral);
        assert_eq!(Mood::coerce(""), Mood::Neutral);
        assert_eq!(Mood::coerce("melancholy"), Mood::Neutral);
    }
}
