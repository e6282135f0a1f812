//! Deterministic keyword classifier used whenever the completion API is
//! unreachable or returns something unusable. Checks run in a fixed order
//! over the lower-cased input; first match wins.

use crate::models::mood::Mood;

use super::MoodAnalysis;

const KEYWORD_TABLE: &[(&[&str], Mood, &str)] = &[
    (
        &["happy", "great", "excited"],
        Mood::Happy,
        "Keep up the positive energy! \u{1f31f}",
    ),
    (
        &["sad", "depressed", "down"],
        Mood::Sad,
        "It's okay to feel this way. Take care of yourself. \u{1f499}",
    ),
    (
        &["stress", "anxious", "worried"],
        Mood::Anxious,
        "Try some deep breathing exercises. \u{1f9d8}\u{200d}\u{2640}\u{fe0f}",
    ),
    (
        &["angry", "frustrated", "mad"],
        Mood::Angry,
        "Take a moment to pause and breathe. \u{1f624}",
    ),
    (
        &["tired", "exhausted", "burnout"],
        Mood::Tired,
        "Rest is essential. Give yourself permission to recharge. \u{1f634}",
    ),
];

const NEUTRAL_SUGGESTION: &str = "Thanks for sharing your thoughts. \u{1f4dd}";

pub fn keyword_analysis(text: &str) -> MoodAnalysis {
    let lower = text.to_lowercase();
    for (keywords, mood, suggestion) in KEYWORD_TABLE {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return MoodAnalysis {
                mood: *mood,
                suggestion: (*suggestion).to_string(),
            };
        }
    }
    MoodAnalysis {
        mood: Mood::Neutral,
        suggestion: NEUTRAL_SUGGESTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stressed_and_worried_reads_as_anxious() {
        let analysis = keyword_analysis("I feel so stressed and worried");
        assert_eq!(analysis.mood, Mood::Anxious);
    }

    #[test]
    fn keyword_order_gives_happy_precedence() {
        // "happy" appears in the first rule, so a mixed sentence matches it.
        let analysis = keyword_analysis("happy but also tired");
        assert_eq!(analysis.mood, Mood::Happy);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(keyword_analysis("FRUSTRATED with this bug").mood, Mood::Angry);
        assert_eq!(keyword_analysis("Complete Burnout lately").mood, Mood::Tired);
    }

    #[test]
    fn unmatched_text_is_neutral_with_canned_suggestion() {
        let analysis = keyword_analysis("wrote some code and had lunch");
        assert_eq!(analysis.mood, Mood::Neutral);
        assert_eq!(analysis.suggestion, NEUTRAL_SUGGESTION);
    }

    #[test]
    fn suggestions_stay_within_the_hundred_char_budget() {
        for (_, _, suggestion) in KEYWORD_TABLE {
            assert!(suggestion.chars().count() <= 100);
        }
        assert!(NEUTRAL_SUGGESTION.chars().count() <= 100);
    }
}
