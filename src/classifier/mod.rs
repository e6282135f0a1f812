//! Emotion classification: a remote completion-API call with aggressive
//! response repair, backed by a deterministic keyword fallback. The facade
//! (`analyze`) always hands back a usable `{mood, suggestion}` pair; only
//! input validation can fail it.

pub mod fallback;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::mood::Mood;

pub const MAX_TEXT_CHARS: usize = 2000;
const MAX_SUGGESTION_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct MoodAnalysis {
    pub mood: Mood,
    pub suggestion: String,
}

/// Where an analysis came from; responses carry the tag so clients can tell
/// a real classification from the keyword substitute.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Claude,
    Fallback,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    #[error("no text provided")]
    Empty,
    #[error("text exceeds {MAX_TEXT_CHARS} characters")]
    TooLong,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Claude API rate limited")]
    RateLimited,
    #[error("Claude API rejected credentials")]
    UpstreamAuth,
    #[error("Claude API error {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unusable completion payload: {0}")]
    Classification(String),
}

pub fn validate_text(text: &str) -> Result<(), TextError> {
    if text.trim().is_empty() {
        return Err(TextError::Empty);
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(TextError::TooLong);
    }
    Ok(())
}

#[derive(Clone)]
pub struct EmotionClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl EmotionClassifier {
    pub fn new(endpoint: String, api_key: String, model: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            endpoint,
            api_key,
            model,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.claude_api_url.clone(),
            config.claude_api_key.clone(),
            config.claude_model.clone(),
            config.claude_timeout_secs,
        )
    }

    /// The facade: validates, tries the completion API, and falls back to
    /// the keyword classifier on any remote failure. The fallback path is
    /// never taken for a successful-but-coerced response.
    pub async fn analyze(&self, text: &str) -> Result<(MoodAnalysis, AnalysisSource), TextError> {
        validate_text(text)?;
        match self.classify_remote(text).await {
            Ok(analysis) => Ok((analysis, AnalysisSource::Claude)),
            Err(e) => {
                tracing::warn!(error = %e, "Claude API unavailable, using keyword fallback");
                Ok((fallback::keyword_analysis(text), AnalysisSource::Fallback))
            }
        }
    }

    /// Strict remote path used by the proxy endpoint: upstream failures map
    /// to typed errors instead of falling back.
    pub async fn classify_remote(&self, text: &str) -> Result<MoodAnalysis, ClassifierError> {
        let prompt = analysis_prompt(text);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": self.model,
                "max_tokens": 150,
                "messages": [{
                    "role": "user",
                    "content": prompt
                }]
            }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClassifierError::RateLimited);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ClassifierError::UpstreamAuth);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let completion = payload["content"][0]["text"]
            .as_str()
            .ok_or_else(|| ClassifierError::Classification("missing content text".into()))?;

        parse_analysis(completion)
    }
}

fn analysis_prompt(text: &str) -> String {
    format!(
        r#"You are a helpful wellness assistant that analyzes journal entries for emotional state and provides supportive suggestions.

Analyze the journal entry below and return ONLY a JSON object with exactly these two fields:
- "mood": one of "happy", "sad", "angry", "anxious", "tired", "neutral", "excited", "calm"
- "suggestion": a brief, supportive suggestion (max 100 characters)

Be empathetic and supportive in your analysis.

Journal entry: "{text}""#
    )
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    mood: Option<String>,
    suggestion: Option<String>,
}

/// Parse policy, in order: direct JSON parse, then the first balanced
/// `{...}` substring, then give up. Out-of-set moods coerce to neutral;
/// over-long suggestions are clamped, not rejected.
pub fn parse_analysis(completion: &str) -> Result<MoodAnalysis, ClassifierError> {
    let raw: RawAnalysis = match serde_json::from_str(completion.trim()) {
        Ok(raw) => raw,
        Err(_) => {
            let candidate = extract_balanced_json(completion).ok_or_else(|| {
                ClassifierError::Classification("no JSON object in completion".into())
            })?;
            serde_json::from_str(candidate).map_err(|e| {
                ClassifierError::Classification(format!("embedded JSON unparsable: {e}"))
            })?
        }
    };

    let mood_label = raw
        .mood
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ClassifierError::Classification("missing mood field".into()))?;
    let suggestion = raw
        .suggestion
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ClassifierError::Classification("missing suggestion field".into()))?;

    Ok(MoodAnalysis {
        mood: Mood::coerce(&mood_label),
        suggestion: clamp_suggestion(&suggestion),
    })
}

/// First balanced `{...}` substring, string- and escape-aware so braces
/// inside JSON strings don't derail the scan.
fn extract_balanced_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn clamp_suggestion(suggestion: &str) -> String {
    suggestion.trim().chars().take(MAX_SUGGESTION_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_and_overlong_text() {
        assert_eq!(validate_text(""), Err(TextError::Empty));
        assert_eq!(validate_text("   "), Err(TextError::Empty));
        assert_eq!(validate_text(&"a".repeat(2001)), Err(TextError::TooLong));
        assert!(validate_text(&"a".repeat(2000)).is_ok());
        assert!(validate_text("fine").is_ok());
    }

    #[test]
    fn parses_clean_json() {
        let analysis =
            parse_analysis(r#"{"mood": "happy", "suggestion": "Nice!"}"#).unwrap();
        assert_eq!(analysis.mood, Mood::Happy);
        assert_eq!(analysis.suggestion, "Nice!");
    }

    #[test]
    fn repairs_json_wrapped_in_prose() {
        let completion = r#"Sure! {"mood":"happy","suggestion":"Nice!"} Hope that helps."#;
        let analysis = parse_analysis(completion).unwrap();
        assert_eq!(analysis.mood, Mood::Happy);
        assert_eq!(analysis.suggestion, "Nice!");
    }

    #[test]
    fn repair_skips_braces_inside_strings() {
        let completion = r#"Here you go: {"mood":"calm","suggestion":"Breathe in { and } out"}"#;
        let analysis = parse_analysis(completion).unwrap();
        assert_eq!(analysis.mood, Mood::Calm);
        assert_eq!(analysis.suggestion, "Breathe in { and } out");
    }

    #[test]
    fn out_of_set_mood_coerces_to_neutral_keeping_suggestion() {
        let analysis =
            parse_analysis(r#"{"mood": "ecstatic", "suggestion": "Ride the wave!"}"#).unwrap();
        assert_eq!(analysis.mood, Mood::Neutral);
        assert_eq!(analysis.suggestion, "Ride the wave!");
    }

    #[test]
    fn missing_or_empty_fields_are_classification_errors() {
        assert!(parse_analysis(r#"{"mood": "happy"}"#).is_err());
        assert!(parse_analysis(r#"{"suggestion": "hi"}"#).is_err());
        assert!(parse_analysis(r#"{"mood": "", "suggestion": "hi"}"#).is_err());
        assert!(parse_analysis("I cannot classify that.").is_err());
    }

    #[test]
    fn overlong_suggestions_are_clamped_to_a_hundred_chars() {
        let long = "x".repeat(150);
        let completion = format!(r#"{{"mood": "happy", "suggestion": "{long}"}}"#);
        let analysis = parse_analysis(&completion).unwrap();
        assert_eq!(analysis.suggestion.chars().count(), 100);
    }

    #[tokio::test]
    async fn facade_falls_back_when_endpoint_is_unreachable() {
        // Port 9 (discard) refuses connections immediately.
        let classifier = EmotionClassifier::new(
            "http://127.0.0.1:9/v1/messages".into(),
            "test-key".into(),
            "claude-sonnet-4-20250514".into(),
            1,
        );
        let (analysis, source) = classifier
            .analyze("I feel so stressed and worried")
            .await
            .unwrap();
        assert_eq!(source, AnalysisSource::Fallback);
        assert_eq!(analysis.mood, Mood::Anxious);
    }

    #[tokio::test]
    async fn facade_surfaces_validation_errors() {
        let classifier = EmotionClassifier::new(
            "http://127.0.0.1:9/v1/messages".into(),
            "test-key".into(),
            "claude-sonnet-4-20250514".into(),
            1,
        );
        assert_eq!(classifier.analyze("").await.unwrap_err(), TextError::Empty);
    }
}
