use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::classifier::{ClassifierError, TextError, MAX_TEXT_CHARS};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller-supplied input malformed. Surfaced as a field-level message,
    /// never retried.
    #[error("{message}")]
    Validation { error: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    /// The completion API failed in a way the analyze endpoint passes
    /// through (its own status mapping, not ours).
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        error: String,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            error: error.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request".into());
        AppError::validation("Validation failed", message)
    }
}

impl From<TextError> for AppError {
    fn from(e: TextError) -> Self {
        match e {
            TextError::Empty => AppError::validation(
                "No text provided",
                "Please provide journal text for analysis",
            ),
            TextError::TooLong => AppError::validation(
                "Text too long",
                format!("Journal entry must be less than {MAX_TEXT_CHARS} characters"),
            ),
        }
    }
}

impl From<ClassifierError> for AppError {
    fn from(e: ClassifierError) -> Self {
        match e {
            ClassifierError::RateLimited => AppError::Upstream {
                status: StatusCode::TOO_MANY_REQUESTS,
                error: "Rate limit exceeded".into(),
                message: "Too many requests to the Claude API. Please try again later.".into(),
            },
            ClassifierError::UpstreamAuth => AppError::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "Claude API key invalid".into(),
                message: "Please check your Claude API configuration".into(),
            },
            e => {
                tracing::error!(error = %e, "Emotion analysis failed");
                AppError::Upstream {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: "Failed to analyze emotion".into(),
                    message: "An error occurred while analyzing your journal entry. Please try again."
                        .into(),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Validation { error, message } => (StatusCode::BAD_REQUEST, error, message),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found".into(), msg),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded".into(),
                "Too many requests. Please try again later.".into(),
            ),
            AppError::Upstream {
                status,
                error,
                message,
            } => (status, error, message),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                    "Something went wrong on the server".into(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                    "Something went wrong on the server".into(),
                )
            }
        };

        let body = json!({
            "error": error,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
