use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use services::{QuizServiceError, SessionError, StatsServiceError, ThemeServiceError};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Failures surfaced by HTTP handlers.
///
/// The message is what clients see; the underlying cause is logged when the
/// error is built.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn quiz(context: &'static str, err: &QuizServiceError) -> Self {
        match err {
            QuizServiceError::EmptyRequest => {
                Self::rejected("numbers array required", &err.to_string())
            }
            QuizServiceError::Malformed(cause) => {
                tracing::error!(error = %cause, "{context}: malformed question in bank");
                Self::Internal(context)
            }
            other => {
                tracing::error!(error = %other, "{context}");
                Self::Internal(context)
            }
        }
    }

    /// A client error, logged with the detail the client does not see.
    pub fn rejected(message: &'static str, detail: &str) -> Self {
        tracing::warn!(rejection = %detail, "{message}");
        Self::BadRequest(message)
    }

    pub fn stats(context: &'static str, err: &StatsServiceError) -> Self {
        match err {
            StatsServiceError::Stats(cause) => Self::rejected(
                "numbers and correctness must have the same length",
                &cause.to_string(),
            ),
            other => {
                tracing::error!(error = %other, "{context}");
                Self::Internal(context)
            }
        }
    }

    pub fn session(context: &'static str, err: &SessionError) -> Self {
        match err {
            SessionError::Quiz(inner) => Self::quiz(context, inner),
            SessionError::Stats(inner) => Self::stats(context, inner),
            other => {
                tracing::error!(error = %other, "{context}");
                Self::Internal(context)
            }
        }
    }

    pub fn theme(context: &'static str, err: &ThemeServiceError) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context)
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (Self::BadRequest(error) | Self::Internal(error)) = self;
        (status, Json(ErrorBody { error })).into_response()
    }
}
