use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Breaks service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum BreaksServiceError {
    #[error("break not found")]
    BreakNotFound,
    /// Names the offending form field.
    #[error("invalid time of day for {0}")]
    InvalidTimeOfDay(&'static str),
    #[error("break must not start and end at the same time")]
    InvalidBreakWindow,
    #[error("invalid break name")]
    InvalidBreakName,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl BreaksServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BreakNotFound => "BREAK_NOT_FOUND",
            Self::InvalidTimeOfDay(_) => "INVALID_TIME_OF_DAY",
            Self::InvalidBreakWindow => "INVALID_BREAK_WINDOW",
            Self::InvalidBreakName => "INVALID_BREAK_NAME",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for BreaksServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BreakNotFound => StatusCode::NOT_FOUND,
            Self::InvalidTimeOfDay(_) | Self::InvalidBreakWindow | Self::InvalidBreakName => {
                StatusCode::BAD_REQUEST
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors; only internal failures are logged.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
