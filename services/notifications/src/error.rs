use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Notifications service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum NotificationsServiceError {
    #[error("notification not found")]
    NotificationNotFound,
    #[error("sender not found")]
    SenderNotFound,
    /// Names the offending field.
    #[error("invalid notification {0}")]
    InvalidNotification(&'static str),
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl NotificationsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            Self::SenderNotFound => "SENDER_NOT_FOUND",
            Self::InvalidNotification(_) => "INVALID_NOTIFICATION",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for NotificationsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotificationNotFound | Self::SenderNotFound => StatusCode::NOT_FOUND,
            Self::InvalidNotification(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
