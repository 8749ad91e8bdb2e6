//! Firebase Cloud Messaging HTTP v1 push provider.
//!
//! The v1 API has no multicast endpoint, so one multicast is a bounded-
//! concurrency burst of single-token sends whose results keep token order.

use std::collections::BTreeMap;

use anyhow::Context as _;
use futures::{StreamExt as _, TryStreamExt as _, stream};
use serde::{Deserialize, Serialize};

use crate::domain::repository::PushProvider;
use crate::domain::types::{
    INVALID_ARGUMENT, INVALID_REGISTRATION_TOKEN, PushMessage, SendResult, TOKEN_NOT_REGISTERED,
};
use crate::error::NotificationsServiceError;

const UNKNOWN_ERROR: &str = "messaging/unknown-error";

/// Map an FCM v1 error code to the stable code stored in delivery logs.
pub fn map_error_code(fcm_code: &str) -> &'static str {
    match fcm_code {
        "UNREGISTERED" => TOKEN_NOT_REGISTERED,
        "INVALID_ARGUMENT" => INVALID_ARGUMENT,
        "SENDER_ID_MISMATCH" => "messaging/mismatched-credential",
        "QUOTA_EXCEEDED" => "messaging/message-rate-exceeded",
        "UNAVAILABLE" => "messaging/server-unavailable",
        "INTERNAL" => "messaging/internal-error",
        "THIRD_PARTY_AUTH_ERROR" => "messaging/third-party-auth-error",
        _ => UNKNOWN_ERROR,
    }
}

#[derive(Clone)]
pub struct FcmPushProvider {
    client: reqwest::Client,
    send_url: String,
    access_token: String,
    max_in_flight: usize,
}

impl FcmPushProvider {
    pub fn new(
        client: reqwest::Client,
        endpoint: &str,
        project_id: &str,
        access_token: String,
        max_in_flight: usize,
    ) -> Self {
        Self {
            client,
            send_url: format!(
                "{}/v1/projects/{project_id}/messages:send",
                endpoint.trim_end_matches('/')
            ),
            access_token,
            max_in_flight: max_in_flight.max(1),
        }
    }

    async fn send_one(
        &self,
        token: &str,
        message: &PushMessage,
    ) -> Result<SendResult, NotificationsServiceError> {
        let body = SendRequest {
            message: FcmMessage {
                token,
                notification: FcmNotification {
                    title: &message.title,
                    body: &message.body,
                },
                data: &message.data,
            },
        };
        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .context("send FCM message")?;

        if response.status().is_success() {
            return Ok(SendResult::Delivered);
        }

        let status = response.status();
        let code = match response.json::<ErrorResponse>().await {
            Ok(error) => error.error.stable_code(),
            Err(_) => UNKNOWN_ERROR,
        };
        tracing::debug!(%status, code, "FCM rejected token");
        Ok(SendResult::Failed {
            code: code.to_owned(),
        })
    }
}

impl PushProvider for FcmPushProvider {
    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<Vec<SendResult>, NotificationsServiceError> {
        let sends: Vec<_> = tokens
            .iter()
            .map(|token| self.send_one(token, message))
            .collect();
        stream::iter(sends)
            .buffered(self.max_in_flight)
            .try_collect()
            .await
    }
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SendRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
    data: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetail {
    error_code: Option<String>,
    #[serde(default)]
    field_violations: Vec<FieldViolation>,
}

#[derive(Deserialize)]
struct FieldViolation {
    #[serde(default)]
    field: String,
}

impl ErrorBody {
    /// The FCM-specific code from `details` when present, else the canonical status.
    fn fcm_code(&self) -> &str {
        self.details
            .iter()
            .find_map(|d| d.error_code.as_deref())
            .unwrap_or(&self.status)
    }

    /// `INVALID_ARGUMENT` also covers payload problems, so it only counts as a
    /// bad token when the error points at `message.token`.
    fn stable_code(&self) -> &'static str {
        let code = self.fcm_code();
        if code == "INVALID_ARGUMENT" && self.blames_token() {
            return INVALID_REGISTRATION_TOKEN;
        }
        map_error_code(code)
    }

    fn blames_token(&self) -> bool {
        self.details
            .iter()
            .flat_map(|d| &d.field_violations)
            .any(|v| v.field == "message.token")
            || self.message.contains("registration token")
    }
}
