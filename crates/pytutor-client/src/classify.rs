// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response classification.
//!
//! Pure functions from a raw status/body pair (or a transport error) to an
//! [`AttemptOutcome`], so every branch can be tested without a server.

use pytutor_core::{HealthStatus, RawResponse, RequestId, TransportError, TutorError, TutorReply};
use serde_json::{Map, Value};
use tracing::warn;

use crate::retry::{AttemptOutcome, TIMEOUT_REASON};
use crate::types::{BackendErrorBody, HealthBody};

/// Statuses worth retrying: rate limiting and transient gateway/server errors.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// A parsed 2xx JSON object.
pub type ResponseObject = Map<String, Value>;

/// A failure that retrying will not fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalFailure {
    /// A 2xx response whose body is not a JSON object.
    MalformedResponse(String),
    /// A non-2xx, non-retryable status.
    Backend { status: u16, message: String },
}

impl From<TerminalFailure> for TutorError {
    fn from(failure: TerminalFailure) -> Self {
        match failure {
            TerminalFailure::MalformedResponse(detail) => TutorError::MalformedResponse(detail),
            TerminalFailure::Backend { status, message } => TutorError::Terminal {
                status: Some(status),
                message,
            },
        }
    }
}

/// Outcome of one attempt as seen by the retry scheduler.
pub type Classification = AttemptOutcome<ResponseObject, TerminalFailure>;

/// Classifies a completed HTTP exchange.
pub fn classify_response(status: u16, body: &str) -> Classification {
    if (200..300).contains(&status) {
        return match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(object)) => AttemptOutcome::Success(object),
            Ok(other) => AttemptOutcome::Terminal(TerminalFailure::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => AttemptOutcome::Terminal(TerminalFailure::MalformedResponse(e.to_string())),
        };
    }

    if let Some(parsed) = BackendErrorBody::parse(body) {
        warn!(
            status,
            error = parsed.error.as_deref().unwrap_or_default(),
            backend_request_id = parsed.request_id.as_deref().unwrap_or_default(),
            "backend returned an error body"
        );
    }

    if RETRYABLE_STATUSES.contains(&status) {
        AttemptOutcome::Retryable(format!("transient backend error {status}"))
    } else {
        AttemptOutcome::Terminal(TerminalFailure::Backend {
            status,
            message: format!("backend error {status}: {body}"),
        })
    }
}

/// Classifies a transport-level failure.
///
/// Every transport error is treated as possibly transient, including
/// connection refusals that may in fact be permanent.
pub fn classify_transport_error(error: &TransportError) -> Classification {
    match error {
        TransportError::Timeout => AttemptOutcome::Retryable(TIMEOUT_REASON.to_string()),
        other => AttemptOutcome::Retryable(other.to_string()),
    }
}

/// Classifies either side of a transport call.
pub fn classify(result: &Result<RawResponse, TransportError>) -> Classification {
    match result {
        Ok(raw) => classify_response(raw.status, &raw.body),
        Err(e) => classify_transport_error(e),
    }
}

/// Turns a successful response object into a [`TutorReply`].
///
/// A missing, non-string, or whitespace-only `answer` yields
/// [`TutorReply::EmptyAnswer`]. The backend's `request_id` wins over the
/// client-generated one when present.
pub fn extract_reply(object: &ResponseObject, sent_id: &RequestId, attempts: u32) -> TutorReply {
    let request_id = object
        .get("request_id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .map(|id| RequestId(id.to_string()))
        .unwrap_or_else(|| sent_id.clone());

    match object.get("answer").and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => TutorReply::Answer {
            text: text.to_string(),
            request_id,
            attempts,
        },
        _ => TutorReply::EmptyAnswer {
            request_id,
            attempts,
        },
    }
}

/// Maps a health probe result onto a [`HealthStatus`].
pub fn classify_health(result: &Result<RawResponse, TransportError>) -> HealthStatus {
    match result {
        Ok(raw) if (200..300).contains(&raw.status) => {
            match serde_json::from_str::<HealthBody>(&raw.body) {
                Ok(body) if body.status.eq_ignore_ascii_case("ok") => HealthStatus::Healthy,
                Ok(body) => HealthStatus::Degraded(format!("backend reports status `{}`", body.status)),
                Err(_) => HealthStatus::Degraded("unrecognized health response".to_string()),
            }
        }
        Ok(raw) => HealthStatus::Unhealthy(format!("health endpoint returned {}", raw.status)),
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
