// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the request client and the session controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Correlation id attached to every attempt of one `ask`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generates a fresh random (v4) request id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The learner's self-reported skill level.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Parses a raw level string, falling back to [`SkillLevel::Beginner`]
    /// when the value is missing or unrecognized.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Tutor,
    System,
}

/// One entry of the conversation log.
///
/// Created once and never mutated; fields are only reachable through getters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    role: Role,
    text: String,
    created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Successful outcome of an `ask`.
///
/// A blank `answer` is never reported as [`TutorReply::Answer`]; it is the
/// distinct [`TutorReply::EmptyAnswer`] outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TutorReply {
    /// The backend returned a non-blank answer.
    Answer {
        text: String,
        request_id: RequestId,
        attempts: u32,
    },
    /// The backend returned a well-formed response with a missing or blank answer.
    EmptyAnswer { request_id: RequestId, attempts: u32 },
}

impl TutorReply {
    /// Returns the answer text, or `None` for an empty answer.
    pub fn answer(&self) -> Option<&str> {
        match self {
            TutorReply::Answer { text, .. } => Some(text),
            TutorReply::EmptyAnswer { .. } => None,
        }
    }

    pub fn request_id(&self) -> &RequestId {
        match self {
            TutorReply::Answer { request_id, .. } | TutorReply::EmptyAnswer { request_id, .. } => {
                request_id
            }
        }
    }

    /// Number of transport attempts the reply took.
    pub fn attempts(&self) -> u32 {
        match self {
            TutorReply::Answer { attempts, .. } | TutorReply::EmptyAnswer { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Health status reported by the backend probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend reported `status: ok`.
    Healthy,
    /// Backend answered but did not report `ok`.
    Degraded(String),
    /// Backend is unreachable or returned an error.
    Unhealthy(String),
}

/// One outbound POST, already serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub request_id: RequestId,
    pub body: String,
}

/// Raw status and body of a transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
