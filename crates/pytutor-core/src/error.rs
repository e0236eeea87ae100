// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the PyTutor client.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// The caller-facing error type returned by every `ask`.
///
/// Raw transport failures never surface here directly; the request pipeline
/// classifies them first and folds them into one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TutorError {
    /// Bad input rejected before any network activity (empty question, invalid URL).
    #[error("validation error: {0}")]
    Validation(String),

    /// Every scheduled attempt hit a transient failure.
    #[error("backend unavailable after {attempts} attempts: {last_error}")]
    TransientExhausted { attempts: u32, last_error: String },

    /// The backend answered with a non-retryable error.
    #[error("{message}")]
    Terminal {
        status: Option<u16>,
        message: String,
    },

    /// A 2xx response whose body is not a JSON object.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The owning session was torn down while the request was outstanding.
    #[error("request cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TutorError {
    /// Returns the coarse failure category shown to the user interface.
    pub fn kind(&self) -> FailureKind {
        match self {
            TutorError::Validation(_) => FailureKind::Validation,
            TutorError::TransientExhausted { .. } => FailureKind::TransientExhausted,
            TutorError::Terminal { .. } => FailureKind::Terminal,
            TutorError::MalformedResponse(_) => FailureKind::MalformedResponse,
            TutorError::Cancelled => FailureKind::Cancelled,
            TutorError::Internal(_) => FailureKind::Internal,
        }
    }
}

/// Category of a failed `ask`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    Validation,
    TransientExhausted,
    Terminal,
    MalformedResponse,
    Cancelled,
    Internal,
}

/// Failure of a single transport call, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The call did not complete within its time bound.
    #[error("timeout")]
    Timeout,

    /// The connection could not be established (refused, DNS, TLS).
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport-level failure.
    #[error("{0}")]
    Other(String),
}
