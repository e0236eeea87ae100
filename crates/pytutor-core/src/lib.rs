// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the PyTutor client.
//!
//! Holds the data model shared by every crate in the workspace, the
//! caller-facing error taxonomy, and the [`Transport`] seam that the
//! request pipeline drives.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{FailureKind, TransportError, TutorError};
pub use traits::Transport;
pub use types::{
    ChatMessage, HealthStatus, OutboundRequest, RawResponse, RequestId, Role, SkillLevel,
    TutorReply,
};
