// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation log and the session controller that drives the tutoring client.
//!
//! A [`TutorSession`] owns one client, one [`Conversation`] and one
//! cancellation token. Every ask ends with exactly one message describing the
//! outcome, so a UI bound to the conversation never gets stuck.

pub mod conversation;
pub mod session;
pub mod shutdown;

pub use conversation::Conversation;
pub use session::{EMPTY_ANSWER_NOTICE, SessionState, TutorSession, failure_notice};
pub use shutdown::install_signal_handler;
