// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilient request client for the PyTutor tutoring backend.
//!
//! The pipeline for one `ask`:
//!
//! 1. [`payload`] validates and bounds the raw input.
//! 2. [`retry`] drives up to N attempts on a fixed backoff schedule.
//! 3. [`transport`] performs each single HTTP POST.
//! 4. [`classify`] turns every attempt into success, retryable, or terminal.
//!
//! [`TutorClient`] is the entry point.

pub mod classify;
pub mod client;
pub mod payload;
pub mod retry;
pub mod transport;
pub mod types;

pub use classify::{RETRYABLE_STATUSES, TerminalFailure};
pub use client::{ClientSettings, TutorClient};
pub use payload::{MAX_CODE_CHARS, PayloadBuilder, QuestionPayload, TRUNCATION_MARKER};
pub use retry::{AttemptOutcome, BackoffSchedule, RetryFailure, RetryScheduler};
pub use transport::HttpTransport;
