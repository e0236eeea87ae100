// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for PyTutor tests.
//!
//! - [`MockTransport`] - scripted transport that records every call

pub mod mock_transport;

pub use mock_transport::{MockReply, MockTransport, RecordedCall};
