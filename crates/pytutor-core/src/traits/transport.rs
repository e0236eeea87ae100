// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait for the single, non-retrying HTTP call.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::{OutboundRequest, RawResponse};

/// Performs exactly one network call per method invocation.
///
/// Implementations never retry; retry and classification live above this
/// seam so a transport can be swapped for a scripted mock in tests.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// POSTs the serialized question payload and returns the raw status and body.
    async fn post(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError>;

    /// GETs the backend health endpoint.
    async fn probe_health(&self) -> Result<RawResponse, TransportError>;
}
