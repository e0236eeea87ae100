// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic pipeline tests.
//!
//! `MockTransport` implements `Transport` with a FIFO of scripted replies and
//! records the request and (tokio) timestamp of every call, so tests can
//! assert attempt counts and backoff timing under a paused clock.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use pytutor_core::{OutboundRequest, RawResponse, Transport, TransportError};
use tokio::time::Instant;

/// One scripted transport result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Respond with this status and body.
    Status(u16, String),
    /// Fail at the transport level.
    Error(TransportError),
    /// Never complete; the caller's timeout or cancellation must end the call.
    Hang,
}

impl MockReply {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        MockReply::Status(status, body.into())
    }

    pub fn json(status: u16, body: serde_json::Value) -> Self {
        MockReply::Status(status, body.to_string())
    }

    /// `200 {"answer": <text>}`.
    pub fn answer(text: &str) -> Self {
        Self::json(200, serde_json::json!({ "answer": text }))
    }
}

/// A request observed by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub at: Instant,
    pub request: OutboundRequest,
}

#[derive(Debug, Default)]
struct State {
    replies: VecDeque<MockReply>,
    fallback: Option<MockReply>,
    health: Option<MockReply>,
    calls: Vec<RecordedCall>,
}

/// Scripted [`Transport`].
///
/// Replies are popped in order; once the queue is empty the fallback reply
/// (if any) repeats forever, otherwise calls fail with a transport error.
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<State>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock pre-loaded with replies served in order.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        let mock = Self::new();
        mock.lock().replies = replies.into();
        mock
    }

    /// Mock that serves `reply` for every call.
    pub fn always(reply: MockReply) -> Self {
        let mock = Self::new();
        mock.lock().fallback = Some(reply);
        mock
    }

    /// Scripts the health endpoint reply.
    pub fn set_health(&self, reply: MockReply) {
        self.lock().health = Some(reply);
    }

    /// Every `post` call seen so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Offset of each call from the first one.
    pub fn call_offsets(&self) -> Vec<Duration> {
        let calls = self.calls();
        let Some(first) = calls.first().map(|c| c.at) else {
            return Vec::new();
        };
        calls.iter().map(|c| c.at.duration_since(first)).collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn play(reply: Option<MockReply>) -> Result<RawResponse, TransportError> {
    match reply {
        Some(MockReply::Status(status, body)) => Ok(RawResponse { status, body }),
        Some(MockReply::Error(e)) => Err(e),
        Some(MockReply::Hang) => std::future::pending().await,
        None => Err(TransportError::Other("mock transport has no scripted reply".into())),
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        let reply = {
            let mut state = self.lock();
            state.calls.push(RecordedCall {
                at: Instant::now(),
                request: request.clone(),
            });
            state.replies.pop_front().or_else(|| state.fallback.clone())
        };
        play(reply).await
    }

    async fn probe_health(&self) -> Result<RawResponse, TransportError> {
        let reply = self.lock().health.clone();
        play(reply).await
    }
}
