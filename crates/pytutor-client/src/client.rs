// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The resilient tutoring client.
//!
//! [`TutorClient`] ties the pieces together: it serializes a validated
//! payload, drives the transport through the [`RetryScheduler`], classifies
//! each attempt, and folds the result into a [`TutorReply`] or a
//! [`TutorError`]. It keeps no conversation history.

use std::sync::Arc;
use std::time::Duration;

use pytutor_config::PyTutorConfig;
use pytutor_core::{
    HealthStatus, OutboundRequest, RequestId, Transport, TransportError, TutorError, TutorReply,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::classify::{classify, classify_health, extract_reply};
use crate::payload::{MAX_CODE_CHARS, PayloadBuilder, QuestionPayload};
use crate::retry::{BackoffSchedule, Completed, RetryFailure, RetryScheduler};
use crate::transport::HttpTransport;

/// Plain input values the client is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub ask_path: String,
    pub health_path: String,
    pub attempt_timeout: Duration,
    pub schedule: BackoffSchedule,
    pub max_code_chars: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            ask_path: "/ask-ai".to_string(),
            health_path: "/health".to_string(),
            attempt_timeout: Duration::from_secs(25),
            schedule: BackoffSchedule::default(),
            max_code_chars: MAX_CODE_CHARS,
        }
    }
}

impl ClientSettings {
    pub fn from_config(config: &PyTutorConfig) -> Self {
        Self {
            base_url: config.backend.base_url.clone(),
            ask_path: config.backend.ask_path.clone(),
            health_path: config.backend.health_path.clone(),
            attempt_timeout: Duration::from_secs(config.backend.timeout_secs),
            schedule: BackoffSchedule::from_secs(&config.backend.retry_delays_secs),
            max_code_chars: config.tutor.max_code_chars,
        }
    }
}

/// Sends questions to the tutoring backend with bounded retries.
///
/// Cheap to clone; clones share the underlying transport. Concurrent `ask`
/// calls each run their own attempt loop.
#[derive(Clone)]
pub struct TutorClient {
    transport: Arc<dyn Transport>,
    scheduler: RetryScheduler,
    payloads: PayloadBuilder,
}

impl std::fmt::Debug for TutorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorClient")
            .field("scheduler", &self.scheduler)
            .field("payloads", &self.payloads)
            .finish_non_exhaustive()
    }
}

impl TutorClient {
    /// Creates a client talking HTTP to the configured backend.
    pub fn new(settings: &ClientSettings) -> Result<Self, TutorError> {
        let transport = HttpTransport::new(
            &settings.base_url,
            &settings.ask_path,
            &settings.health_path,
            settings.attempt_timeout,
        )?;
        info!(url = %transport.ask_url(), "tutor client initialized");
        Ok(Self::with_transport(Arc::new(transport), settings))
    }

    /// Creates a client over an arbitrary transport (mocks, alternative stacks).
    pub fn with_transport(transport: Arc<dyn Transport>, settings: &ClientSettings) -> Self {
        Self {
            transport,
            scheduler: RetryScheduler::new(settings.schedule.clone(), settings.attempt_timeout),
            payloads: PayloadBuilder::new(settings.max_code_chars),
        }
    }

    pub fn scheduler(&self) -> &RetryScheduler {
        &self.scheduler
    }

    /// Validates raw input into a payload without touching the network.
    pub fn build_payload(
        &self,
        topic: &str,
        code: &str,
        question: &str,
        level: Option<&str>,
    ) -> Result<QuestionPayload, TutorError> {
        self.payloads.build(topic, code, question, level)
    }

    /// Builds the payload from raw input, then [`ask`](Self::ask)s it.
    pub async fn ask_raw(
        &self,
        topic: &str,
        code: &str,
        question: &str,
        level: Option<&str>,
    ) -> Result<TutorReply, TutorError> {
        let payload = self.build_payload(topic, code, question, level)?;
        self.ask(&payload).await
    }

    /// Sends one question, retrying transient failures on the backoff schedule.
    pub async fn ask(&self, payload: &QuestionPayload) -> Result<TutorReply, TutorError> {
        let request_id = RequestId::generate();
        let body = serde_json::to_string(payload)
            .map_err(|e| TutorError::Internal(format!("failed to serialize payload: {e}")))?;
        let request = OutboundRequest {
            request_id: request_id.clone(),
            body,
        };

        info!(
            request_id = %request_id,
            topic = payload.topic(),
            level = %payload.level(),
            question_len = payload.question().len(),
            code_len = payload.code().len(),
            "sending question"
        );

        let started = Instant::now();
        let transport = &self.transport;
        let request = &request;
        let result = self
            .scheduler
            .run(|attempt| async move {
                let result = transport.post(request).await;
                if let Ok(raw) = &result {
                    debug!(attempt, status = raw.status, "attempt completed");
                }
                classify(&result)
            })
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(Completed { value, attempts }) => {
                let reply = extract_reply(&value, &request_id, attempts);
                match &reply {
                    TutorReply::Answer { text, .. } => info!(
                        request_id = %reply.request_id(),
                        attempts,
                        elapsed_ms,
                        answer_len = text.len(),
                        "tutor answered"
                    ),
                    TutorReply::EmptyAnswer { .. } => warn!(
                        request_id = %reply.request_id(),
                        attempts,
                        elapsed_ms,
                        "tutor returned an empty answer"
                    ),
                }
                Ok(reply)
            }
            Err(RetryFailure::Terminal { attempts, error }) => {
                let error = TutorError::from(error);
                warn!(request_id = %request_id, attempts, elapsed_ms, error = %error, "request failed");
                Err(error)
            }
            Err(RetryFailure::Exhausted {
                attempts,
                last_error,
            }) => {
                warn!(
                    request_id = %request_id,
                    attempts,
                    elapsed_ms,
                    last_error = %last_error,
                    "retries exhausted"
                );
                Err(TutorError::TransientExhausted {
                    attempts,
                    last_error,
                })
            }
        }
    }

    /// Probes the backend health endpoint once, bounded by the attempt timeout.
    pub async fn health_check(&self) -> HealthStatus {
        let result = tokio::time::timeout(
            self.scheduler.attempt_timeout(),
            self.transport.probe_health(),
        )
        .await
        .unwrap_or(Err(TransportError::Timeout));
        let status = classify_health(&result);
        debug!(?status, "health probe finished");
        status
    }
}
