// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session controller for a single tutoring conversation.
//!
//! The session transitions through states:
//! Idle -> AwaitingReply -> Idle (or Closed once cancelled).
//!
//! Each `ask` validates input, records the user turn, runs the client raced
//! against the session's cancellation token, and records exactly one outcome
//! message.

use pytutor_client::TutorClient;
use pytutor_core::{Role, TutorError, TutorReply};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::conversation::Conversation;

/// System notice shown when the backend answers with a blank answer.
pub const EMPTY_ANSWER_NOTICE: &str =
    "The tutor returned an empty answer. Try rephrasing your question.";

/// Lifecycle state of a [`TutorSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for the next question.
    Idle,
    /// A question is in flight.
    AwaitingReply,
    /// Cancelled; every further ask fails with [`TutorError::Cancelled`].
    Closed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::AwaitingReply => write!(f, "awaiting_reply"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}

/// User-facing text for a failed ask.
pub fn failure_notice(error: &TutorError) -> String {
    match error {
        TutorError::Validation(reason) if reason == "empty question" => {
            "Please type a question before sending.".to_string()
        }
        TutorError::Validation(reason) => format!("Your question could not be sent: {reason}."),
        TutorError::TransientExhausted { attempts, .. } => format!(
            "The tutor is unavailable right now (gave up after {attempts} attempts). \
             Please try again in a moment."
        ),
        TutorError::Terminal { message, .. } => {
            format!("The tutor could not answer this request: {message}")
        }
        TutorError::MalformedResponse(_) => {
            "The tutor sent a response that could not be read.".to_string()
        }
        TutorError::Cancelled => "Request cancelled.".to_string(),
        TutorError::Internal(_) => format!("Something went wrong: {error}"),
    }
}

/// Drives one conversation against the tutoring backend.
///
/// Owns the client, the [`Conversation`] and a cancellation token. Dropping
/// the session cancels the token, which drops any in-flight attempt and
/// pending backoff timer.
#[derive(Debug)]
pub struct TutorSession {
    session_id: String,
    state: SessionState,
    client: TutorClient,
    conversation: Conversation,
    cancel: CancellationToken,
}

impl TutorSession {
    pub fn new(client: TutorClient) -> Self {
        Self::with_cancellation(client, CancellationToken::new())
    }

    /// Creates a session that also closes when `cancel` fires.
    pub fn with_cancellation(client: TutorClient, cancel: CancellationToken) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        debug!(session_id = %session_id, "session created");
        Self {
            session_id,
            state: SessionState::Idle,
            client,
            conversation: Conversation::new(),
            cancel,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn client(&self) -> &TutorClient {
        &self.client
    }

    /// Token that closes this session when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Asks one question and records the outcome in the conversation.
    ///
    /// On validation failure only a system message is appended. Otherwise
    /// the user's question is appended first, followed by exactly one tutor
    /// or system message.
    pub async fn ask(
        &mut self,
        topic: &str,
        code: &str,
        question: &str,
        level: Option<&str>,
    ) -> Result<TutorReply, TutorError> {
        if self.cancel.is_cancelled() {
            self.state = SessionState::Closed;
            return self.record_failure(TutorError::Cancelled);
        }

        let payload = match self.client.build_payload(topic, code, question, level) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(session_id = %self.session_id, error = %e, "question rejected");
                return self.record_failure(e);
            }
        };

        self.conversation.append(Role::User, payload.question());
        self.state = SessionState::AwaitingReply;

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TutorError::Cancelled),
            result = self.client.ask(&payload) => result,
        };

        self.state = if self.cancel.is_cancelled() {
            SessionState::Closed
        } else {
            SessionState::Idle
        };

        match result {
            Ok(reply) => {
                match &reply {
                    TutorReply::Answer { text, .. } => {
                        self.conversation.append(Role::Tutor, text.as_str());
                    }
                    TutorReply::EmptyAnswer { .. } => {
                        self.conversation.append(Role::System, EMPTY_ANSWER_NOTICE);
                    }
                }
                info!(
                    session_id = %self.session_id,
                    request_id = %reply.request_id(),
                    messages = self.conversation.len(),
                    "turn completed"
                );
                Ok(reply)
            }
            Err(e) => self.record_failure(e),
        }
    }

    /// Closes the session, abandoning any in-flight request.
    pub fn shutdown(&mut self) {
        if self.state != SessionState::Closed {
            info!(session_id = %self.session_id, "session shutting down");
        }
        self.cancel.cancel();
        self.state = SessionState::Closed;
    }

    fn record_failure(&mut self, error: TutorError) -> Result<TutorReply, TutorError> {
        warn!(
            session_id = %self.session_id,
            kind = %error.kind(),
            error = %error,
            "turn failed"
        );
        self.conversation.append(Role::System, failure_notice(&error));
        Err(error)
    }
}

impl Drop for TutorSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_state_display() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(SessionState::AwaitingReply.to_string(), "awaiting_reply");
        assert_eq!(SessionState::Closed.to_string(), "closed");
    }

    #[test]
    fn notices_are_specific_per_kind() {
        assert_eq!(
            failure_notice(&TutorError::Validation("empty question".into())),
            "Please type a question before sending."
        );
        assert!(
            failure_notice(&TutorError::TransientExhausted {
                attempts: 4,
                last_error: "timeout".into()
            })
            .contains("4 attempts")
        );
        assert!(
            failure_notice(&TutorError::Terminal {
                status: Some(400),
                message: "backend error 400: bad".into()
            })
            .ends_with("backend error 400: bad")
        );
        assert_eq!(failure_notice(&TutorError::Cancelled), "Request cancelled.");
    }
}
