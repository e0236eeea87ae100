// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session controller behavior over a scripted transport.

use std::sync::Arc;
use std::time::Duration;

use pytutor_client::{ClientSettings, TutorClient};
use pytutor_core::{ChatMessage, FailureKind, Role, TutorError, TutorReply};
use pytutor_session::{EMPTY_ANSWER_NOTICE, SessionState, TutorSession};
use pytutor_test_utils::{MockReply, MockTransport};

fn session_over(mock: &Arc<MockTransport>) -> TutorSession {
    TutorSession::new(TutorClient::with_transport(
        mock.clone(),
        &ClientSettings::default(),
    ))
}

fn roles(session: &TutorSession) -> Vec<Role> {
    session.conversation().all().iter().map(ChatMessage::role).collect()
}

#[tokio::test(start_paused = true)]
async fn empty_question_appends_only_a_system_message() {
    let mock = Arc::new(MockTransport::always(MockReply::answer("unused")));
    let mut session = session_over(&mock);

    let err = session.ask("loops", "", "   ", None).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Validation);
    assert_eq!(roles(&session), vec![Role::System]);
    assert_eq!(mock.call_count(), 0);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn answer_appends_user_then_tutor() {
    let mock = Arc::new(MockTransport::always(MockReply::answer(
        "A list is mutable; a tuple is not.",
    )));
    let mut session = session_over(&mock);

    let reply = session
        .ask("data types", "", "  list vs tuple?  ", Some("beginner"))
        .await
        .unwrap();

    assert_eq!(reply.answer(), Some("A list is mutable; a tuple is not."));
    let messages = session.conversation().all();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role(), Role::User);
    assert_eq!(messages[0].text(), "list vs tuple?");
    assert_eq!(messages[1].role(), Role::Tutor);
    assert_eq!(messages[1].text(), "A list is mutable; a tuple is not.");
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn empty_answer_appends_a_system_notice() {
    let mock = Arc::new(MockTransport::always(MockReply::json(
        200,
        serde_json::json!({ "answer": "   " }),
    )));
    let mut session = session_over(&mock);

    let reply = session.ask("", "", "question", None).await.unwrap();

    assert!(matches!(reply, TutorReply::EmptyAnswer { .. }));
    assert_eq!(roles(&session), vec![Role::User, Role::System]);
    assert_eq!(
        session.conversation().last().map(ChatMessage::text),
        Some(EMPTY_ANSWER_NOTICE)
    );
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_leave_session_usable() {
    let mock = Arc::new(MockTransport::with_replies(vec![
        MockReply::status(503, ""),
        MockReply::status(503, ""),
        MockReply::status(503, ""),
        MockReply::status(503, ""),
        MockReply::answer("back online"),
    ]));
    let mut session = session_over(&mock);

    let err = session.ask("", "", "first", None).await.unwrap_err();
    assert!(matches!(err, TutorError::TransientExhausted { attempts: 4, .. }));
    assert_eq!(roles(&session), vec![Role::User, Role::System]);
    assert_eq!(session.state(), SessionState::Idle);

    let reply = session.ask("", "", "second", None).await.unwrap();
    assert_eq!(reply.answer(), Some("back online"));
    assert_eq!(
        roles(&session),
        vec![Role::User, Role::System, Role::User, Role::Tutor]
    );
}

#[tokio::test(start_paused = true)]
async fn terminal_failure_appends_one_system_message() {
    let mock = Arc::new(MockTransport::always(MockReply::status(400, "bad request")));
    let mut session = session_over(&mock);

    let err = session.ask("", "", "question", None).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Terminal);
    assert_eq!(roles(&session), vec![Role::User, Role::System]);
    assert!(
        session
            .conversation()
            .last()
            .is_some_and(|m| m.text().contains("backend error 400: bad request"))
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_abandons_the_in_flight_request() {
    let mock = Arc::new(MockTransport::always(MockReply::Hang));
    let mut session = session_over(&mock);
    let token = session.cancellation_token();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        token.cancel();
    });

    let err = session.ask("", "", "question", None).await.unwrap_err();

    assert_eq!(err, TutorError::Cancelled);
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(roles(&session), vec![Role::User, Role::System]);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_backoff_stops_further_attempts() {
    let mock = Arc::new(MockTransport::always(MockReply::status(503, "")));
    let mut session = session_over(&mock);
    let token = session.cancellation_token();

    // Lands between the first attempt (t=0) and the second (t=1s).
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        token.cancel();
    });

    let err = session.ask("", "", "question", None).await.unwrap_err();

    assert_eq!(err, TutorError::Cancelled);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn asks_after_shutdown_fail_without_network() {
    let mock = Arc::new(MockTransport::always(MockReply::answer("unused")));
    let mut session = session_over(&mock);

    session.shutdown();
    let err = session.ask("", "", "question", None).await.unwrap_err();

    assert_eq!(err, TutorError::Cancelled);
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(mock.call_count(), 0);
    assert_eq!(roles(&session), vec![Role::System]);
}

#[tokio::test(start_paused = true)]
async fn observers_are_notified_on_every_append() {
    let mock = Arc::new(MockTransport::always(MockReply::answer("ok")));
    let mut session = session_over(&mock);
    let mut changes = session.conversation().subscribe();

    session.ask("", "", "question", None).await.unwrap();

    assert!(changes.has_changed().unwrap());
    assert_eq!(*changes.borrow_and_update(), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_session_cancels_its_token() {
    let mock = Arc::new(MockTransport::new());
    let session = session_over(&mock);
    let token = session.cancellation_token();

    drop(session);

    assert!(token.is_cancelled());
}
