// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of `TutorClient::ask` over a scripted transport.
//!
//! Time is paused, so backoff waits and timeouts advance the virtual clock
//! instantly and offsets can be asserted exactly.

use std::sync::Arc;
use std::time::Duration;

use pytutor_client::{BackoffSchedule, ClientSettings, TutorClient};
use pytutor_core::{FailureKind, HealthStatus, RequestId, TransportError, TutorError, TutorReply};
use pytutor_test_utils::{MockReply, MockTransport};

fn client_over(mock: &Arc<MockTransport>) -> TutorClient {
    TutorClient::with_transport(mock.clone(), &ClientSettings::default())
}

#[tokio::test(start_paused = true)]
async fn empty_question_never_touches_the_network() {
    let mock = Arc::new(MockTransport::always(MockReply::answer("unused")));
    let client = client_over(&mock);

    let err = client.ask_raw("loops", "print(1)", "  \n ", None).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Validation);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn always_503_makes_four_attempts_on_schedule() {
    let mock = Arc::new(MockTransport::always(MockReply::status(503, "overloaded")));
    let client = client_over(&mock);

    let err = client.ask_raw("", "", "why?", None).await.unwrap_err();

    assert_eq!(
        err,
        TutorError::TransientExhausted {
            attempts: 4,
            last_error: "transient backend error 503".into()
        }
    );
    assert_eq!(err.kind(), FailureKind::TransientExhausted);
    assert_eq!(
        mock.call_offsets(),
        vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::from_secs(3),
            Duration::from_secs(7),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn two_500s_then_success_takes_three_attempts() {
    let mock = Arc::new(MockTransport::with_replies(vec![
        MockReply::status(500, "boom"),
        MockReply::status(500, "boom"),
        MockReply::answer("ok"),
    ]));
    let client = client_over(&mock);

    let reply = client.ask_raw("", "", "question", None).await.unwrap();

    assert_eq!(reply.answer(), Some("ok"));
    assert_eq!(reply.attempts(), 3);
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn http_400_is_terminal_after_one_attempt() {
    let body = r#"{"error":"Field 'question' is required.","request_id":"srv-1"}"#;
    let mock = Arc::new(MockTransport::with_replies(vec![
        MockReply::status(400, body),
        MockReply::answer("never reached"),
    ]));
    let client = client_over(&mock);

    let err = client.ask_raw("", "", "question", None).await.unwrap_err();

    assert_eq!(
        err,
        TutorError::Terminal {
            status: Some(400),
            message: format!("backend error 400: {body}"),
        }
    );
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn blank_answer_is_an_empty_answer_not_success() {
    let mock = Arc::new(MockTransport::always(MockReply::json(
        200,
        serde_json::json!({ "answer": "" }),
    )));
    let client = client_over(&mock);

    let reply = client.ask_raw("", "", "question", None).await.unwrap();

    assert!(matches!(reply, TutorReply::EmptyAnswer { attempts: 1, .. }));
    assert_eq!(reply.answer(), None);
}

#[tokio::test(start_paused = true)]
async fn malformed_success_body_is_not_retried() {
    let mock = Arc::new(MockTransport::always(MockReply::status(200, "not json")));
    let client = client_over(&mock);

    let err = client.ask_raw("", "", "question", None).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::MalformedResponse);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn connection_errors_are_retried_then_surfaced() {
    let mock = Arc::new(MockTransport::always(MockReply::Error(
        TransportError::Connect("connection refused".into()),
    )));
    let client = client_over(&mock);

    let err = client.ask_raw("", "", "question", None).await.unwrap_err();

    assert_eq!(
        err,
        TutorError::TransientExhausted {
            attempts: 4,
            last_error: "connection failed: connection refused".into()
        }
    );
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn hung_attempt_times_out_and_is_retried() {
    let mock = Arc::new(MockTransport::with_replies(vec![
        MockReply::Hang,
        MockReply::answer("after timeout"),
    ]));
    let client = client_over(&mock);

    let reply = client.ask_raw("", "", "question", None).await.unwrap();

    assert_eq!(reply.answer(), Some("after timeout"));
    assert_eq!(
        mock.call_offsets(),
        vec![Duration::ZERO, Duration::from_secs(26)]
    );
}

#[tokio::test(start_paused = true)]
async fn request_id_is_stable_across_retries() {
    let mock = Arc::new(MockTransport::with_replies(vec![
        MockReply::status(502, ""),
        MockReply::answer("ok"),
    ]));
    let client = client_over(&mock);

    let reply = client.ask_raw("", "", "question", None).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].request.request_id, calls[1].request.request_id);
    assert_eq!(reply.request_id(), &calls[0].request.request_id);
}

#[tokio::test(start_paused = true)]
async fn server_request_id_is_preferred() {
    let mock = Arc::new(MockTransport::always(MockReply::json(
        200,
        serde_json::json!({ "answer": "hi", "request_id": "server-side" }),
    )));
    let client = client_over(&mock);

    let reply = client.ask_raw("", "", "question", None).await.unwrap();

    assert_eq!(reply.request_id(), &RequestId("server-side".into()));
}

#[tokio::test(start_paused = true)]
async fn dispatched_body_is_the_bounded_payload() {
    let mock = Arc::new(MockTransport::always(MockReply::answer("ok")));
    let settings = ClientSettings {
        max_code_chars: 5,
        ..ClientSettings::default()
    };
    let client = TutorClient::with_transport(mock.clone(), &settings);

    client
        .ask_raw(" lists ", "abcdefgh", " how? ", Some("Advanced"))
        .await
        .unwrap();

    let body: serde_json::Value =
        serde_json::from_str(&mock.calls()[0].request.body).unwrap();
    assert_eq!(body["topic"], "lists");
    assert_eq!(body["question"], "how?");
    assert_eq!(body["level"], "advanced");
    assert_eq!(
        body["code"],
        format!("abcde{}", pytutor_client::TRUNCATION_MARKER)
    );
}

#[tokio::test(start_paused = true)]
async fn custom_schedule_is_honored() {
    let mock = Arc::new(MockTransport::always(MockReply::status(429, "")));
    let settings = ClientSettings {
        schedule: BackoffSchedule::from_secs(&[3]),
        ..ClientSettings::default()
    };
    let client = TutorClient::with_transport(mock.clone(), &settings);

    let err = client.ask_raw("", "", "question", None).await.unwrap_err();

    assert!(matches!(err, TutorError::TransientExhausted { attempts: 2, .. }));
    assert_eq!(
        mock.call_offsets(),
        vec![Duration::ZERO, Duration::from_secs(3)]
    );
}

#[tokio::test(start_paused = true)]
async fn concurrent_asks_run_independent_loops() {
    let mock = Arc::new(MockTransport::with_replies(vec![
        MockReply::status(503, ""),
        MockReply::answer("first"),
        MockReply::answer("second"),
    ]));
    let client = client_over(&mock);

    let (a, b) = futures::join!(
        client.ask_raw("", "", "one", None),
        client.ask_raw("", "", "two", None)
    );

    let mut answers = vec![
        a.unwrap().answer().map(str::to_owned),
        b.unwrap().answer().map(str::to_owned),
    ];
    answers.sort();
    assert_eq!(
        answers,
        vec![Some("first".to_string()), Some("second".to_string())]
    );
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn health_check_reports_backend_status() {
    let mock = Arc::new(MockTransport::new());
    let client = client_over(&mock);
    assert!(matches!(client.health_check().await, HealthStatus::Unhealthy(_)));

    mock.set_health(MockReply::json(200, serde_json::json!({ "status": "ok" })));
    assert_eq!(client.health_check().await, HealthStatus::Healthy);

    mock.set_health(MockReply::Hang);
    assert_eq!(
        client.health_check().await,
        HealthStatus::Unhealthy("timeout".into())
    );
    assert_eq!(mock.call_count(), 0, "health probes are not asks");
}
