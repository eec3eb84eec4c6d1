//! Orchestrator flows driven by an in-memory transport.
//!
//! Exercises: validation short-circuit, success, HTTP failures, service
//! failures, transport failures, panics, cancellation, and stale-response
//! rejection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use critique_core::encode::{issue_kind_color, severity_color};
use critique_core::error::{CANCELLED_MESSAGE, EMPTY_CODE_MESSAGE, GENERIC_FAILURE_MESSAGE};
use critique_core::{
    AnalysisError, AnalysisRequest, AnalysisResult, Language, Mode, Orchestrator, RawResponse,
    Resolution, Session, Transport, TransportError, View,
};
use serde_json::{json, Value};
use uuid::Uuid;

enum Reply {
    Raw(RawResponse),
    Unreachable,
    Panic,
    Hang,
}

struct FakeTransport {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<AnalysisRequest>>,
}

impl FakeTransport {
    fn responding(status: u16, body: Option<Value>) -> Self {
        Self::new(Reply::Raw(RawResponse { status, body }))
    }

    fn new(reply: Reply) -> Self {
        Self { reply, calls: AtomicUsize::new(0), last_request: Mutex::new(None) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn post(
        &self,
        _request_id: Uuid,
        request: &AnalysisRequest,
    ) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.reply {
            Reply::Raw(raw) => Ok(raw.clone()),
            Reply::Unreachable => Err(TransportError::Connect("connection refused".into())),
            Reply::Panic => panic!("transport blew up"),
            Reply::Hang => std::future::pending().await,
        }
    }
}

fn python_session(code: &str) -> Session {
    let mut session = Session::new(Language::Python);
    session.set_code(code);
    session
}

fn assert_idle(session: &Session) {
    assert!(!session.loading());
    assert_eq!(session.active_mode(), None);
    assert!(!(session.result().is_some() && session.error().is_some()));
}

#[tokio::test]
async fn empty_code_never_reaches_the_transport() {
    let orchestrator = Orchestrator::new(FakeTransport::responding(200, None));
    let mut session = python_session("   \n");

    let err = orchestrator.run(&mut session, Mode::Review).await.unwrap_err();

    assert_eq!(err, AnalysisError::Validation);
    assert_eq!(orchestrator.transport().calls(), 0);
    assert_eq!(session.error(), Some(EMPTY_CODE_MESSAGE));
    assert_idle(&session);
}

#[tokio::test]
async fn review_success_end_to_end() {
    let orchestrator = Orchestrator::new(FakeTransport::responding(
        200,
        Some(json!({
            "success": true,
            "mode": "review",
            "data": {
                "summary": "ok",
                "rating": 8,
                "issues": [{"type": "bug", "severity": "high", "description": "d"}]
            }
        })),
    ));
    let mut session = python_session("x=1");

    let resolution = orchestrator.run(&mut session, Mode::Review).await.unwrap();

    assert_eq!(resolution, Resolution::Applied);
    assert_idle(&session);
    assert_eq!(session.error(), None);
    assert_eq!(session.result_mode(), Some(Mode::Review));
    let Some(AnalysisResult::Review(report)) = session.result() else {
        panic!("expected a review result")
    };
    assert_eq!(report.rating, 8.0);

    let sent = orchestrator.transport().last_request.lock().unwrap().clone().unwrap();
    assert_eq!(
        serde_json::to_value(&sent).unwrap(),
        json!({"code": "x=1", "language": "python", "mode": "review"})
    );

    let View::Review(view) = View::from_session(&session) else {
        panic!("expected a review view")
    };
    assert_eq!(view.issues[0].kind_color, issue_kind_color(Some("bug")));
    assert_eq!(view.issues[0].severity_color, severity_color(Some("high")));
    assert_eq!(view.issues[0].kind_color.hex(), "#f44336");
    assert_eq!(view.issues[0].severity_color.hex(), "#ff5722");
}

#[tokio::test]
async fn server_error_without_body_sets_generic_error() {
    let orchestrator = Orchestrator::new(FakeTransport::responding(500, None));
    let mut session = python_session("x=1");

    orchestrator.run(&mut session, Mode::Fix).await.unwrap();

    assert_idle(&session);
    assert_eq!(session.result(), None);
    assert_eq!(session.error(), Some(GENERIC_FAILURE_MESSAGE));
    assert_eq!(orchestrator.transport().calls(), 1);
}

#[tokio::test]
async fn unreachable_service_still_returns_to_idle() {
    let orchestrator = Orchestrator::new(FakeTransport::new(Reply::Unreachable));
    let mut session = python_session("x=1");

    orchestrator.run(&mut session, Mode::Optimize).await.unwrap();

    assert_idle(&session);
    assert!(session.error().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn panicking_transport_still_returns_to_idle() {
    let orchestrator = Orchestrator::new(FakeTransport::new(Reply::Panic));
    let mut session = python_session("x=1");

    let resolution = orchestrator.run(&mut session, Mode::Review).await.unwrap();

    assert_eq!(resolution, Resolution::Applied);
    assert_idle(&session);
    let message = session.error().unwrap();
    assert!(message.starts_with("Request task failed"));
    assert!(message.contains("transport blew up"));
}

#[tokio::test]
async fn dropped_run_returns_to_idle() {
    let orchestrator = Orchestrator::new(FakeTransport::new(Reply::Hang));
    let mut session = python_session("x=1");

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), orchestrator.run(&mut session, Mode::Fix))
            .await;

    assert!(timed_out.is_err());
    assert_eq!(orchestrator.transport().calls(), 1);
    assert_idle(&session);
    assert_eq!(session.error(), Some(CANCELLED_MESSAGE));
}

#[tokio::test]
async fn service_failure_message_is_shown() {
    let orchestrator = Orchestrator::new(FakeTransport::responding(
        200,
        Some(json!({"success": false, "error": "Model overloaded"})),
    ));
    let mut session = python_session("x=1");

    orchestrator.run(&mut session, Mode::Explain).await.unwrap();

    assert_eq!(session.error(), Some("Model overloaded"));
    assert_idle(&session);
}

#[tokio::test]
async fn missing_required_field_is_reported_by_name() {
    let orchestrator = Orchestrator::new(FakeTransport::responding(
        200,
        Some(json!({"success": true, "mode": "fix", "data": {"code": "y"}})),
    ));
    let mut session = python_session("x=1");

    orchestrator.run(&mut session, Mode::Fix).await.unwrap();

    assert!(session.error().unwrap().contains("fixedCode"));
    assert_eq!(session.result(), None);
}

#[tokio::test]
async fn new_run_clears_previous_result() {
    let orchestrator = Orchestrator::new(FakeTransport::responding(
        200,
        Some(json!({"success": true, "data": {"fixedCode": "x = 1"}})),
    ));
    let mut session = python_session("x=1");
    orchestrator.run(&mut session, Mode::Fix).await.unwrap();
    assert!(session.result().is_some());

    session.set_code("");
    assert!(orchestrator.run(&mut session, Mode::Fix).await.is_err());
    assert_eq!(session.result(), None);
    assert_eq!(session.error(), Some(EMPTY_CODE_MESSAGE));
}

#[tokio::test]
async fn only_the_latest_response_is_applied() {
    let orchestrator = Orchestrator::new(FakeTransport::responding(
        200,
        Some(json!({"success": true, "data": {"explanation": "e"}})),
    ));
    let mut session = python_session("x=1");

    let (first, first_req) = session.begin(Mode::Explain).unwrap();
    let (second, second_req) = session.begin(Mode::Explain).unwrap();

    let first_outcome = orchestrator.execute(first, &first_req).await;
    let second_outcome = orchestrator.execute(second, &second_req).await;

    assert_eq!(session.finish(second, second_outcome), Resolution::Applied);
    assert_eq!(session.finish(first, first_outcome), Resolution::Stale);
    assert_eq!(session.result_mode(), Some(Mode::Explain));
    assert_idle(&session);
}
