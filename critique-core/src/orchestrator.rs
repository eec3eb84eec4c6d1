//! Request orchestration: one validated request in, one outcome out.
//!
//! [`Orchestrator::run`] drives a [`Session`] through `begin → execute → finish`.
//! `execute` never touches the session, so a UI can run it on a spawned task
//! and hand the outcome back to the thread that owns the session.
//!
//! No retries are performed. Callers must not start a second run while
//! `session.loading()` is true unless they accept that the first response will
//! be discarded as stale.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{
    AnalysisError, NormalizationError, TransportError, CANCELLED_MESSAGE,
    GENERIC_FAILURE_MESSAGE, PROCESSING_FAILED_MESSAGE,
};
use crate::normalize::normalize;
use crate::session::{Resolution, Session, Ticket};
use crate::types::{AnalysisRequest, AnalysisResult, Mode};

/// Status and (if parseable) JSON body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The single outbound call the orchestrator depends on.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns whatever status and body came back.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no response was received at all.
    async fn post(
        &self,
        request_id: Uuid,
        request: &AnalysisRequest,
    ) -> Result<RawResponse, TransportError>;
}

/// The service's reply wrapper. Each field is read on its own, so a badly
/// typed field is treated as absent instead of spoiling the rest.
#[derive(Debug, Default)]
struct Envelope<'a> {
    success: Option<bool>,
    mode: Option<&'a str>,
    data: Option<&'a Value>,
    error: Option<&'a str>,
}

impl<'a> Envelope<'a> {
    /// `None` when the body is not a JSON object.
    fn read(body: &'a Value) -> Option<Self> {
        let fields = body.as_object()?;
        Some(Self {
            success: fields.get("success").and_then(Value::as_bool),
            mode: fields.get("mode").and_then(Value::as_str),
            data: fields.get("data").filter(|d| !d.is_null()),
            error: fields
                .get("error")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty()),
        })
    }
}

/// Classifies a raw response for a request made in `mode`.
///
/// | Response                                | Outcome                          |
/// |-----------------------------------------|----------------------------------|
/// | non-2xx with `error` message            | `Service(message)`               |
/// | non-2xx without message, or bad 2xx body | `Transport("Failed to process code")` |
/// | 2xx, `success: true`                    | normalized `data`                |
/// | 2xx, `success` not true                 | `Service(error or "Processing failed")` |
///
/// # Errors
///
/// Returns the [`AnalysisError`] from the table above, or a
/// [`NormalizationError`] when `data` is absent, does not fit `mode`, or the
/// envelope declares a different mode.
pub fn interpret(mode: Mode, raw: RawResponse) -> Result<AnalysisResult, AnalysisError> {
    let envelope = raw.body.as_ref().and_then(Envelope::read);

    if !raw.is_success() {
        return Err(match envelope.and_then(|e| e.error) {
            Some(message) => AnalysisError::Service(message.to_owned()),
            None => AnalysisError::Transport(GENERIC_FAILURE_MESSAGE.to_owned()),
        });
    }

    let Some(envelope) = envelope else {
        return Err(AnalysisError::Transport(GENERIC_FAILURE_MESSAGE.to_owned()));
    };

    if envelope.success != Some(true) {
        let message = envelope.error.unwrap_or(PROCESSING_FAILED_MESSAGE);
        return Err(AnalysisError::Service(message.to_owned()));
    }

    if let Some(received) = envelope.mode {
        if !received.trim().eq_ignore_ascii_case(mode.as_str()) {
            return Err(NormalizationError::ModeMismatch {
                requested: mode.to_string(),
                received: received.to_owned(),
            }
            .into());
        }
    }

    let data = envelope.data.ok_or(NormalizationError::MissingField("data"))?;
    Ok(normalize(mode, data)?)
}

/// Holds the session in the loading state for one ticket.
///
/// If dropped before [`Pending::resolve`], the ticket is finished with a
/// cancellation error so the session never stays loading.
struct Pending<'a> {
    session: &'a mut Session,
    ticket: Ticket,
    armed: bool,
}

impl Pending<'_> {
    fn resolve(mut self, outcome: Result<AnalysisResult, AnalysisError>) -> Resolution {
        self.armed = false;
        self.session.finish(self.ticket, outcome)
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(request_id = %self.ticket.id(), "analysis dropped before a response arrived");
            self.session.finish(
                self.ticket,
                Err(AnalysisError::Transport(CANCELLED_MESSAGE.to_owned())),
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Issues analysis requests over a [`Transport`].
pub struct Orchestrator<T> {
    transport: T,
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends the request for `ticket` and classifies the response.
    ///
    /// # Errors
    ///
    /// Returns the [`AnalysisError`] the session should display.
    pub async fn execute(
        &self,
        ticket: Ticket,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        info!(
            request_id = %ticket.id(),
            mode = %request.mode,
            language = %request.language,
            bytes = request.code.len(),
            "sending analysis request"
        );

        let outcome = match self.transport.post(ticket.id(), request).await {
            Ok(raw) => {
                info!(request_id = %ticket.id(), status = raw.status, "analysis response received");
                interpret(ticket.mode(), raw)
            }
            Err(err) => Err(err.into()),
        };

        if let Err(err) = &outcome {
            warn!(request_id = %ticket.id(), error = %err, "analysis failed");
        }
        outcome
    }

    /// Runs `mode` against the session's current input.
    ///
    /// The session leaves the loading state on every path: a panicking
    /// transport is reported as a transport error, and dropping this future
    /// mid-request finishes the ticket with a cancellation error.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Validation`] when the input is empty; no request
    /// is made in that case and the message is already stored in the session.
    pub async fn run(&self, session: &mut Session, mode: Mode) -> Result<Resolution, AnalysisError> {
        let (ticket, request) = session.begin(mode)?;
        let pending = Pending { session, ticket, armed: true };

        let outcome = AssertUnwindSafe(self.execute(ticket, &request))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                error!(request_id = %ticket.id(), panic = message, "analysis request panicked");
                Err(AnalysisError::Transport(format!("Request task failed: {message}")))
            });

        Ok(pending.resolve(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(status: u16, body: Option<Value>) -> RawResponse {
        RawResponse { status, body }
    }

    #[test]
    fn server_error_without_body_uses_generic_message() {
        let err = interpret(Mode::Review, raw(500, None)).unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn server_error_message_is_surfaced() {
        let err = interpret(Mode::Fix, raw(429, Some(json!({"error": "Rate limited"})))).unwrap_err();
        assert_eq!(err, AnalysisError::Service("Rate limited".into()));
    }

    #[test]
    fn success_body_that_is_not_an_envelope_is_generic() {
        let err = interpret(Mode::Fix, raw(200, Some(json!([1, 2])))).unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
        let err = interpret(Mode::Fix, raw(200, None)).unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn unsuccessful_envelope_falls_back_to_processing_failed() {
        let err = interpret(Mode::Explain, raw(200, Some(json!({"success": false})))).unwrap_err();
        assert_eq!(err.to_string(), PROCESSING_FAILED_MESSAGE);

        let err = interpret(
            Mode::Explain,
            raw(200, Some(json!({"success": false, "error": "Model overloaded"}))),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Model overloaded");
    }

    #[test]
    fn successful_envelope_is_normalized() {
        let body = json!({"success": true, "mode": "fix", "data": {"fixedCode": "x = 2"}});
        assert_eq!(
            interpret(Mode::Fix, raw(200, Some(body))).unwrap(),
            AnalysisResult::Fix { fixed_code: "x = 2".into() }
        );
    }

    #[test]
    fn envelope_mode_is_optional_but_must_match() {
        let body = json!({"success": true, "data": {"explanation": "e"}});
        assert!(interpret(Mode::Explain, raw(200, Some(body))).is_ok());

        let body = json!({"success": true, "mode": "review", "data": {"explanation": "e"}});
        let err = interpret(Mode::Explain, raw(200, Some(body))).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Normalization(NormalizationError::ModeMismatch { .. })
        ));
    }

    #[test]
    fn badly_typed_envelope_fields_are_ignored() {
        let body = json!({"success": true, "data": {"fixedCode": "y"}, "error": {"code": 1}});
        assert_eq!(
            interpret(Mode::Fix, raw(200, Some(body))).unwrap(),
            AnalysisResult::Fix { fixed_code: "y".into() }
        );

        let body = json!({"success": false, "error": 42});
        let err = interpret(Mode::Fix, raw(200, Some(body))).unwrap_err();
        assert_eq!(err.to_string(), PROCESSING_FAILED_MESSAGE);

        let err = interpret(Mode::Fix, raw(502, Some(json!({"error": ["x"]})))).unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn missing_data_is_a_normalization_error() {
        let err = interpret(Mode::Optimize, raw(201, Some(json!({"success": true})))).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Normalization(NormalizationError::MissingField("data"))
        );
    }
}
