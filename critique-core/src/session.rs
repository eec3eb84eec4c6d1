//! The single mutable state of an analysis session.
//!
//! `Session` is an explicit container: the orchestrator calls [`Session::begin`]
//! to enter the loading state and [`Session::finish`] to leave it. The shape of
//! the struct enforces the two core invariants:
//!
//! - `loading()` is true exactly when an in-flight mode exists, because both
//!   are read from the same `Option<InFlight>`.
//! - a result and an error never coexist, because both live in one
//!   `Option<Outcome>`.
//!
//! Each `begin` issues a [`Ticket`] with a monotonically increasing token.
//! `finish` only applies a resolution whose token matches the request that is
//! currently in flight, so a slow response can never overwrite a newer one.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AnalysisError, NormalizationError};
use crate::types::{AnalysisRequest, AnalysisResult, Language, Mode};

/// Handle for one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    token: u64,
    mode: Mode,
    id: Uuid,
}

impl Ticket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Correlation id, sent as `X-Request-Id` and attached to log events.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Terminal outcome of the most recent run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(AnalysisResult),
    Failure(String),
}

/// What [`Session::finish`] did with a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The outcome was stored and the session returned to idle.
    Applied,
    /// The ticket was not the in-flight request; the outcome was dropped.
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: Ticket,
}

/// Session state: input, in-flight request, and last outcome.
#[derive(Debug, Clone, Default)]
pub struct Session {
    code: String,
    language: Language,
    in_flight: Option<InFlight>,
    outcome: Option<Outcome>,
    last_token: u64,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self { language, ..Self::default() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    /// Mutable access for in-place editing of the input buffer.
    pub fn code_mut(&mut self) -> &mut String {
        &mut self.code
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn active_mode(&self) -> Option<Mode> {
        self.in_flight.map(|f| f.ticket.mode)
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            Some(Outcome::Success(result)) => Some(result),
            _ => None,
        }
    }

    /// Mode of the stored result; always the mode of the request that produced it.
    pub fn result_mode(&self) -> Option<Mode> {
        self.result().map(AnalysisResult::mode)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Failure(message)) => Some(message),
            _ => None,
        }
    }

    /// Validates the input and enters the loading state for `mode`.
    ///
    /// On success the previous outcome is cleared and the returned request is
    /// what must be sent. Any request already in flight is superseded: its
    /// ticket becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Validation`] when the trimmed code is empty. The
    /// error message is stored in the session and the loading state is left
    /// untouched.
    pub fn begin(&mut self, mode: Mode) -> Result<(Ticket, AnalysisRequest), AnalysisError> {
        if self.code.trim().is_empty() {
            self.outcome = Some(Outcome::Failure(AnalysisError::Validation.to_string()));
            return Err(AnalysisError::Validation);
        }

        if let Some(previous) = self.in_flight {
            debug!(
                superseded = previous.ticket.token,
                "new request supersedes the one in flight"
            );
        }

        self.last_token += 1;
        let ticket = Ticket { token: self.last_token, mode, id: Uuid::new_v4() };
        self.outcome = None;
        self.in_flight = Some(InFlight { ticket });

        let request = AnalysisRequest {
            code: self.code.clone(),
            language: self.language,
            mode,
        };
        Ok((ticket, request))
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Returns [`Resolution::Stale`] without touching state if `ticket` is not
    /// the request currently in flight.
    pub fn finish(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Resolution {
        match self.in_flight {
            Some(current) if current.ticket.token == ticket.token => {}
            _ => {
                warn!(
                    token = ticket.token,
                    request_id = %ticket.id,
                    "discarding stale response"
                );
                return Resolution::Stale;
            }
        }

        self.in_flight = None;
        self.outcome = Some(match outcome {
            Ok(result) if result.mode() == ticket.mode => Outcome::Success(result),
            Ok(result) => Outcome::Failure(
                NormalizationError::ModeMismatch {
                    requested: ticket.mode.to_string(),
                    received: result.mode().to_string(),
                }
                .to_string(),
            ),
            Err(err) => Outcome::Failure(err.to_string()),
        });
        Resolution::Applied
    }

    /// Resets the code, result, and error. The language is kept.
    ///
    /// A request still in flight keeps its ticket; its outcome will be
    /// applied when it resolves.
    pub fn clear(&mut self) {
        self.code.clear();
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EMPTY_CODE_MESSAGE;

    fn explain(text: &str) -> AnalysisResult {
        AnalysisResult::Explain { explanation: text.into() }
    }

    fn assert_invariants(s: &Session) {
        assert_eq!(s.loading(), s.active_mode().is_some());
        assert!(!(s.result().is_some() && s.error().is_some()));
        if s.result().is_some() {
            assert!(s.result_mode().is_some());
        }
    }

    #[test]
    fn starts_idle_and_empty() {
        let s = Session::new(Language::Go);
        assert!(!s.loading());
        assert_eq!(s.active_mode(), None);
        assert_eq!(s.result(), None);
        assert_eq!(s.error(), None);
        assert_eq!(s.language(), Language::Go);
    }

    #[test]
    fn empty_code_is_rejected_without_loading() {
        let mut s = Session::new(Language::Python);
        s.set_code("  \n\t ");
        assert_eq!(s.begin(Mode::Review).unwrap_err(), AnalysisError::Validation);
        assert!(!s.loading());
        assert_eq!(s.error(), Some(EMPTY_CODE_MESSAGE));
        assert_invariants(&s);
    }

    #[test]
    fn begin_resets_outcome_and_enters_loading() {
        let mut s = Session::new(Language::Python);
        s.set_code("x = 1");
        let (t1, _) = s.begin(Mode::Explain).unwrap();
        s.finish(t1, Err(AnalysisError::Service("boom".into())));
        assert_eq!(s.error(), Some("boom"));

        let (ticket, request) = s.begin(Mode::Fix).unwrap();
        assert!(s.loading());
        assert_eq!(s.active_mode(), Some(Mode::Fix));
        assert_eq!(s.error(), None);
        assert_eq!(request.mode, Mode::Fix);
        assert_eq!(request.language, Language::Python);
        assert_eq!(request.code, "x = 1");
        assert_eq!(ticket.mode(), Mode::Fix);
        assert_invariants(&s);
    }

    #[test]
    fn finish_applies_success_and_returns_to_idle() {
        let mut s = Session::new(Language::Rust);
        s.set_code("fn main() {}");
        let (ticket, _) = s.begin(Mode::Explain).unwrap();
        assert_eq!(s.finish(ticket, Ok(explain("hi"))), Resolution::Applied);
        assert!(!s.loading());
        assert_eq!(s.result_mode(), Some(Mode::Explain));
        assert_invariants(&s);
    }

    #[test]
    fn result_for_another_mode_becomes_an_error() {
        let mut s = Session::new(Language::Rust);
        s.set_code("fn main() {}");
        let (ticket, _) = s.begin(Mode::Fix).unwrap();
        assert_eq!(s.finish(ticket, Ok(explain("hi"))), Resolution::Applied);
        assert_eq!(s.result(), None);
        assert!(s.error().unwrap().contains("does not match"));
        assert_invariants(&s);
    }

    #[test]
    fn stale_ticket_cannot_overwrite_newer_request() {
        let mut s = Session::new(Language::Rust);
        s.set_code("fn main() {}");
        let (old, _) = s.begin(Mode::Explain).unwrap();
        let (new, _) = s.begin(Mode::Explain).unwrap();
        assert!(new.token() > old.token());

        assert_eq!(s.finish(old, Ok(explain("old"))), Resolution::Stale);
        assert!(s.loading());
        assert_eq!(s.result(), None);

        assert_eq!(s.finish(new, Ok(explain("new"))), Resolution::Applied);
        assert_eq!(s.result(), Some(&explain("new")));

        // Resolving the same ticket twice is also stale.
        assert_eq!(s.finish(new, Err(AnalysisError::Service("late".into()))), Resolution::Stale);
        assert_eq!(s.error(), None);
        assert_invariants(&s);
    }

    #[test]
    fn clear_is_idempotent_and_keeps_language() {
        let mut s = Session::new(Language::Ruby);
        s.set_code("puts 1");
        let (ticket, _) = s.begin(Mode::Explain).unwrap();
        s.finish(ticket, Ok(explain("prints one")));

        s.clear();
        let once = (s.code().to_owned(), s.result().cloned(), s.error().map(str::to_owned));
        s.clear();
        let twice = (s.code().to_owned(), s.result().cloned(), s.error().map(str::to_owned));

        assert_eq!(once, twice);
        assert_eq!(once, (String::new(), None, None));
        assert_eq!(s.language(), Language::Ruby);
    }
}
