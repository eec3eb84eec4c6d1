//! Background execution of analysis requests.
//!
//! The main loop owns the [`Session`](critique_core::Session) and never awaits
//! the network. Each request runs on its own tokio task and its outcome comes
//! back as [`AppEvent::AnalysisFinished`], where the loop applies it.

use std::sync::Arc;

use critique_core::{AnalysisError, AnalysisRequest, Orchestrator, Ticket, Transport};
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

use crate::event::AppEvent;

/// Spawns the request for `ticket`.
///
/// The request future runs in an inner task so a panic inside it surfaces
/// as a `JoinError`; that is reported as a transport error and the session
/// still leaves the loading state.
pub fn spawn_analysis<T>(
    orchestrator: Arc<Orchestrator<T>>,
    ticket: Ticket,
    request: AnalysisRequest,
    tx: UnboundedSender<AppEvent>,
) where
    T: Transport + 'static,
{
    tokio::spawn(async move {
        let inner = tokio::spawn(async move { orchestrator.execute(ticket, &request).await });
        let outcome = match inner.await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(request_id = %ticket.id(), error = %err, "analysis task failed");
                Err(AnalysisError::Transport(format!("Request task failed: {err}")))
            }
        };
        let _ = tx.send(AppEvent::AnalysisFinished { ticket, outcome });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use critique_core::{Language, RawResponse, Session, TransportError};
    use tokio::sync::mpsc;
    use uuid::Uuid;

    struct Panicking;

    #[async_trait]
    impl Transport for Panicking {
        async fn post(
            &self,
            _request_id: Uuid,
            _request: &AnalysisRequest,
        ) -> Result<RawResponse, TransportError> {
            panic!("transport blew up")
        }
    }

    #[tokio::test]
    async fn panicking_request_still_resolves() {
        let mut session = Session::new(Language::Go);
        session.set_code("package main");
        let (ticket, request) = session.begin(critique_core::Mode::Review).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_analysis(Arc::new(Orchestrator::new(Panicking)), ticket, request, tx);

        let Some(AppEvent::AnalysisFinished { ticket: got, outcome }) = rx.recv().await else {
            panic!("expected AnalysisFinished")
        };
        assert_eq!(got.token(), ticket.token());
        assert!(matches!(outcome, Err(AnalysisError::Transport(_))));

        session.finish(got, outcome);
        assert!(!session.loading());
        assert!(session.error().unwrap().starts_with("Request task failed"));
    }
}
