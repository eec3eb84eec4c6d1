//! critique-core: request orchestration and result presentation for the
//! critique code-analysis client.
//!
//! The crate is UI-agnostic. A front end owns a [`Session`], asks an
//! [`Orchestrator`] to run a [`Mode`] against it, and renders
//! [`View::from_session`] however it likes (the `critique` binary draws it in
//! a terminal; [`html::render`] produces an HTML fragment).

pub mod config;
pub mod encode;
pub mod error;
pub mod format;
pub mod html;
pub mod normalize;
pub mod orchestrator;
pub mod session;
pub mod transport;
pub mod types;
pub mod view;

pub use config::{FileConfig, Settings};
pub use error::{AnalysisError, ConfigError, NormalizationError, TransportError};
pub use format::{format_text, SafeHtml};
pub use orchestrator::{interpret, Orchestrator, RawResponse, Transport};
pub use session::{Outcome, Resolution, Session, Ticket};
pub use transport::HttpTransport;
pub use types::{AnalysisRequest, AnalysisResult, Issue, IssueKind, Language, Mode, ReviewReport, Severity};
pub use view::{copy_text, CopyTarget, View};
