//! System clipboard access.
//!
//! `arboard` talks to the platform clipboard synchronously and can block on
//! X11/Wayland round-trips, so copies run on the blocking pool and report
//! back over the event bus as a status-bar [`Notice`].

use critique_core::CopyTarget;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::app::Notice;
use crate::event::AppEvent;

/// Copies `text` and posts the outcome as an [`AppEvent::Notice`].
pub fn copy(text: String, target: CopyTarget, tx: UnboundedSender<AppEvent>) {
    tokio::task::spawn_blocking(move || {
        let bytes = text.len();
        let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
        let notice = match result {
            Ok(()) => {
                info!(target = target.label(), bytes, "copied to clipboard");
                Notice::info(format!("Copied {}", target.label()))
            }
            Err(err) => {
                warn!(target = target.label(), error = %err, "clipboard copy failed");
                Notice::error(format!("Clipboard unavailable: {err}"))
            }
        };
        let _ = tx.send(AppEvent::Notice(notice));
    });
}
