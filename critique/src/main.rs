//! critique: send code to an AI analysis service from the terminal.
//!
//! Entry point for the `critique` binary. Wires together configuration
//! (`critique-core::config`), logging (`logging`), the terminal lifecycle
//! (`tui`), the unified event bus (`event`), background request execution
//! (`worker`), and rendering (`ui`).
//!
//! # Startup sequence
//!
//! 1. Parse arguments, install the file logger, resolve settings. All of this
//!    happens before the terminal is touched so errors print normally.
//! 2. With `--print`, run one analysis headless and exit.
//! 3. Otherwise install the panic hook, register SIGTERM, enter the alternate
//!    screen, spawn the event task, and run the event loop.
//!
//! `restore_tui()` runs after the event loop returns, whether it returned
//! normally or with a draw error. The panic hook covers unexpected panics.

mod app;
mod cli;
mod clipboard;
mod event;
mod highlight;
mod logging;
mod theme;
mod tui;
mod ui;
mod worker;

use std::io::Write as _;
use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use critique_core::config::{self, ENDPOINT_ENV};
use critique_core::{
    copy_text, html, FileConfig, HttpTransport, Language, Mode, Orchestrator, Session, Settings,
    Transport, View,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::app::{AppState, Notice};
use crate::event::AppEvent;
use crate::highlight::Highlighter;
use crate::theme::Theme;
use crate::ui::keybindings::{self, KeyAction};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    logging::init(Path::new(logging::LOG_DIR))?;

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let file_config = FileConfig::load(&config_path).unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable config");
        FileConfig::default()
    });
    let env_endpoint = std::env::var(ENDPOINT_ENV).ok();
    let settings = Settings::resolve(cli.endpoint.as_deref(), env_endpoint.as_deref(), &file_config)
        .with_context(|| format!("invalid config {}", config_path.display()))?;

    let code = match &cli.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => String::new(),
    };
    let language = cli
        .language
        .or_else(|| cli.file.as_deref().and_then(Language::from_path))
        .unwrap_or(settings.language);

    let mut session = Session::new(language);
    session.set_code(code);

    let orchestrator = Orchestrator::new(HttpTransport::new(&settings)?);
    info!(
        url = orchestrator.transport().url(),
        timeout_secs = settings.timeout.as_secs(),
        %language,
        "critique starting"
    );

    if cli.print {
        let mode = cli.mode.context("--print requires --mode")?;
        return run_headless(&orchestrator, session, mode).await;
    }

    let theme = Theme::from_name(cli.theme.as_deref().unwrap_or(&settings.theme));
    run_tui(Arc::new(orchestrator), session, theme).await?;
    Ok(ExitCode::SUCCESS)
}

/// Runs one analysis and prints the resulting view as HTML to stdout.
async fn run_headless<T: Transport>(
    orchestrator: &Orchestrator<T>,
    mut session: Session,
    mode: Mode,
) -> Result<ExitCode> {
    // A validation failure is already recorded in the session.
    let _ = orchestrator.run(&mut session, mode).await;

    let fragment = html::render(&View::from_session(&session));
    std::io::stdout().lock().write_all(fragment.as_bytes())?;

    match session.error() {
        Some(message) => {
            eprintln!("critique: {message}");
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

async fn run_tui<T: Transport + 'static>(
    orchestrator: Arc<Orchestrator<T>>,
    session: Session,
    theme: Theme,
) -> Result<()> {
    let mut state = AppState::new(session);
    let mut highlighter = Highlighter::new(theme.syntax_theme);

    // Panic hook first so it is the innermost hook and restores the terminal.
    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());

    let result = event_loop(
        &mut terminal,
        &mut state,
        &theme,
        &mut highlighter,
        &orchestrator,
        handler.tx,
        handler.rx,
        &term_flag,
    )
    .await;

    tui::restore_tui()?;
    result
}

#[allow(clippy::too_many_arguments)]
async fn event_loop<T: Transport + 'static>(
    terminal: &mut tui::Tui,
    state: &mut AppState,
    theme: &Theme,
    highlighter: &mut Highlighter,
    orchestrator: &Arc<Orchestrator<T>>,
    tx: UnboundedSender<AppEvent>,
    mut rx: UnboundedReceiver<AppEvent>,
    term_flag: &AtomicBool,
) -> Result<()> {
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50ms even when no
            // events arrive.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            maybe_event = rx.recv() => {
                let Some(event) = maybe_event else { break 'event_loop };
                match event {
                    AppEvent::Render => {
                        // Exactly one draw() call per Render event.
                        terminal.draw(|frame| ui::render(frame, state, theme, highlighter))?;
                    }
                    AppEvent::Key(key) => {
                        let action = keybindings::handle_key(key, state);
                        if dispatch(action, state, orchestrator, &tx) {
                            break 'event_loop;
                        }
                    }
                    AppEvent::Paste(text) => {
                        keybindings::handle_paste(&text, state);
                    }
                    AppEvent::Mouse(mouse) => {
                        keybindings::handle_mouse(mouse, state);
                    }
                    AppEvent::Resize(_, _) => {
                        // frame.area() picks up the new size on the next Render.
                    }
                    AppEvent::Tick => state.tick(),
                    AppEvent::AnalysisFinished { ticket, outcome } => {
                        let resolution = state.apply_outcome(ticket, outcome);
                        debug!(request_id = %ticket.id(), ?resolution, "analysis resolved");
                    }
                    AppEvent::Notice(notice) => state.notify(notice),
                    AppEvent::Quit => break 'event_loop,
                }
            }
        }
        if term_flag.load(Ordering::Relaxed) {
            info!("SIGTERM received, shutting down");
            break 'event_loop;
        }
    }
    Ok(())
}

/// Carries out a dispatcher action. Returns `true` when the app should quit.
fn dispatch<T: Transport + 'static>(
    action: KeyAction,
    state: &mut AppState,
    orchestrator: &Arc<Orchestrator<T>>,
    tx: &UnboundedSender<AppEvent>,
) -> bool {
    match action {
        KeyAction::Continue => {}
        KeyAction::Run(mode) => {
            if state.session.loading() {
                debug!(%mode, "ignoring run while a request is in flight");
            } else if let Some((ticket, request)) = state.request(mode) {
                worker::spawn_analysis(Arc::clone(orchestrator), ticket, request, tx.clone());
            }
        }
        KeyAction::Copy(target) => match copy_text(&state.session, target) {
            Some(text) => clipboard::copy(text, target, tx.clone()),
            None => state.notify(Notice::error(format!("Nothing to copy: no {}", target.label()))),
        },
        KeyAction::Quit => return true,
    }
    false
}
