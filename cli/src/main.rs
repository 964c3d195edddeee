//! pickem CLI - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI wires [`pickem_config`] into [`pickem_engine::Services`], boots the
//! store against a [`pickem_tui::TerminalHost`], then runs the event loop.
//!
//! ```text
//! main() -> TerminalSession::new() -> Bootstrap::run(host) -> event_loop()
//!                                          |
//!                                          v
//!                          get_leagues(), get_races(year), mount("root")
//! ```
//!
//! # Event Loop
//!
//! Fixed 8ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`pickem_tui::InputPump`])
//! 3. Redraw if the store changed or a key was handled

mod services;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, Write, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use pickem_config::{PickemConfig, config_path};
use pickem_engine::{Bootstrap, Store, VitalsCallback, vitals::log_vitals};
use pickem_tui::{InputPump, TerminalHost, handle_events};
use pickem_types::UiOptions;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Without a log file, drop logs rather than writing over the TUI.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: next to the config file, ~/.pickem/logs/pickem.log by default
    if let Some(config_path) = config_path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("pickem.log"));
    }

    // Fallback: ./.pickem/logs/pickem.log
    candidates.push(PathBuf::from(".pickem").join("logs").join("pickem.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Enables raw mode, the alternate screen and alternate scroll mode (scroll
/// wheel arrives as Up/Down keys). All of it is restored on drop, including
/// after an early return.
struct TerminalSession {
    host: TerminalHost<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new(options: UiOptions) -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        // Enable alternate scroll mode: CSI ? 1007 h
        let _ = out.write_all(b"\x1b[?1007h");
        let _ = out.flush();

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let mut out = stdout();
                let _ = out.write_all(b"\x1b[?1007l");
                let _ = out.flush();
                let _ = execute!(out, LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self {
            host: TerminalHost::new(terminal, options),
        })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let terminal = self.host.terminal_mut();
        // Disable alternate scroll mode: CSI ? 1007 l
        let _ = terminal.backend_mut().write_all(b"\x1b[?1007l");
        let _ = std::io::Write::flush(&mut *terminal.backend_mut());
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = PickemConfig::load()
        .context("failed to load config")?
        .unwrap_or_default();
    let services = services::build_services(&config)?;
    let vitals = config.app.report_vitals.then(log_vitals);

    let result = {
        let mut session = TerminalSession::new(config.app.ui_options())?;
        run(&mut session, services, vitals).await
    };

    if let Err(err) = &result {
        tracing::error!(error = %err, "pickem exited with an error");
    }
    result
}

async fn run(
    session: &mut TerminalSession,
    services: pickem_engine::Services,
    vitals: Option<VitalsCallback>,
) -> Result<()> {
    let booted = Bootstrap::new(services)
        .with_vitals(vitals)
        .run(&mut session.host)
        .context("failed to start")?;

    let result = event_loop(&mut session.host, &booted.store).await;

    booted.store.shutdown();
    if let Some(vitals) = booted.vitals {
        vitals.abort();
    }
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn event_loop<B>(host: &mut TerminalHost<B>, store: &Store) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut changes = store.subscribe();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let outcome = match handle_events(store, &mut input) {
            Ok(outcome) => outcome,
            Err(e) => break Err(e),
        };
        if outcome.quit {
            break Ok(());
        }

        let changed = changes.has_changed().unwrap_or(false);
        if changed {
            changes.mark_unchanged();
        }
        if (changed || outcome.redraw)
            && let Err(e) = host.redraw()
        {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
