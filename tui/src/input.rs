//! Input handling for the pickem TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use chrono::Datelike;
use pickem_engine::{Action, Store, get_race_results, get_races, refresh};
use pickem_types::Season;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    /// Pump preloaded with `events`. Keep the returned sender alive to
    /// keep the pump connected.
    #[cfg(test)]
    pub(crate) fn from_events(events: Vec<Event>) -> (Self, impl Sized) {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        for ev in events {
            let _ = tx.try_send(InputMsg::Event(ev));
        }
        let pump = Self {
            rx,
            stop: Arc::new(AtomicBool::new(false)),
            join: None,
        };
        (pump, tx)
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a reader blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Bounded queue: apply backpressure instead of dropping events.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    SelectNext,
    SelectPrevious,
    LoadResults,
    Refresh,
    PreviousSeason,
    NextSeason,
}

#[must_use]
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Command::Quit);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Command::SelectNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::SelectPrevious),
        KeyCode::Enter => Some(Command::LoadResults),
        KeyCode::Char('r') => Some(Command::Refresh),
        KeyCode::Char('[') => Some(Command::PreviousSeason),
        KeyCode::Char(']') => Some(Command::NextSeason),
        _ => None,
    }
}

/// Dispatch whatever `command` maps to. `Quit` dispatches nothing.
pub fn run_command(store: &Store, command: Command) {
    match command {
        Command::Quit => {}
        Command::SelectNext => store.dispatch(Action::SelectNext),
        Command::SelectPrevious => store.dispatch(Action::SelectPrevious),
        Command::LoadResults => {
            if let Some(race) = store.read(|state| state.selected().cloned()) {
                store.dispatch(get_race_results(&race));
            }
        }
        Command::Refresh => {
            if let Some(season) = current_season(store) {
                for dispatchable in refresh(season) {
                    store.dispatch(dispatchable);
                }
            }
        }
        Command::PreviousSeason | Command::NextSeason => {
            if let Some(season) = current_season(store) {
                let target = if command == Command::PreviousSeason {
                    season.previous()
                } else {
                    season.next()
                };
                if target != season {
                    store.dispatch(get_races(target));
                }
            }
        }
    }
}

/// Season shown now, or the current year before any schedule was requested.
fn current_season(store: &Store) -> Option<Season> {
    store.read(|state| state.season).or_else(|| {
        let year = store.services().clock.today().year();
        Season::from_year(year).ok()
    })
}

/// Result of draining one frame's worth of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    pub quit: bool,
    pub redraw: bool,
}

pub fn apply_event(store: &Store, ev: &Event) -> InputOutcome {
    match ev {
        Event::Key(key) => match command_for(key) {
            Some(Command::Quit) => InputOutcome {
                quit: true,
                redraw: false,
            },
            Some(command) => {
                debug!(?command, "key command");
                run_command(store, command);
                InputOutcome {
                    quit: false,
                    redraw: true,
                }
            }
            None => InputOutcome::default(),
        },
        Event::Resize(..) => InputOutcome {
            quit: false,
            redraw: true,
        },
        _ => InputOutcome::default(),
    }
}

pub fn handle_events(store: &Store, input: &mut InputPump) -> Result<InputOutcome> {
    let mut outcome = InputOutcome::default();
    for _ in 0..MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        let applied = apply_event(store, &ev);
        if applied.quit {
            return Ok(applied);
        }
        outcome.redraw |= applied.redraw;
    }
    Ok(outcome)
}
