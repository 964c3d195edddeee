//! The store: one `AppState`, mutated only by dispatching actions.
//!
//! Dispatch is synchronous and returns nothing. Plain actions are reduced
//! in place and published on a `watch` channel. Thunks run their
//! synchronous prologue immediately and hand back a future that the store
//! spawns on the runtime it was built in, so callers never await a fetch.

use std::fmt;
use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use pickem_providers::{LeagueSource, RaceDataClient};

use crate::action::reduce;
use crate::{Action, AppState, Clock};

/// Background half of a thunk.
pub type ThunkFut = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Deferred work with access to the store.
pub struct Thunk(Box<dyn FnOnce(&Store) -> ThunkFut + Send>);

impl Thunk {
    pub fn new<F>(run: F) -> Self
    where
        F: FnOnce(&Store) -> ThunkFut + Send + 'static,
    {
        Self(Box::new(run))
    }
}

/// Anything `Store::dispatch` accepts.
pub enum Dispatchable {
    Action(Action),
    Thunk(Thunk),
}

impl From<Action> for Dispatchable {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

impl From<Thunk> for Dispatchable {
    fn from(thunk: Thunk) -> Self {
        Self::Thunk(thunk)
    }
}

impl fmt::Debug for Dispatchable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Self::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}

/// Data sources thunks read from.
#[derive(Clone)]
pub struct Services {
    pub races: Arc<dyn RaceDataClient>,
    pub leagues: Arc<dyn LeagueSource>,
    /// Sent to the leagues API as `userId`.
    pub user_id: Option<String>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store must be created inside a tokio runtime")]
    NoRuntime,
}

/// Number of `dispatch` calls by kind, including dispatches made by thunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub actions: u64,
    pub thunks: u64,
}

struct Inner {
    state: watch::Sender<AppState>,
    runtime: Handle,
    tasks: Mutex<JoinSet<()>>,
    actions: AtomicU64,
    thunks: AtomicU64,
    services: Services,
}

#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl Store {
    pub fn new(services: Services) -> Result<Self, StoreError> {
        Self::with_initial_state(services, AppState::default())
    }

    pub fn with_initial_state(services: Services, initial: AppState) -> Result<Self, StoreError> {
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        let (state, _) = watch::channel(initial);
        Ok(Self {
            inner: Arc::new(Inner {
                state,
                runtime,
                tasks: Mutex::new(JoinSet::new()),
                actions: AtomicU64::new(0),
                thunks: AtomicU64::new(0),
                services,
            }),
        })
    }

    pub fn dispatch(&self, dispatchable: impl Into<Dispatchable>) {
        match dispatchable.into() {
            Dispatchable::Action(action) => {
                self.inner.actions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(action = action.name(), "dispatch");
                self.inner.state.send_modify(|state| reduce(state, action));
            }
            Dispatchable::Thunk(Thunk(run)) => {
                self.inner.thunks.fetch_add(1, Ordering::Relaxed);
                let work = run(self);
                let mut tasks = self.tasks();
                // Reap finished thunks so the set only holds live work.
                while let Some(done) = tasks.try_join_next() {
                    log_join(done);
                }
                tasks.spawn_on(work, &self.inner.runtime);
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Read the current state without cloning it.
    ///
    /// `f` must not dispatch.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            actions: self.inner.actions.load(Ordering::Relaxed),
            thunks: self.inner.thunks.load(Ordering::Relaxed),
        }
    }

    #[must_use]
    pub fn services(&self) -> &Services {
        &self.inner.services
    }

    /// Wait for every in-flight thunk, including thunks dispatched by thunks.
    ///
    /// Tasks stay in the shared set while awaited, so a concurrent
    /// `shutdown` still aborts them.
    pub async fn settle(&self) {
        while let Some(done) = poll_fn(|cx| self.tasks().poll_join_next(cx)).await {
            log_join(done);
        }
    }

    /// Abort in-flight thunks. State stays as last reduced.
    pub fn shutdown(&self) {
        let mut tasks = self.tasks();
        if !tasks.is_empty() {
            tracing::debug!(in_flight = tasks.len(), "aborting thunks");
        }
        tasks.abort_all();
    }

    pub(crate) fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.inner.runtime.spawn(future)
    }

    fn tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_join(result: Result<(), tokio::task::JoinError>) {
    if let Err(err) = result
        && err.is_panic()
    {
        tracing::error!(error = %err, "thunk panicked");
    }
}
