//! State and startup for pickem.
//!
//! - [`Store`] owns [`AppState`] and applies [`Action`]s through [`reduce`]
//! - [`thunks`] fetch leagues, schedules and results without blocking dispatch
//! - [`Bootstrap`] builds the store, prefetches, and mounts the UI through a
//!   [`Host`]
//!
//! Nothing here depends on the terminal. The TUI crate implements [`Host`].

mod action;
mod bootstrap;
mod clock;
mod host;
mod remote;
mod state;
mod store;
pub mod thunks;
pub mod vitals;

#[cfg(test)]
mod test_support;

pub use action::{Action, reduce};
pub use bootstrap::{BootError, Booted, Bootstrap};
pub use clock::{Clock, FixedClock, SystemClock};
pub use host::{Host, MountError, ROOT_MOUNT_ID};
pub use remote::Remote;
pub use state::AppState;
pub use store::{DispatchStats, Dispatchable, Services, Store, StoreError, Thunk, ThunkFut};
pub use thunks::{get_leagues, get_race_results, get_races, refresh};
pub use vitals::{Metric, MetricName, VitalsCallback, report_vitals};

pub use pickem_providers;
pub use pickem_types;
