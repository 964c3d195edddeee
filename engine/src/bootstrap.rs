//! Startup sequence: build the store, prefetch, mount, report vitals.

use std::time::Instant;

use chrono::Datelike;
use thiserror::Error;
use tokio::task::JoinHandle;

use pickem_types::{Season, SeasonError};

use crate::thunks::{get_leagues, get_races};
use crate::vitals::{BootMarks, VitalsCallback, report_vitals};
use crate::{Host, MountError, ROOT_MOUNT_ID, Services, Store, StoreError};

#[derive(Debug, Error)]
pub enum BootError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("current date has no matching season: {0}")]
    Season(#[from] SeasonError),
    #[error(transparent)]
    Mount(#[from] MountError),
}

/// What a successful boot leaves running.
#[derive(Debug)]
pub struct Booted {
    pub store: Store,
    /// Pending `first-data` report, when vitals are enabled.
    pub vitals: Option<JoinHandle<()>>,
}

pub struct Bootstrap {
    services: Services,
    vitals: Option<VitalsCallback>,
}

impl Bootstrap {
    #[must_use]
    pub fn new(services: Services) -> Self {
        Self {
            services,
            vitals: None,
        }
    }

    #[must_use]
    pub fn with_vitals(mut self, callback: Option<VitalsCallback>) -> Self {
        self.vitals = callback;
        self
    }

    /// Run the startup sequence against `host`.
    ///
    /// Both fetches are dispatched before mounting and are still in flight
    /// when this returns. Nothing is retried on failure.
    pub fn run<H: Host + ?Sized>(self, host: &mut H) -> Result<Booted, BootError> {
        let started = Instant::now();
        let today = self.services.clock.today();
        let store = Store::new(self.services)?;
        let store_ready = Instant::now();

        let season = Season::from_year(today.year())?;
        store.dispatch(get_leagues());
        store.dispatch(get_races(season));
        let prefetched = Instant::now();
        tracing::info!(%season, "startup fetches dispatched");

        host.mount(ROOT_MOUNT_ID, &store)?;
        let mounted = Instant::now();
        tracing::info!(mount_target = ROOT_MOUNT_ID, "application mounted");

        let marks = BootMarks {
            started,
            store_ready,
            prefetched,
            mounted,
        };
        let vitals = report_vitals(self.vitals, &marks, &store);

        Ok(Booted { store, vitals })
    }
}
