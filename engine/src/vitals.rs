//! Startup timing metrics.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::{AppState, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    /// Process start to store ready.
    StoreInit,
    /// Time spent issuing the startup dispatches.
    Prefetch,
    /// First render into the mount target.
    Mount,
    /// Process start until leagues and races have both settled.
    FirstData,
}

impl MetricName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StoreInit => "store-init",
            Self::Prefetch => "prefetch",
            Self::Mount => "mount",
            Self::FirstData => "first-data",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metric {
    pub name: MetricName,
    pub value: Duration,
}

pub type VitalsCallback = Arc<dyn Fn(Metric) + Send + Sync>;

/// Instants recorded while booting.
#[derive(Debug, Clone, Copy)]
pub struct BootMarks {
    pub started: Instant,
    pub store_ready: Instant,
    pub prefetched: Instant,
    pub mounted: Instant,
}

impl BootMarks {
    #[must_use]
    pub fn duration(&self, name: MetricName) -> Duration {
        match name {
            MetricName::StoreInit => self.store_ready.saturating_duration_since(self.started),
            MetricName::Prefetch => self.prefetched.saturating_duration_since(self.store_ready),
            MetricName::Mount => self.mounted.saturating_duration_since(self.prefetched),
            MetricName::FirstData => self.started.elapsed(),
        }
    }
}

/// Report startup metrics to `callback`. Without a callback nothing is
/// measured or spawned.
///
/// The returned task reports `first-data` and finishes once both startup
/// fetches have settled.
pub fn report_vitals(
    callback: Option<VitalsCallback>,
    marks: &BootMarks,
    store: &Store,
) -> Option<JoinHandle<()>> {
    let callback = callback?;

    for name in [MetricName::StoreInit, MetricName::Prefetch, MetricName::Mount] {
        callback(Metric {
            name,
            value: marks.duration(name),
        });
    }

    let marks = *marks;
    let mut rx = store.subscribe();
    Some(store.spawn(async move {
        let settled = rx.wait_for(AppState::first_data_settled).await.is_ok();
        if settled {
            callback(Metric {
                name: MetricName::FirstData,
                value: marks.duration(MetricName::FirstData),
            });
        } else {
            tracing::debug!("store dropped before first data");
        }
    }))
}

/// Callback that writes each metric to the log.
#[must_use]
pub fn log_vitals() -> VitalsCallback {
    Arc::new(|metric: Metric| {
        tracing::info!(
            metric = %metric.name,
            ms = u64::try_from(metric.value.as_millis()).unwrap_or(u64::MAX),
            "startup vital"
        );
    })
}
