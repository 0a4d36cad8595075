//! Schedule storage.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Callers (request handlers, reports, tests)             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │  Arc<dyn ScheduleRepository>
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/schedule.rs)              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  ScheduleStore (repositories/local.rs)                  │
//! │  - schedule map, venue map, shared id sequence          │
//! │  - gauges + operation counters in MetricRegistry        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no process-global store. The composition root builds one with
//! [`init_store`] and hands it to whatever needs it.

pub mod repositories;
pub mod repository;

pub use repositories::{
    operation_metric, IngestReport, ScheduleStore, SCHEDULE_GAUGE, VENUE_GAUGE,
};
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, ScheduleRepository};

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::bootstrap::BootstrapData;
use crate::config::StoreConfig;
use crate::metrics::MetricRegistry;

/// Build a store and seed it from the configured bootstrap file.
///
/// A missing or unreadable bootstrap file is an error; individual bad
/// entries are skipped. Without a configured path the store starts empty.
pub fn init_store(
    config: &StoreConfig,
    metrics: Arc<MetricRegistry>,
) -> Result<(Arc<ScheduleStore>, IngestReport)> {
    let data = match config.bootstrap.path {
        Some(ref path) => {
            info!(path = %path.display(), "Loading bootstrap data");
            let data = BootstrapData::from_file(path)?;
            if data.is_empty() {
                warn!(path = %path.display(), "Bootstrap file holds no schedules");
            } else {
                debug!(entries = data.len(), "Bootstrap data parsed");
            }
            data
        }
        None => {
            warn!("No bootstrap path configured, starting with an empty store");
            BootstrapData::default()
        }
    };

    let store = ScheduleStore::new_shared(metrics);
    let report = store.initialize(data.into_entries());
    Ok((store, report))
}
