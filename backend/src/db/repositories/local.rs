//! In-memory schedule store.
//!
//! Two sharded concurrent maps hold the data: schedule id → schedule and
//! venue id → venue name. A single atomic sequence hands out schedule ids,
//! generated session ids and venue ids alike, so every generated value is
//! unique across all three and never reused.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::bootstrap::{BootstrapEntry, RawScheduleRecord};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, ScheduleRepository,
};
use crate::metrics::MetricRegistry;
use crate::models::{parse_date, parse_time, Schedule, TimeParseError};

/// Gauge reporting the number of stored schedules.
pub const SCHEDULE_GAUGE: &str = "schedule_store.scheduleGauge";
/// Gauge reporting the number of known venues.
pub const VENUE_GAUGE: &str = "schedule_store.venueGauge";

const METRIC_PREFIX: &str = "schedule_store";

/// Name of the invocation counter (or timer) for a store operation.
pub fn operation_metric(operation: &str) -> String {
    format!("{METRIC_PREFIX}.{operation}")
}

/// Outcome of a bootstrap ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Concurrent in-memory schedule store.
#[derive(Debug)]
pub struct ScheduleStore {
    sequence: AtomicU64,
    schedules: Arc<DashMap<String, Schedule>>,
    venues: Arc<DashMap<String, String>>,
    metrics: Arc<MetricRegistry>,
}

impl ScheduleStore {
    pub fn new(metrics: Arc<MetricRegistry>) -> Self {
        Self {
            sequence: AtomicU64::new(0),
            schedules: Arc::new(DashMap::new()),
            venues: Arc::new(DashMap::new()),
            metrics,
        }
    }

    /// Create a new store wrapped in Arc for sharing.
    pub fn new_shared(metrics: Arc<MetricRegistry>) -> Arc<Self> {
        Arc::new(Self::new(metrics))
    }

    pub fn metrics(&self) -> &Arc<MetricRegistry> {
        &self.metrics
    }

    /// Populate the store from bootstrap entries.
    ///
    /// Registers the size gauges (once per registry), then ingests every
    /// entry. An entry that cannot be decoded or converted is logged and
    /// skipped; the rest still load.
    #[instrument(skip_all)]
    pub fn initialize<I, E>(&self, entries: I) -> IngestReport
    where
        I: IntoIterator<Item = E>,
        E: Into<BootstrapEntry>,
    {
        info!("Initialising schedule store from bootstrap data");
        self.register_gauges();

        let mut report = IngestReport::default();
        for entry in entries {
            match self.ingest_entry(entry.into()) {
                Ok(()) => report.loaded += 1,
                Err(err) => {
                    report.skipped += 1;
                    warn!(
                        schedule_id = err.context().entity_id.as_deref().unwrap_or("?"),
                        error = %err,
                        "Failed to parse bootstrap record, skipping"
                    );
                }
            }
        }

        info!(
            loaded = report.loaded,
            skipped = report.skipped,
            venues = self.venues.len(),
            "Bootstrap ingestion finished"
        );
        report
    }

    pub fn schedule_count(&self) -> usize {
        self.schedules.len()
    }

    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }

    /// Snapshot of the venue mapping as (venue id, venue name) pairs.
    pub fn venues(&self) -> Vec<(String, String)> {
        self.venues
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn register_gauges(&self) {
        let schedules = Arc::clone(&self.schedules);
        if !self
            .metrics
            .register_gauge(SCHEDULE_GAUGE, move || schedules.len() as u64)
        {
            debug!(gauge = SCHEDULE_GAUGE, "Gauge already registered");
        }
        let venues = Arc::clone(&self.venues);
        if !self
            .metrics
            .register_gauge(VENUE_GAUGE, move || venues.len() as u64)
        {
            debug!(gauge = VENUE_GAUGE, "Gauge already registered");
        }
    }

    fn count(&self, operation: &str) {
        self.metrics.increment(&operation_metric(operation));
    }

    fn next_id(&self) -> String {
        (self.sequence.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    fn find_venue_id(&self, venue: &str) -> Option<String> {
        // The iterator guard must be dropped before the map is written to.
        self.venues
            .iter()
            .find(|entry| entry.value() == venue)
            .map(|entry| entry.key().clone())
    }

    /// Existing id for `venue`, or a newly allocated one.
    fn resolve_venue_id(&self, venue: &str) -> String {
        self.find_venue_id(venue).unwrap_or_else(|| self.next_id())
    }

    /// Record the schedule's venue id in the venue mapping. Schedules without
    /// a venue id leave the mapping untouched.
    fn record_venue(&self, schedule: &Schedule) {
        if let Some(venue_id) = schedule.venue_id() {
            self.venues.insert(venue_id.to_string(), schedule.venue.clone());
        }
    }

    fn ingest_entry(&self, entry: BootstrapEntry) -> RepositoryResult<()> {
        let id = entry.id();
        let record = entry.into_record().map_err(|e| {
            RepositoryError::validation_with_context(
                format!("malformed bootstrap record: {e}"),
                ingest_context(id.as_deref()),
            )
        })?;
        self.ingest_record(&record)
    }

    fn ingest_record(&self, record: &RawScheduleRecord) -> RepositoryResult<()> {
        let context = || ingest_context(Some(record.id.as_str()));

        if record.id.is_empty() {
            return Err(RepositoryError::validation_with_context(
                "bootstrap record has no id",
                context(),
            ));
        }

        // Allocated before parsing: a rejected record may leave a gap in the sequence.
        let venue_id = self.resolve_venue_id(&record.venue);
        let (date, start_time, duration) = parse_record_fields(record)
            .map_err(|e| RepositoryError::validation_with_context(e.to_string(), context()))?;

        let schedule = Schedule {
            id: Some(record.id.clone()),
            session_id: record.session_id.clone(),
            venue: record.venue.clone(),
            venue_id: Some(venue_id.clone()),
            date,
            start_time,
            duration,
        };

        self.schedules.insert(record.id.clone(), schedule);
        self.venues.insert(venue_id, record.venue.clone());
        Ok(())
    }

    fn insert_new(&self, mut schedule: Schedule) -> Schedule {
        let id = self.next_id();
        schedule.id = Some(id.clone());
        if schedule.session_id().is_none() {
            schedule.session_id = Some(self.next_id());
        }
        self.record_venue(&schedule);

        debug!(schedule_id = %id, venue_id = ?schedule.venue_id, "Schedule added");
        self.schedules.insert(id, schedule.clone());
        schedule
    }

    fn filter<P>(&self, predicate: P) -> Vec<Schedule>
    where
        P: Fn(&Schedule) -> bool,
    {
        self.schedules
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new(MetricRegistry::new_shared())
    }
}

fn ingest_context(schedule_id: Option<&str>) -> ErrorContext {
    let context = ErrorContext::new("initialize").with_entity("schedule");
    match schedule_id {
        Some(id) => context.with_entity_id(id),
        None => context,
    }
}

fn parse_record_fields(
    record: &RawScheduleRecord,
) -> Result<(NaiveDate, NaiveTime, TimeDelta), TimeParseError> {
    Ok((
        parse_date(&record.date)?,
        parse_time(&record.start_time)?,
        record.duration()?,
    ))
}

impl ScheduleRepository for ScheduleStore {
    fn add_schedule(&self, schedule: Schedule) -> Schedule {
        self.count("add_schedule");
        self.insert_new(schedule)
    }

    fn get_all_schedules(&self) -> Vec<Schedule> {
        self.count("get_all_schedules");
        let started = Instant::now();
        let schedules = self.filter(|_| true);
        self.metrics
            .record_duration(&operation_metric("get_all_schedules"), started.elapsed());
        schedules
    }

    fn find_by_id(&self, id: &str) -> Option<Schedule> {
        self.count("find_by_id");
        self.schedules.get(id).map(|entry| entry.value().clone())
    }

    fn update_schedule(&self, schedule: Schedule) -> Schedule {
        self.count("update_schedule");
        let Some(id) = schedule.id().map(str::to_string) else {
            return self.insert_new(schedule);
        };

        self.record_venue(&schedule);
        debug!(schedule_id = %id, "Schedule replaced");
        self.schedules.insert(id, schedule.clone());
        schedule
    }

    fn delete_schedule(&self, id: &str) {
        self.count("delete_schedule");
        if id.is_empty() {
            return;
        }
        if self.schedules.remove(id).is_some() {
            debug!(schedule_id = %id, "Schedule deleted");
        }
    }

    fn find_by_venue(&self, venue_id: &str) -> Vec<Schedule> {
        self.count("find_by_venue");
        self.filter(|schedule| schedule.venue_id.as_deref() == Some(venue_id))
    }

    fn find_by_date(&self, date: NaiveDate) -> Vec<Schedule> {
        self.count("find_by_date");
        self.filter(|schedule| schedule.date == date)
    }
}
