//! Per-venue summary of a store's contents, as printed by `schedule-report`.

use serde::{Deserialize, Serialize};

use crate::db::{IngestReport, ScheduleRepository, ScheduleStore};
use crate::metrics::MetricsSnapshot;
use crate::models::Schedule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueSchedules {
    pub venue_id: String,
    pub venue: String,
    /// Ordered by date, then start time.
    pub schedules: Vec<Schedule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReport {
    pub ingest: IngestReport,
    pub schedule_count: usize,
    pub venue_count: usize,
    /// Ordered by venue name.
    pub venues: Vec<VenueSchedules>,
    pub metrics: MetricsSnapshot,
}

impl ScheduleReport {
    /// Build the report. Metrics are captured last, so they include the
    /// lookups made while building it.
    pub fn build(store: &ScheduleStore, ingest: IngestReport) -> Self {
        let mut venues: Vec<VenueSchedules> = store
            .venues()
            .into_iter()
            .map(|(venue_id, venue)| {
                let mut schedules = store.find_by_venue(&venue_id);
                schedules.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
                VenueSchedules {
                    venue_id,
                    venue,
                    schedules,
                }
            })
            .collect();
        venues.sort_by(|a, b| a.venue.cmp(&b.venue).then_with(|| a.venue_id.cmp(&b.venue_id)));

        Self {
            ingest,
            schedule_count: store.schedule_count(),
            venue_count: store.venue_count(),
            venues,
            metrics: store.metrics().snapshot(),
        }
    }
}
