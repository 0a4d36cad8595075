//! Repository implementations.
//!
//! - `local`: concurrent in-memory store, the only backend; data lives for
//!   the lifetime of the process.
pub mod local;

pub use local::{operation_metric, IngestReport, ScheduleStore, SCHEDULE_GAUGE, VENUE_GAUGE};
