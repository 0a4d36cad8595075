//! # Showcase Schedule Store
//!
//! In-memory registry of conference schedule entries: which session runs in
//! which venue, on which day, at what time and for how long.
//!
//! ## Architecture
//!
//! - [`models`]: the `Schedule` record and date/time/duration conversions
//! - [`bootstrap`]: raw seed records and the JSON loader
//! - [`db`]: the `ScheduleRepository` trait, the concurrent `ScheduleStore`,
//!   and store wiring
//! - [`metrics`]: gauges, counters and timers the store reports into
//! - [`config`]: TOML configuration with environment overrides
//! - [`report`]: per-venue summary printed by the `schedule-report` binary
//!
//! ## Example
//!
//! ```
//! use showcase_schedule::bootstrap::RawScheduleRecord;
//! use showcase_schedule::db::{ScheduleRepository, ScheduleStore};
//! use showcase_schedule::metrics::MetricRegistry;
//!
//! let store = ScheduleStore::new(MetricRegistry::new_shared());
//! store.initialize(vec![RawScheduleRecord::new("1", "Hall A", "2016-06-01", "09:00", 60.0)]);
//!
//! let schedule = store.find_by_id("1").unwrap();
//! assert_eq!(schedule.venue_id.as_deref(), Some("1"));
//! ```

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod metrics;
pub mod models;
pub mod report;
