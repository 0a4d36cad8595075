//! Schedule repository trait.
//!
//! This is the seam request-handling layers program against. Operations are
//! synchronous and infallible: lookups of unknown ids yield `None` or an empty
//! vector, deletes of unknown ids do nothing.

use chrono::NaiveDate;

use crate::models::Schedule;

/// Repository trait for schedule records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; every operation may be called
/// concurrently from many threads without external locking.
pub trait ScheduleRepository: Send + Sync {
    /// Store a new schedule under a freshly generated id.
    ///
    /// Any caller-supplied id is discarded. A missing session id is generated
    /// from the same sequence.
    fn add_schedule(&self, schedule: Schedule) -> Schedule;

    /// Point-in-time copy of every stored schedule, in no particular order.
    fn get_all_schedules(&self) -> Vec<Schedule>;

    fn find_by_id(&self, id: &str) -> Option<Schedule>;

    /// Replace the schedule stored under `schedule.id` with `schedule`.
    ///
    /// Without an id this is a create. With an unknown id the record is
    /// inserted under that id.
    fn update_schedule(&self, schedule: Schedule) -> Schedule;

    /// Remove a schedule. Unknown or empty ids are ignored.
    fn delete_schedule(&self, id: &str);

    /// All schedules whose venue id equals `venue_id`.
    fn find_by_venue(&self, venue_id: &str) -> Vec<Schedule>;

    /// All schedules held on exactly `date`.
    fn find_by_date(&self, date: NaiveDate) -> Vec<Schedule>;
}
