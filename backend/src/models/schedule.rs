use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// One scheduled occurrence of a conference session: which venue, which day,
/// when it starts and how long it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Store-assigned identifier. Ignored on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Human-readable venue label.
    pub venue: String,
    /// Key into the venue mapping. Resolved from `venue` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    #[serde(with = "super::time::duration_minutes")]
    pub duration: TimeDelta,
}

impl Schedule {
    /// Create a schedule with no ids assigned yet.
    pub fn new(
        venue: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        duration: TimeDelta,
    ) -> Self {
        Self {
            id: None,
            session_id: None,
            venue: venue.into(),
            venue_id: None,
            date,
            start_time,
            duration,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_venue_id(mut self, venue_id: impl Into<String>) -> Self {
        self.venue_id = Some(venue_id.into());
        self
    }

    /// The id, unless it is missing or empty.
    pub fn id(&self) -> Option<&str> {
        present(self.id.as_deref())
    }

    /// The session id, unless it is missing or empty.
    pub fn session_id(&self) -> Option<&str> {
        present(self.session_id.as_deref())
    }

    /// The venue id, unless it is missing or empty.
    pub fn venue_id(&self) -> Option<&str> {
        present(self.venue_id.as_deref())
    }
}

/// Empty strings count as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
