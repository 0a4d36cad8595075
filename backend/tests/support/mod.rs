#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use showcase_schedule::bootstrap::RawScheduleRecord;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment, since tests run in parallel.
///
/// `changes` pairs a key with `Some(value)` to set it or `None` to remove it.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A small conference: two rooms over two days.
pub fn conference_records() -> Vec<RawScheduleRecord> {
    vec![
        RawScheduleRecord::new("1", "Hall A", "2016-06-01", "09:00", 60.0).with_session_id("101"),
        RawScheduleRecord::new("2", "Hall A", "2016-06-01", "10:30", 45.0).with_session_id("102"),
        RawScheduleRecord::new("3", "Hall B", "2016-06-01", "09:00", 90.0).with_session_id("103"),
        RawScheduleRecord::new("4", "Hall B", "2016-06-02", "13:00", 30.5).with_session_id("104"),
        RawScheduleRecord::new("5", "Hall A", "2016-06-02", "16:00", 60.0).with_session_id("105"),
    ]
}

pub const CONFERENCE_JSON: &str = r#"{
  "sessions": [],
  "speakers": [],
  "schedules": [
    {"id": "1", "sessionId": "101", "venue": "Hall A", "date": "2016-06-01", "startTime": "09:00", "length": "60.0"},
    {"id": "2", "sessionId": "102", "venue": "Hall A", "date": "2016-06-01", "startTime": "10:30", "length": 45},
    {"id": "3", "sessionId": "103", "venue": "Hall B", "date": "2016-06-31", "startTime": "09:00", "length": 90},
    {"id": "4", "sessionId": "104", "venue": "Hall B", "date": "2016-06-02", "startTime": "13:00", "length": "30.5"}
  ]
}"#;
