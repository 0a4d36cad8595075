//! Bootstrap data: the seed records the schedule store is populated from at
//! startup.
//!
//! Entries are kept as JSON until ingestion, and decoded records keep their
//! fields as raw strings, so that one bad entry only costs that entry instead
//! of failing the whole load.

use anyhow::{bail, Context, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::models::{minutes_from_decimal, parse_length_minutes, TimeParseError};

/// Session length as found in bootstrap files: `60`, `60.0` or `"60.0"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLength {
    Minutes(f64),
    Text(String),
    /// Anything else; rejected when the record is ingested.
    Other(serde_json::Value),
}

impl RawLength {
    /// Convert to a duration, truncating fractional minutes toward zero.
    pub fn to_duration(&self) -> Result<TimeDelta, TimeParseError> {
        match self {
            RawLength::Minutes(minutes) => minutes_from_decimal(*minutes),
            RawLength::Text(text) => parse_length_minutes(text),
            RawLength::Other(value) => Err(TimeParseError::InvalidLength {
                value: value.to_string(),
            }),
        }
    }
}

impl From<f64> for RawLength {
    fn from(minutes: f64) -> Self {
        RawLength::Minutes(minutes)
    }
}

/// One schedule entry exactly as it appears in the bootstrap data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScheduleRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Venue name; venue ids are assigned by the store.
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub length: Option<RawLength>,
}

impl RawScheduleRecord {
    pub fn new(
        id: impl Into<String>,
        venue: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
        length: impl Into<RawLength>,
    ) -> Self {
        Self {
            id: id.into(),
            session_id: None,
            venue: venue.into(),
            date: date.into(),
            start_time: start_time.into(),
            length: Some(length.into()),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// The record's length as a duration; a missing length is invalid.
    pub fn duration(&self) -> Result<TimeDelta, TimeParseError> {
        match &self.length {
            Some(length) => length.to_duration(),
            None => Err(TimeParseError::InvalidLength {
                value: String::new(),
            }),
        }
    }
}

/// One bootstrap entry: either a typed record or a JSON object still to be
/// decoded. Decoding happens during ingestion so that an entry with a null
/// or wrongly typed field only costs that entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapEntry {
    Record(RawScheduleRecord),
    Json(Value),
}

impl BootstrapEntry {
    /// The entry's `id` as far as it can be read, for diagnostics.
    pub fn id(&self) -> Option<String> {
        match self {
            BootstrapEntry::Record(record) => Some(record.id.clone()),
            BootstrapEntry::Json(value) => match value.get("id")? {
                Value::String(id) => Some(id.clone()),
                other => Some(other.to_string()),
            },
        }
    }

    pub fn into_record(self) -> serde_json::Result<RawScheduleRecord> {
        match self {
            BootstrapEntry::Record(record) => Ok(record),
            BootstrapEntry::Json(value) => serde_json::from_value(value),
        }
    }
}

impl From<RawScheduleRecord> for BootstrapEntry {
    fn from(record: RawScheduleRecord) -> Self {
        BootstrapEntry::Record(record)
    }
}

impl From<Value> for BootstrapEntry {
    fn from(value: Value) -> Self {
        BootstrapEntry::Json(value)
    }
}

/// The seed dataset handed to the store once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapData {
    entries: Vec<Value>,
}

impl BootstrapData {
    /// Parse bootstrap JSON.
    ///
    /// Accepts a bare array of records, or the full conference document
    /// whose `schedules` array holds them (other keys are ignored).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: Value =
            serde_json::from_str(json).context("Failed to parse bootstrap JSON")?;
        let entries = match document {
            Value::Array(entries) => entries,
            Value::Object(mut fields) => match fields.remove("schedules") {
                Some(Value::Array(entries)) => entries,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => bail!(
                    "Failed to parse bootstrap JSON: `schedules` must be an array, found {}",
                    json_kind(&other)
                ),
            },
            other => bail!(
                "Failed to parse bootstrap JSON: expected an array or an object, found {}",
                json_kind(&other)
            ),
        };
        Ok(Self { entries })
    }

    /// Read and parse a bootstrap JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read bootstrap file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid bootstrap file {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> impl Iterator<Item = BootstrapEntry> {
        self.entries.into_iter().map(BootstrapEntry::Json)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(data: BootstrapData) -> Vec<RawScheduleRecord> {
        data.into_entries()
            .map(|entry| entry.into_record().unwrap())
            .collect()
    }

    #[test]
    fn test_parse_record_array() {
        let json = r#"[
            {"id":"1","sessionId":"10","venue":"Hall A","date":"2016-06-01","startTime":"09:00","length":60.0},
            {"id":"2","venue":"Hall B","date":"2016-06-01","startTime":"10:00","length":"45.5"}
        ]"#;
        let data = BootstrapData::from_json_str(json).unwrap();
        assert_eq!(data.len(), 2);

        let parsed = records(data);
        assert_eq!(parsed[0].session_id.as_deref(), Some("10"));
        assert_eq!(parsed[0].length, Some(RawLength::Minutes(60.0)));

        assert_eq!(parsed[1].session_id, None);
        assert_eq!(parsed[1].length, Some(RawLength::Text("45.5".to_string())));
        assert_eq!(parsed[1].duration().unwrap(), TimeDelta::minutes(45));
    }

    #[test]
    fn test_parse_conference_document() {
        let json = r#"{
            "sessions": [{"id": "s1"}],
            "schedules": [
                {"id":"7","venue":"Keynote","date":"2016-06-02","startTime":"08:30","length":30}
            ]
        }"#;
        let data = BootstrapData::from_json_str(json).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(records(data)[0].venue, "Keynote");
    }

    #[test]
    fn test_malformed_json_keeps_position() {
        let err = BootstrapData::from_json_str("[\n  {\"id\": \"1\",}\n]").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("bootstrap JSON"));
        assert!(message.contains("line 2"), "{message}");
    }

    #[test]
    fn test_unexpected_document_shapes_are_rejected() {
        let err = BootstrapData::from_json_str(r#"{"schedules": 5}"#).unwrap_err();
        assert!(err.to_string().contains("`schedules` must be an array, found a number"));

        let err = BootstrapData::from_json_str(r#""schedules""#).unwrap_err();
        assert!(err.to_string().contains("found a string"));
    }

    #[test]
    fn test_wrongly_typed_entry_survives_loading() {
        let json = r#"[
            {"id":"1","venue":"Hall A","date":"2016-06-01","startTime":"09:00","length":60},
            {"id":2,"venue":null,"date":null,"startTime":"09:00","length":60}
        ]"#;
        let data = BootstrapData::from_json_str(json).unwrap();
        assert_eq!(data.len(), 2);

        let entries: Vec<_> = data.into_entries().collect();
        assert_eq!(entries[1].id().as_deref(), Some("2"));
        assert!(entries[0].clone().into_record().is_ok());
        assert!(entries[1].clone().into_record().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conference.json");
        std::fs::write(
            &path,
            r#"[{"id":"1","venue":"Hall A","date":"2016-06-01","startTime":"09:00","length":60}]"#,
        )
        .unwrap();

        let data = BootstrapData::from_file(&path).unwrap();
        assert_eq!(records(data)[0].id, "1");

        let missing = BootstrapData::from_file(dir.path().join("missing.json"));
        assert!(missing.is_err());
    }

    #[test]
    fn test_bad_lengths_survive_loading() {
        let json = r#"[
            {"id":"1","venue":"Hall A","date":"2016-06-01","startTime":"09:00"},
            {"id":"2","venue":"Hall A","date":"2016-06-01","startTime":"09:00","length":true}
        ]"#;
        let parsed = records(BootstrapData::from_json_str(json).unwrap());
        assert!(parsed[0].duration().is_err());
        assert!(parsed[1].duration().is_err());
    }

    #[test]
    fn test_empty_document() {
        assert!(BootstrapData::from_json_str("[]").unwrap().is_empty());
        assert!(BootstrapData::from_json_str("{}").unwrap().is_empty());
        assert!(BootstrapData::from_json_str(r#"{"schedules":null}"#)
            .unwrap()
            .is_empty());
    }
}
