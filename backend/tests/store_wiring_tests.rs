//! Configuration loading and store wiring.

mod support;

use std::path::PathBuf;
use std::sync::Arc;

use showcase_schedule::bootstrap::BootstrapData;
use showcase_schedule::config::{StoreConfig, BOOTSTRAP_PATH_ENV, CONFIG_PATH_ENV};
use showcase_schedule::db::{self, ScheduleRepository, SCHEDULE_GAUGE};
use showcase_schedule::metrics::MetricRegistry;
use showcase_schedule::report::ScheduleReport;

use support::{with_scoped_env, CONFERENCE_JSON};

#[test]
fn test_load_reads_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("custom.toml");
    std::fs::write(
        &config_path,
        "[bootstrap]\npath = \"seed.json\"\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    let config = with_scoped_env(
        &[
            (CONFIG_PATH_ENV, config_path.to_str()),
            (BOOTSTRAP_PATH_ENV, None),
        ],
        StoreConfig::load,
    )
    .unwrap();

    assert_eq!(config.bootstrap.path, Some(dir.path().join("seed.json")));
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_bootstrap_env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("custom.toml");
    std::fs::write(&config_path, "[bootstrap]\npath = \"seed.json\"\n").unwrap();

    let config = with_scoped_env(
        &[
            (CONFIG_PATH_ENV, config_path.to_str()),
            (BOOTSTRAP_PATH_ENV, Some("/data/override.json")),
        ],
        StoreConfig::load,
    )
    .unwrap();

    assert_eq!(
        config.bootstrap.path,
        Some(PathBuf::from("/data/override.json"))
    );
}

#[test]
fn test_load_fails_on_missing_explicit_config() {
    let result = with_scoped_env(
        &[(CONFIG_PATH_ENV, Some("/definitely/not/here.toml"))],
        StoreConfig::load,
    );
    assert!(result.is_err());
}

#[test]
fn test_init_store_from_bootstrap_file() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("conference.json");
    std::fs::write(&data_path, CONFERENCE_JSON).unwrap();

    let mut config = StoreConfig::default();
    config.bootstrap.path = Some(data_path);

    let metrics = MetricRegistry::new_shared();
    let (store, ingest) = db::init_store(&config, Arc::clone(&metrics)).unwrap();

    // Record 3 carries an impossible date and is skipped.
    assert_eq!(ingest.loaded, 3);
    assert_eq!(ingest.skipped, 1);
    assert!(store.find_by_id("3").is_none());
    assert_eq!(store.find_by_id("4").unwrap().duration.num_minutes(), 30);
    assert_eq!(metrics.gauge_value(SCHEDULE_GAUGE), Some(3));
}

#[test]
fn test_init_store_skips_wrongly_typed_records() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("conference.json");
    std::fs::write(
        &data_path,
        r#"[
  {"id": "1", "venue": "Hall A", "date": "2016-06-01", "startTime": "09:00", "length": 60},
  {"id": "2", "venue": "Hall A", "date": null, "startTime": "09:00", "length": 60},
  {"id": 3, "venue": "Hall A", "date": "2016-06-01", "startTime": "11:00", "length": 60},
  {"id": "4", "sessionId": 44, "venue": "Hall B", "date": "2016-06-01", "startTime": "09:00", "length": 60},
  {"id": "5", "venue": null, "date": "2016-06-02", "startTime": "09:00", "length": 60},
  {"id": "6", "venue": "Hall B", "date": "2016-06-02", "startTime": "10:00", "length": 45}
]"#,
    )
    .unwrap();

    let mut config = StoreConfig::default();
    config.bootstrap.path = Some(data_path);

    let (store, ingest) = db::init_store(&config, MetricRegistry::new_shared()).unwrap();
    assert_eq!(ingest.loaded, 2);
    assert_eq!(ingest.skipped, 4);
    assert!(store.find_by_id("1").is_some());
    assert!(store.find_by_id("6").is_some());
    for id in ["2", "3", "4", "5"] {
        assert!(store.find_by_id(id).is_none(), "record {id} should be skipped");
    }
}

#[test]
fn test_init_store_without_bootstrap_path_is_empty() {
    let (store, ingest) =
        db::init_store(&StoreConfig::default(), MetricRegistry::new_shared()).unwrap();
    assert_eq!(ingest.loaded, 0);
    assert!(store.get_all_schedules().is_empty());
}

#[test]
fn test_init_store_fails_on_unreadable_bootstrap() {
    let mut config = StoreConfig::default();
    config.bootstrap.path = Some(PathBuf::from("/definitely/not/here.json"));
    assert!(db::init_store(&config, MetricRegistry::new_shared()).is_err());
}

#[test]
fn test_report_over_bootstrapped_store() {
    let data = BootstrapData::from_json_str(CONFERENCE_JSON).unwrap();
    let store = db::ScheduleStore::new(MetricRegistry::new_shared());
    let ingest = store.initialize(data.into_entries());

    let report = ScheduleReport::build(&store, ingest);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["ingest"]["skipped"], 1);
    assert_eq!(json["venues"][0]["venue"], "Hall A");
    assert_eq!(json["venues"][0]["schedules"][0]["startTime"], "09:00:00");
}
