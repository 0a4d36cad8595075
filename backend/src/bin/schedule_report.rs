//! Schedule report binary.
//!
//! Composition root for the schedule store: sets up logging, loads the
//! configuration and bootstrap data, builds the metric registry and the store,
//! then prints a JSON report of every venue's schedules and the current
//! metrics to stdout.
//!
//! # Usage
//!
//! ```bash
//! SCHEDULE_BOOTSTRAP_PATH=data/conference.json cargo run --bin schedule-report
//! ```
//!
//! # Environment Variables
//!
//! - `SCHEDULE_CONFIG`: path of the TOML configuration file
//! - `SCHEDULE_BOOTSTRAP_PATH`: bootstrap JSON file (overrides the config file)
//! - `RUST_LOG`: Log level (overrides `logging.level`, default: info)

use std::env;
use std::io::{self, Write};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use showcase_schedule::config::StoreConfig;
use showcase_schedule::db;
use showcase_schedule::metrics::MetricRegistry;
use showcase_schedule::report::ScheduleReport;

fn main() -> anyhow::Result<()> {
    let config = StoreConfig::load()?;

    // Logs go to stderr so stdout carries only the report
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(|| config.log_level()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(io::stderr)
        .init();

    info!("Starting schedule report");

    let metrics = MetricRegistry::new_shared();
    let (store, ingest) = db::init_store(&config, metrics)?;
    info!(
        schedules = store.schedule_count(),
        venues = store.venue_count(),
        "Schedule store initialized"
    );

    let report = ScheduleReport::build(&store, ingest);
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report).context("Failed to write report")?;
    writeln!(stdout)?;

    Ok(())
}
