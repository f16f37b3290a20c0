//! End-to-end feed test.
//!
//! Starts the engine from an inline config with a manual clock and paused
//! tokio time, then checks the watch channel, the JSON Lines snapshot file
//! and a clean shutdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use serde_json::Value;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use rw_config::RoadwatchConfig;
use rw_core::clock::{Clock, ManualClock};
use rw_runtime::lifecycle::{EngineOptions, FeedEngine};
use rw_runtime::tracing_init::DomainFormat;

fn init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(DomainFormat::new())
                .with_test_writer()
                .with_filter(EnvFilter::try_new("info").unwrap()),
        )
        .try_init();
}

fn config(seed: u64) -> RoadwatchConfig {
    format!(
        r#"
[feed]
tick_interval = "5s"
retention = "30m"
min_capacity = 50
max_new_per_tick = 3
seed = {seed}
utc_offset = "-03:00"

[snapshot]
file = "out/snapshots.jsonl"
"#
    )
    .parse()
    .unwrap()
}

fn manual_clock() -> Arc<dyn Clock> {
    Arc::new(ManualClock::new(
        DateTime::parse_from_rfc3339("2026-03-10T08:00:00-03:00").unwrap(),
    ))
}

async fn run_for(seed: u64, ticks: u64, dir: &std::path::Path) -> Vec<Value> {
    let engine = FeedEngine::start_with(
        config(seed),
        dir,
        EngineOptions {
            clock: Some(manual_clock()),
            subscribers: Vec::new(),
        },
    )
    .await
    .unwrap();

    let mut rx = engine.subscribe();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().seq, 1);

    tokio::time::sleep(Duration::from_millis(ticks * 5_000 + 500)).await;
    assert_eq!(engine.latest().seq, ticks + 1);

    engine.shutdown();
    engine.wait().await.unwrap();

    let content = std::fs::read_to_string(dir.join("out/snapshots.jsonl")).unwrap();
    content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn engine_publishes_on_cadence_and_shuts_down() {
    init_test_tracing();
    let dir = tempfile::tempdir().unwrap();
    let lines = run_for(42, 2, dir.path()).await;

    assert_eq!(lines.len(), 3);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line["seq"].as_u64().unwrap(), i as u64 + 1);
        let incidents = line["incidents"].as_array().unwrap();
        assert_eq!(line["active"].as_u64().unwrap() as usize, incidents.len());
        assert!(!incidents.is_empty());
        assert!(incidents[0]["display_date"].as_str().unwrap().starts_with("10/03/2026"));
    }

    // each tick adds between one and two incidents, nothing is old enough to evict
    let sizes: Vec<u64> = lines.iter().map(|l| l["active"].as_u64().unwrap()).collect();
    for pair in sizes.windows(2) {
        assert!(pair[1] >= pair[0] && pair[1] <= pair[0] + 2, "{sizes:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn same_seed_same_feed() {
    init_test_tracing();
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let first = run_for(7, 1, a.path()).await;
    let second = run_for(7, 1, b.path()).await;

    let fingerprint = |lines: &[Value]| -> Vec<(String, String, String)> {
        lines
            .iter()
            .flat_map(|l| l["incidents"].as_array().unwrap().clone())
            .map(|i| {
                (
                    i["type"].to_string(),
                    i["region_name"].to_string(),
                    i["coordinates"].to_string(),
                )
            })
            .collect()
    };
    assert_eq!(fingerprint(&first), fingerprint(&second));
}

#[tokio::test(start_paused = true)]
async fn bad_catalog_fails_start() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(1);
    config.feed.catalog = Some("missing.toml".into());
    assert!(FeedEngine::start(config, dir.path()).await.is_err());
}
