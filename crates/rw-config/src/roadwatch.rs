use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::feed::FeedConfig;
use crate::logging::LoggingConfig;
use crate::map::MapConfig;
use crate::snapshot::SnapshotConfig;
use crate::validate;

// ---------------------------------------------------------------------------
// RoadwatchConfig
// ---------------------------------------------------------------------------

/// Resolved, validated contents of a `roadwatch.toml` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoadwatchConfig {
    pub feed: FeedConfig,
    pub map: MapConfig,
    pub snapshot: SnapshotConfig,
    pub logging: LoggingConfig,
}

impl RoadwatchConfig {
    /// Read and parse a `roadwatch.toml` file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.as_ref().display()))?;
        content.parse()
    }
}

impl FromStr for RoadwatchConfig {
    type Err = anyhow::Error;

    /// Parse a TOML string into a validated [`RoadwatchConfig`].
    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let config: RoadwatchConfig = toml::from_str(toml_str)?;
        validate::validate(&config)?;
        Ok(config)
    }
}

/// Resolve `path` against `base_dir` unless it is already absolute.
pub fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base_dir.join(path)
    } else {
        path.to_path_buf()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use crate::types::HumanDuration;
    use std::time::Duration;

    const FULL_TOML: &str = r#"
[feed]
tick_interval = "5s"
retention = "30m"
min_capacity = 50
max_new_per_tick = 3
seed = 42
utc_offset = "-03:00"
catalog = "regions.toml"

[map]
container = "incident-map"
center = [-14.235, -51.9253]
zoom = 4
tile_url = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
attribution = "© OpenStreetMap contributors"
max_zoom = 19

[snapshot]
file = "out/snapshots.jsonl"

[logging]
level = "debug"
format = "json"
"#;

    #[test]
    fn load_full_toml() {
        let cfg: RoadwatchConfig = FULL_TOML.parse().unwrap();

        assert_eq!(cfg.feed.tick_interval.as_duration(), Duration::from_secs(5));
        assert_eq!(cfg.feed.retention, "30m".parse::<HumanDuration>().unwrap());
        assert_eq!(cfg.feed.min_capacity, 50);
        assert_eq!(cfg.feed.max_new_per_tick, 3);
        assert_eq!(cfg.feed.seed, Some(42));
        assert_eq!(cfg.feed.utc_offset.unwrap().as_seconds(), -10800);
        assert_eq!(cfg.feed.catalog, Some(PathBuf::from("regions.toml")));

        assert_eq!(cfg.map.center, [-14.235, -51.9253]);
        assert_eq!(cfg.map.zoom, 4);
        assert_eq!(cfg.map.max_zoom, 19);

        assert_eq!(cfg.snapshot.file, Some(PathBuf::from("out/snapshots.jsonl")));
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: RoadwatchConfig = "".parse().unwrap();
        assert_eq!(cfg.feed.tick_interval.as_duration(), Duration::from_secs(5));
        assert_eq!(cfg.feed.retention.as_duration(), Duration::from_secs(1800));
        assert_eq!(cfg.feed.min_capacity, 50);
        assert_eq!(cfg.feed.seed, None);
        assert!(cfg.snapshot.file.is_none());
        assert_eq!(cfg.logging.format, LogFormat::Plain);
        assert_eq!(cfg.map.tile_url, MapConfig::default().tile_url);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg: RoadwatchConfig = "[feed]\nseed = 7\n".parse().unwrap();
        assert_eq!(cfg.feed.seed, Some(7));
        assert_eq!(cfg.feed.min_capacity, 50);
    }

    #[test]
    fn demo_cadence_and_module_levels() {
        let toml = r#"
[feed]
tick_interval = "500ms"
retention = "1m30s"

[logging]
modules = { "rw_runtime::scheduler" = "debug", "rw_core::map" = "trace" }
"#;
        let cfg: RoadwatchConfig = toml.parse().unwrap();
        assert_eq!(cfg.feed.tick_interval.as_duration(), Duration::from_millis(500));
        assert_eq!(cfg.feed.retention.as_duration(), Duration::from_secs(90));
        let targets: Vec<_> = cfg.logging.modules.keys().map(String::as_str).collect();
        assert_eq!(targets, ["rw_core::map", "rw_runtime::scheduler"]);
    }

    #[test]
    fn unknown_logging_key_is_rejected() {
        assert!("[logging]\nlevels = \"debug\"\n".parse::<RoadwatchConfig>().is_err());
    }

    #[test]
    fn reject_zero_tick_interval() {
        let toml = FULL_TOML.replace("tick_interval = \"5s\"", "tick_interval = \"0s\"");
        assert!(toml.parse::<RoadwatchConfig>().is_err());
    }

    #[test]
    fn reject_zero_retention() {
        let toml = FULL_TOML.replace("retention = \"30m\"", "retention = \"0m\"");
        assert!(toml.parse::<RoadwatchConfig>().is_err());
    }

    #[test]
    fn reject_zero_capacity() {
        let toml = FULL_TOML.replace("min_capacity = 50", "min_capacity = 0");
        let err = toml.parse::<RoadwatchConfig>().unwrap_err();
        assert!(err.to_string().contains("min_capacity"), "{err}");
    }

    #[test]
    fn reject_zero_batch_size() {
        let toml = FULL_TOML.replace("max_new_per_tick = 3", "max_new_per_tick = 0");
        assert!(toml.parse::<RoadwatchConfig>().is_err());
    }

    #[test]
    fn reject_zoom_above_max() {
        let toml = FULL_TOML.replace("zoom = 4", "zoom = 20");
        assert!(toml.parse::<RoadwatchConfig>().is_err());
    }

    #[test]
    fn reject_center_out_of_range() {
        let toml = FULL_TOML.replace("center = [-14.235, -51.9253]", "center = [-94.0, 10.0]");
        assert!(toml.parse::<RoadwatchConfig>().is_err());
    }

    #[test]
    fn reject_bad_offset() {
        let toml = FULL_TOML.replace("\"-03:00\"", "\"three\"");
        assert!(toml.parse::<RoadwatchConfig>().is_err());
    }

    #[test]
    fn reject_unknown_section() {
        let toml = format!("{FULL_TOML}\n[server]\nlisten = \"tcp://0.0.0.0:1\"\n");
        assert!(toml.parse::<RoadwatchConfig>().is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roadwatch.toml");
        std::fs::write(&path, FULL_TOML).unwrap();
        let cfg = RoadwatchConfig::load(&path).unwrap();
        assert_eq!(cfg.feed.seed, Some(42));
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = RoadwatchConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("here.toml"), "{err}");
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let base = Path::new("/etc/roadwatch");
        assert_eq!(
            resolve_path(base, Path::new("regions.toml")),
            PathBuf::from("/etc/roadwatch/regions.toml"),
        );
        assert_eq!(
            resolve_path(base, Path::new("/srv/regions.toml")),
            PathBuf::from("/srv/regions.toml"),
        );
    }
}
