use std::path::Path;
use std::sync::Arc;

use chrono::FixedOffset;
use orion_error::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rw_config::{FeedConfig, MapConfig, RoadwatchConfig, resolve_path};
use rw_core::catalog::Catalog;
use rw_core::clock::{Clock, SystemClock};
use rw_core::generator::RandomSource;
use rw_core::geo::GeoPoint;
use rw_core::map::{InMemoryMap, MapView, MarkerSync, TileLayer};
use rw_core::publish::{FeedSubscriber, JsonlSnapshotSink};

use crate::error::{RuntimeReason, RuntimeResult};

// ---------------------------------------------------------------------------
// Config → core objects
// ---------------------------------------------------------------------------

/// Catalog from `feed.catalog` when set, else the built-in one.
pub(super) fn load_catalog(feed: &FeedConfig, base_dir: &Path) -> RuntimeResult<Catalog> {
    let Some(file) = &feed.catalog else {
        let catalog = Catalog::builtin();
        rw_debug!(conf, regions = catalog.len(), "using built-in region catalog");
        return Ok(catalog);
    };
    let path = resolve_path(base_dir, file);
    let catalog = Catalog::load(&path)
        .err_conv()
        .position(path.display().to_string())?;
    rw_info!(conf, file = %path.display(), regions = catalog.len(), "loaded region catalog");
    Ok(catalog)
}

/// System clock at `feed.utc_offset`, or in the host zone when unset.
pub(super) fn system_clock(feed: &FeedConfig) -> RuntimeResult<Arc<dyn Clock>> {
    let Some(offset) = feed.utc_offset else {
        return Ok(Arc::new(SystemClock::local()));
    };
    let fixed = FixedOffset::east_opt(offset.as_seconds()).ok_or_else(|| {
        StructError::from(RuntimeReason::Bootstrap)
            .with_detail(format!("utc_offset {offset} out of range"))
    })?;
    Ok(Arc::new(SystemClock::with_offset(fixed)))
}

pub(super) fn random_source(seed: Option<u64>) -> Box<dyn RandomSource + Send> {
    match seed {
        Some(seed) => {
            rw_info!(conf, seed, "deterministic feed");
            Box::new(StdRng::seed_from_u64(seed))
        }
        None => Box::new(StdRng::from_os_rng()),
    }
}

pub(super) fn map_view(map: &MapConfig) -> MapView {
    MapView {
        container: map.container.clone(),
        center: GeoPoint::from(map.center),
        zoom: map.zoom,
        tiles: TileLayer {
            url_template: map.tile_url.clone(),
            attribution: map.attribution.clone(),
            max_zoom: map.max_zoom,
        },
    }
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

/// Built-in subscribers, in publication order: the marker sync layer, then
/// the JSON Lines sink when `snapshot.file` is set.
///
/// A map that cannot be attached is logged and left detached; the marker
/// sync layer then skips every snapshot.
pub(super) fn build_subscribers(
    config: &RoadwatchConfig,
    base_dir: &Path,
) -> RuntimeResult<Vec<Box<dyn FeedSubscriber>>> {
    let mut subscribers: Vec<Box<dyn FeedSubscriber>> = Vec::new();

    let mut markers = MarkerSync::new(InMemoryMap::new());
    match markers.attach(&map_view(&config.map)) {
        Ok(()) => rw_debug!(map, container = %config.map.container, "map attached"),
        Err(e) => rw_warn!(map, container = %config.map.container, error = %e, "map unavailable, markers disabled"),
    }
    subscribers.push(Box::new(markers));

    if let Some(file) = &config.snapshot.file {
        let path = resolve_path(base_dir, file);
        let sink = JsonlSnapshotSink::open(&path).err_conv()?;
        rw_info!(res, file = %path.display(), "snapshot sink opened");
        subscribers.push(Box::new(sink));
    }
    Ok(subscribers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = load_catalog(&FeedConfig::default(), dir.path()).unwrap();
        assert_eq!(catalog.len(), 10);
    }

    #[test]
    fn catalog_file_resolves_against_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("regions.toml"),
            r#"
[[region]]
name = "Goiás"
center = { lat = -16.6869, lng = -49.2648 }
dispersion_radius = 1.5
traffic_factor = 0.8

[[region.route]]
code = "BR-153"
display_name = "Rodovia Belém-Brasília"
"#,
        )
        .unwrap();
        let feed = FeedConfig {
            catalog: Some("regions.toml".into()),
            ..FeedConfig::default()
        };
        let catalog = load_catalog(&feed, dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("Goiás").is_some());
    }

    #[test]
    fn missing_catalog_file_fails_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        let feed = FeedConfig {
            catalog: Some("nope.toml".into()),
            ..FeedConfig::default()
        };
        assert!(load_catalog(&feed, dir.path()).is_err());
    }

    #[test]
    fn clock_honours_offset() {
        let feed = FeedConfig {
            utc_offset: Some("-03:00".parse().unwrap()),
            ..FeedConfig::default()
        };
        let now = system_clock(&feed).unwrap().now();
        assert_eq!(now.offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn map_view_from_config() {
        let view = map_view(&MapConfig::default());
        assert_eq!(view.container, "incident-map");
        assert_eq!(view.center, GeoPoint::new(-14.235, -51.9253));
        assert_eq!(view.tiles.max_zoom, 19);
    }

    #[test]
    fn subscribers_include_sink_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RoadwatchConfig::default();
        assert_eq!(build_subscribers(&config, dir.path()).unwrap().len(), 1);

        config.snapshot.file = Some("out/snapshots.jsonl".into());
        let subs = build_subscribers(&config, dir.path()).unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].name(), "marker-sync");
        assert!(dir.path().join("out/snapshots.jsonl").exists());
    }
}
