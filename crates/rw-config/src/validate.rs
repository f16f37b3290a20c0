use crate::roadwatch::RoadwatchConfig;

/// Internal validation, called automatically during `RoadwatchConfig::from_str` / `load`.
pub(crate) fn validate(config: &RoadwatchConfig) -> anyhow::Result<()> {
    let feed = &config.feed;
    if feed.tick_interval.is_zero() {
        anyhow::bail!("feed.tick_interval must be > 0");
    }
    if feed.retention.is_zero() {
        anyhow::bail!("feed.retention must be > 0");
    }
    if feed.min_capacity == 0 {
        anyhow::bail!("feed.min_capacity must be > 0");
    }
    if feed.max_new_per_tick == 0 {
        anyhow::bail!("feed.max_new_per_tick must be > 0");
    }

    let map = &config.map;
    if map.zoom > map.max_zoom {
        anyhow::bail!(
            "map.zoom ({}) exceeds map.max_zoom ({})",
            map.zoom,
            map.max_zoom,
        );
    }
    let [lat, lng] = map.center;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        anyhow::bail!("map.center out of range: [{lat}, {lng}]");
    }
    if map.tile_url.trim().is_empty() {
        anyhow::bail!("map.tile_url must not be empty");
    }

    Ok(())
}
