use serde::{Deserialize, Serialize};

/// Map view and tile-layer settings, deserialized from `[map]`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapConfig {
    /// Identifier of the host container the map is mounted into.
    pub container: String,
    /// Initial view center as `[lat, lng]`.
    pub center: [f64; 2],
    pub zoom: u8,
    /// Tile URL template, e.g. `https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png`.
    pub tile_url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container: "incident-map".to_string(),
            center: [-14.235, -51.9253],
            zoom: 4,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: 19,
        }
    }
}
