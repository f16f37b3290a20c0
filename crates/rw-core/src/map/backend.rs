use serde::{Deserialize, Serialize};

use super::icon::IconSpec;
use crate::error::CoreResult;
use crate::geo::GeoPoint;

/// Tile layer drawn beneath the markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

/// Everything needed to create the map once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Host container the widget mounts into.
    pub container: String,
    pub center: GeoPoint,
    pub zoom: u8,
    pub tiles: TileLayer,
}

/// Capability interface of the external map widget.
///
/// Handles are opaque to the caller. Releasing operations take their handle
/// by value, so a released icon or removed marker cannot be used again.
pub trait MapBackend: Send {
    type Map: Send;
    type Marker: Send;
    type Icon: Send;

    fn create_map(&mut self, view: &MapView) -> CoreResult<Self::Map>;

    fn add_tile_layer(&mut self, map: &Self::Map, layer: &TileLayer) -> CoreResult<()>;

    fn create_icon(&mut self, spec: &IconSpec) -> CoreResult<Self::Icon>;

    fn release_icon(&mut self, icon: Self::Icon);

    fn create_marker(&mut self, at: GeoPoint, icon: &Self::Icon) -> CoreResult<Self::Marker>;

    fn bind_popup(&mut self, marker: &mut Self::Marker, html: &str) -> CoreResult<()>;

    fn add_to_map(&mut self, map: &Self::Map, marker: &Self::Marker) -> CoreResult<()>;

    fn remove_from_map(&mut self, map: &Self::Map, marker: Self::Marker);
}
