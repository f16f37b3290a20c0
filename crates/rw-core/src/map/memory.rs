use std::collections::{HashMap, HashSet};

use orion_error::prelude::*;

use super::backend::{MapBackend, MapView, TileLayer};
use super::icon::IconSpec;
use crate::error::{CoreReason, CoreResult};
use crate::geo::GeoPoint;
use crate::incident::IncidentKind;

/// Calls observed by an [`InMemoryMap`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    MapCreated { container: String },
    TileLayerAdded { url_template: String },
    IconCreated { icon: u64, kind: IncidentKind },
    IconReleased { icon: u64 },
    MarkerCreated { marker: u64, icon: u64, at: GeoPoint },
    PopupBound { marker: u64 },
    MarkerAdded { marker: u64 },
    MarkerRemoved { marker: u64 },
}

/// Map handle issued by [`InMemoryMap`].
#[derive(Debug)]
pub struct MemoryMapHandle {
    container: String,
}

/// Marker handle issued by [`InMemoryMap`].
#[derive(Debug)]
pub struct MemoryMarker {
    id: u64,
    popup: Option<String>,
}

/// Icon handle issued by [`InMemoryMap`].
#[derive(Debug)]
pub struct MemoryIcon {
    id: u64,
}

/// Headless map widget that keeps its state in memory and records every
/// call. It backs the CLI when no real widget is present.
#[derive(Debug, Default)]
pub struct InMemoryMap {
    next_handle: u64,
    live_icons: HashSet<u64>,
    /// marker id → popup html
    on_map: HashMap<u64, String>,
    events: Vec<MapEvent>,
    unavailable: bool,
    failing_markers: usize,
}

impl InMemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A widget whose `create_map` always fails, as when the host container
    /// is missing.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Make the next `n` marker creations fail.
    pub fn fail_next_markers(&mut self, n: usize) {
        self.failing_markers = n;
    }

    pub fn events(&self) -> &[MapEvent] {
        &self.events
    }

    pub fn live_icons(&self) -> usize {
        self.live_icons.len()
    }

    pub fn live_markers(&self) -> usize {
        self.on_map.len()
    }

    pub fn popup(&self, marker: u64) -> Option<&str> {
        self.on_map.get(&marker).map(String::as_str)
    }

    fn next_id(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl MapBackend for InMemoryMap {
    type Map = MemoryMapHandle;
    type Marker = MemoryMarker;
    type Icon = MemoryIcon;

    fn create_map(&mut self, view: &MapView) -> CoreResult<MemoryMapHandle> {
        if self.unavailable {
            return StructError::from(CoreReason::MapUnavailable)
                .with_detail(format!("container '{}' not found", view.container))
                .err();
        }
        self.events.push(MapEvent::MapCreated {
            container: view.container.clone(),
        });
        Ok(MemoryMapHandle {
            container: view.container.clone(),
        })
    }

    fn add_tile_layer(&mut self, _map: &MemoryMapHandle, layer: &TileLayer) -> CoreResult<()> {
        self.events.push(MapEvent::TileLayerAdded {
            url_template: layer.url_template.clone(),
        });
        Ok(())
    }

    fn create_icon(&mut self, spec: &IconSpec) -> CoreResult<MemoryIcon> {
        let id = self.next_id();
        self.live_icons.insert(id);
        self.events.push(MapEvent::IconCreated {
            icon: id,
            kind: spec.kind,
        });
        Ok(MemoryIcon { id })
    }

    fn release_icon(&mut self, icon: MemoryIcon) {
        if !self.live_icons.remove(&icon.id) {
            log::warn!("icon {} released but not live", icon.id);
        }
        self.events.push(MapEvent::IconReleased { icon: icon.id });
    }

    fn create_marker(&mut self, at: GeoPoint, icon: &MemoryIcon) -> CoreResult<MemoryMarker> {
        if self.failing_markers > 0 {
            self.failing_markers -= 1;
            return StructError::from(CoreReason::MapBackend)
                .with_detail("marker creation rejected".to_string())
                .err();
        }
        let id = self.next_id();
        self.events.push(MapEvent::MarkerCreated {
            marker: id,
            icon: icon.id,
            at,
        });
        Ok(MemoryMarker { id, popup: None })
    }

    fn bind_popup(&mut self, marker: &mut MemoryMarker, html: &str) -> CoreResult<()> {
        marker.popup = Some(html.to_string());
        self.events.push(MapEvent::PopupBound { marker: marker.id });
        Ok(())
    }

    fn add_to_map(&mut self, map: &MemoryMapHandle, marker: &MemoryMarker) -> CoreResult<()> {
        log::trace!("marker {} added to {}", marker.id, map.container);
        self.on_map
            .insert(marker.id, marker.popup.clone().unwrap_or_default());
        self.events.push(MapEvent::MarkerAdded { marker: marker.id });
        Ok(())
    }

    fn remove_from_map(&mut self, _map: &MemoryMapHandle, marker: MemoryMarker) {
        self.on_map.remove(&marker.id);
        self.events.push(MapEvent::MarkerRemoved { marker: marker.id });
    }
}
