use std::collections::{HashMap, HashSet};

use orion_error::prelude::*;

use super::backend::{MapBackend, MapView};
use super::icon::IconSpec;
use super::popup::render_popup;
use crate::error::{CoreReason, CoreResult};
use crate::incident::{Incident, IncidentId};
use crate::publish::FeedSubscriber;
use crate::window::Snapshot;

struct MarkerEntry<B: MapBackend> {
    marker: B::Marker,
    icon: B::Icon,
}

/// Outcome of one [`MarkerSync::reconcile`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// The map did not exist yet; nothing was touched.
    pub skipped: bool,
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
    /// Incidents whose marker could not be placed. They stay out of the
    /// registry and are retried on the next reconcile.
    pub failed: usize,
}

/// Keeps the markers on a map in step with the working set.
///
/// The registry maps each placed incident to its marker and icon handles.
/// Every icon allocated here is released exactly once: when its incident
/// leaves the working set, when placement fails part-way, or on teardown.
/// Dropping a `MarkerSync` tears it down.
pub struct MarkerSync<B: MapBackend> {
    name: String,
    backend: B,
    map: Option<B::Map>,
    registry: HashMap<IncidentId, MarkerEntry<B>>,
}

impl<B: MapBackend> MarkerSync<B> {
    pub fn new(backend: B) -> Self {
        Self {
            name: "marker-sync".to_string(),
            backend,
            map: None,
            registry: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_attached(&self) -> bool {
        self.map.is_some()
    }

    /// Create the map and its tile layer. Calling it again once attached is
    /// a no-op.
    pub fn attach(&mut self, view: &MapView) -> CoreResult<()> {
        if self.map.is_some() {
            return Ok(());
        }
        let map = self.backend.create_map(view)?;
        self.backend.add_tile_layer(&map, &view.tiles)?;
        self.map = Some(map);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, id: &IncidentId) -> bool {
        self.registry.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &IncidentId> {
        self.registry.keys()
    }

    /// Apply the minimal set of marker removals and additions so the
    /// registry holds exactly the ids in `incidents`.
    ///
    /// Markers already on the map are never moved or restyled. Without a map
    /// this skips and reports `skipped`.
    pub fn reconcile(&mut self, incidents: &[Incident]) -> ReconcileReport {
        let Some(map) = self.map.as_ref() else {
            return ReconcileReport {
                skipped: true,
                ..ReconcileReport::default()
            };
        };
        let mut report = ReconcileReport::default();

        let current: HashSet<&IncidentId> = incidents.iter().map(|i| &i.id).collect();
        let stale: Vec<IncidentId> = self
            .registry
            .keys()
            .filter(|id| !current.contains(id))
            .cloned()
            .collect();
        for id in stale {
            if let Some(entry) = self.registry.remove(&id) {
                self.backend.remove_from_map(map, entry.marker);
                self.backend.release_icon(entry.icon);
                report.removed += 1;
            }
        }

        for incident in incidents {
            if self.registry.contains_key(&incident.id) {
                report.unchanged += 1;
                continue;
            }
            match place(&mut self.backend, map, incident) {
                Ok(entry) => {
                    self.registry.insert(incident.id.clone(), entry);
                    report.added += 1;
                }
                Err(e) => {
                    log::warn!("marker for {} not placed: {e}", incident.id);
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Remove every marker and release every icon. Returns how many entries
    /// were released. The map handle is dropped, so a later
    /// [`reconcile`](Self::reconcile) skips until [`attach`](Self::attach)
    /// runs again.
    pub fn teardown(&mut self) -> usize {
        let map = self.map.take();
        let released = self.registry.len();
        for (_, entry) in self.registry.drain() {
            if let Some(map) = map.as_ref() {
                self.backend.remove_from_map(map, entry.marker);
            }
            self.backend.release_icon(entry.icon);
        }
        released
    }
}

/// Build an icon and a mounted marker for one incident. The icon is released
/// again if any later step fails.
fn place<B: MapBackend>(
    backend: &mut B,
    map: &B::Map,
    incident: &Incident,
) -> CoreResult<MarkerEntry<B>> {
    let icon = backend.create_icon(&IconSpec::for_kind(incident.kind))?;
    match mount(backend, map, incident, &icon) {
        Ok(marker) => Ok(MarkerEntry { marker, icon }),
        Err(e) => {
            backend.release_icon(icon);
            Err(e)
        }
    }
}

fn mount<B: MapBackend>(
    backend: &mut B,
    map: &B::Map,
    incident: &Incident,
    icon: &B::Icon,
) -> CoreResult<B::Marker> {
    let mut marker = backend.create_marker(incident.coordinates, icon)?;
    backend.bind_popup(&mut marker, &render_popup(incident))?;
    backend.add_to_map(map, &marker)?;
    Ok(marker)
}

impl<B: MapBackend> Drop for MarkerSync<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<B: MapBackend> FeedSubscriber for MarkerSync<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn publish(&mut self, snapshot: &Snapshot) -> CoreResult<()> {
        let report = self.reconcile(snapshot.working_set.incidents());
        if report.skipped {
            log::debug!("map not attached, snapshot {} not rendered", snapshot.seq);
            return Ok(());
        }
        log::debug!(
            "snapshot {} rendered: +{} -{} ={}",
            snapshot.seq,
            report.added,
            report.removed,
            report.unchanged
        );
        if report.failed > 0 {
            return StructError::from(CoreReason::MapBackend)
                .with_detail(format!(
                    "{} of {} markers not placed",
                    report.failed,
                    snapshot.len()
                ))
                .err();
        }
        Ok(())
    }

    fn close(&mut self) -> CoreResult<()> {
        let released = self.teardown();
        log::debug!("marker sync closed, released {released} markers");
        Ok(())
    }
}
