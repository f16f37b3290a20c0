pub mod descriptions;
pub mod random;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};
use orion_error::prelude::*;

use crate::catalog::{Catalog, Region};
use crate::error::{CoreReason, CoreResult};
use crate::geo::GeoPoint;
use crate::incident::{Incident, IncidentId, IncidentKind, Severity};
use crate::temporal;

pub use descriptions::descriptions;
pub use random::{RandomSource, ReplaySource};

static INCIDENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Display format for [`Incident::display_date`].
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y, %H:%M";

/// Lower bound of [`base_incident_count`].
pub const BASE_INCIDENT_FLOOR: f64 = 15.0;
/// Span of [`base_incident_count`] before weighting.
pub const BASE_INCIDENT_SPAN: f64 = 15.0;

// ---------------------------------------------------------------------------
// IncidentGenerator
// ---------------------------------------------------------------------------

/// Produces synthetic incidents biased by the local time of day and week.
///
/// Each incident consumes exactly seven draws from the random source, in this
/// order: region, route, type roll, severity roll, description, latitude,
/// longitude. Two calls fed the same draws at different instants therefore
/// differ only where the time weights change the outcome.
#[derive(Debug, Clone)]
pub struct IncidentGenerator {
    catalog: Arc<Catalog>,
}

impl IncidentGenerator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Generate exactly `count` incidents stamped at `now`.
    ///
    /// A negative `count` is rejected with [`CoreReason::InvalidArgument`].
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        count: i64,
        now: DateTime<FixedOffset>,
        rng: &mut R,
    ) -> CoreResult<Vec<Incident>> {
        if count < 0 {
            return StructError::from(CoreReason::InvalidArgument)
                .with_detail(format!("incident count must be >= 0, got {count}"))
                .err();
        }

        let weight = temporal::intensity(&now);
        let created_at = now.with_timezone(&Utc);
        let display_date = now.format(DISPLAY_DATE_FORMAT).to_string();

        let mut incidents = Vec::with_capacity(count as usize);
        for _ in 0..count {
            incidents.push(self.generate_one(weight, created_at, &display_date, rng));
        }
        Ok(incidents)
    }

    fn generate_one<R: RandomSource + ?Sized>(
        &self,
        weight: f64,
        created_at: DateTime<Utc>,
        display_date: &str,
        rng: &mut R,
    ) -> Incident {
        let regions = self.catalog.regions();
        let region = &regions[rng.pick_index(regions.len())];
        let route = &region.routes[rng.pick_index(region.routes.len())];

        let kind = IncidentKind::from_roll(rng.next_unit() * weight);
        let severity = Severity::from_roll(rng.next_unit() * weight);

        let choices = descriptions(kind, severity);
        let text = choices[rng.pick_index(choices.len())];

        let coordinates = scatter(region, rng);

        Incident {
            id: next_incident_id(created_at),
            kind,
            route: route.clone(),
            location_label: format!("{} - {}", region.name, route.display_name),
            description: severity.tag(text),
            coordinates,
            region_name: region.name.clone(),
            created_at,
            display_date: display_date.to_string(),
        }
    }
}

/// Draw a point uniformly from the square of half-side `dispersion_radius`
/// around the region center.
fn scatter<R: RandomSource + ?Sized>(region: &Region, rng: &mut R) -> GeoPoint {
    let span = region.dispersion_radius * 2.0;
    let lat = region.center.lat + (rng.next_unit() - 0.5) * span;
    let lng = region.center.lng + (rng.next_unit() - 0.5) * span;
    GeoPoint::new(lat, lng)
}

fn next_incident_id(created_at: DateTime<Utc>) -> IncidentId {
    let seq = INCIDENT_SEQ.fetch_add(1, Ordering::Relaxed);
    let millis = created_at.timestamp_millis().max(0) as u64;
    IncidentId::new(format!("inc-{millis:x}-{seq:04x}"))
}

// ---------------------------------------------------------------------------
// Volume helpers
// ---------------------------------------------------------------------------

/// Suggested working-set population for `now`:
/// `floor(15 + u * 15 * hour_weight * day_weight)`.
pub fn base_incident_count<T, R>(now: &T, rng: &mut R) -> usize
where
    T: Timelike + Datelike,
    R: RandomSource + ?Sized,
{
    let weight = temporal::intensity(now);
    (BASE_INCIDENT_FLOOR + rng.next_unit() * BASE_INCIDENT_SPAN * weight).floor() as usize
}

/// Number of incidents to add on a periodic tick: `max(1, floor(u * max_new))`.
pub fn tick_batch_size<R: RandomSource + ?Sized>(rng: &mut R, max_new: u32) -> usize {
    let drawn = (rng.next_unit() * f64::from(max_new)).floor() as usize;
    drawn.max(1)
}
