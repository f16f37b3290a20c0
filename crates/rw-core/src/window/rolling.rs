use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::incident::{Incident, IncidentId};

// ---------------------------------------------------------------------------
// WorkingSet
// ---------------------------------------------------------------------------

/// Active incidents, newest first.
///
/// Only [`RollingWindow::tick`] builds non-empty sets, so the ordering and
/// capacity invariants hold for every instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WorkingSet {
    incidents: Vec<Incident>,
}

impl WorkingSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Incident> {
        self.incidents.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &IncidentId> {
        self.incidents.iter().map(|i| &i.id)
    }

    pub fn contains(&self, id: &IncidentId) -> bool {
        self.incidents.iter().any(|i| &i.id == id)
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Creation time of the newest incident.
    pub fn newest(&self) -> Option<DateTime<Utc>> {
        self.incidents.first().map(|i| i.created_at)
    }

    /// Creation time of the oldest incident.
    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.incidents.last().map(|i| i.created_at)
    }
}

impl<'a> IntoIterator for &'a WorkingSet {
    type Item = &'a Incident;
    type IntoIter = std::slice::Iter<'a, Incident>;

    fn into_iter(self) -> Self::IntoIter {
        self.incidents.iter()
    }
}

// ---------------------------------------------------------------------------
// TickReport
// ---------------------------------------------------------------------------

/// Summary of a single [`RollingWindow::tick`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Incidents dropped for being older than the retention horizon.
    pub evicted: usize,
    /// Fresh incidents merged in.
    pub added: usize,
    /// Incidents dropped by the capacity bound.
    pub truncated: usize,
    /// Capacity bound applied on this tick.
    pub capacity: usize,
}

// ---------------------------------------------------------------------------
// RollingWindow
// ---------------------------------------------------------------------------

/// Merges fresh incidents into the working set, evicting by age and capping
/// by size.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    retention: TimeDelta,
    min_capacity: usize,
}

impl RollingWindow {
    pub const DEFAULT_RETENTION: Duration = Duration::from_secs(30 * 60);
    pub const DEFAULT_MIN_CAPACITY: usize = 50;

    pub fn new(retention: Duration, min_capacity: usize) -> Self {
        Self {
            retention: TimeDelta::from_std(retention).unwrap_or(TimeDelta::MAX),
            min_capacity,
        }
    }

    pub fn retention(&self) -> TimeDelta {
        self.retention
    }

    /// Capacity bound for a tick: `max(base_count, min_capacity)`.
    pub fn capacity(&self, base_count: usize) -> usize {
        base_count.max(self.min_capacity)
    }

    /// Produce the next working set from `current`, without touching it.
    ///
    /// 1. Fresh incidents are placed ahead of the retained ones.
    /// 2. Anything created at or before `now - retention` is evicted.
    /// 3. The result is stably sorted by `created_at`, newest first, so equal
    ///    timestamps keep their insertion order.
    /// 4. The tail beyond [`capacity`](Self::capacity) is dropped.
    pub fn tick(
        &self,
        current: &WorkingSet,
        fresh: Vec<Incident>,
        now: DateTime<Utc>,
        base_count: usize,
    ) -> (WorkingSet, TickReport) {
        let cutoff = now
            .checked_sub_signed(self.retention)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let capacity = self.capacity(base_count);
        let added = fresh.len();

        let mut combined = fresh;
        combined.extend(current.incidents.iter().cloned());
        let before = combined.len();
        combined.retain(|i| i.created_at > cutoff);
        let evicted = before - combined.len();

        combined.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let truncated = combined.len().saturating_sub(capacity);
        combined.truncate(capacity);

        let report = TickReport {
            evicted,
            added,
            truncated,
            capacity,
        };
        (WorkingSet { incidents: combined }, report)
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RETENTION, Self::DEFAULT_MIN_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
