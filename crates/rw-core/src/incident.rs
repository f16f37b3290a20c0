use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Route;
use crate::geo::GeoPoint;

// ---------------------------------------------------------------------------
// IncidentId
// ---------------------------------------------------------------------------

/// Opaque, process-unique incident identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(String);

impl IncidentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// IncidentKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentKind {
    Collision,
    Blockage,
    Construction,
}

impl IncidentKind {
    pub const ALL: [IncidentKind; 3] = [Self::Collision, Self::Blockage, Self::Construction];

    /// Classify a weighted roll: `> 1.2` collision, `> 0.7` blockage, else construction.
    pub fn from_roll(roll: f64) -> Self {
        if roll > 1.2 {
            Self::Collision
        } else if roll > 0.7 {
            Self::Blockage
        } else {
            Self::Construction
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collision => "Collision",
            Self::Blockage => "Blockage",
            Self::Construction => "Construction",
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity is never stored as a field: it travels inside the description as a
/// `[High]` / `[Medium]` / `[Low]` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Self::High, Self::Medium, Self::Low];

    /// Classify a weighted roll: `> 1.5` high, `> 0.8` medium, else low.
    pub fn from_roll(roll: f64) -> Self {
        if roll > 1.5 {
            Self::High
        } else if roll > 0.8 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Prefix `text` with this severity's tag: `"[High] text"`.
    pub fn tag(&self, text: &str) -> String {
        format!("[{}] {text}", self.as_str())
    }

    /// Read the severity tag back out of a description.
    ///
    /// Untagged descriptions read as [`Severity::Low`].
    pub fn from_description(description: &str) -> Self {
        Self::parse_tag(description).unwrap_or(Self::Low)
    }

    /// Strict variant of [`from_description`](Self::from_description).
    pub fn parse_tag(description: &str) -> Option<Self> {
        let rest = description.strip_prefix('[')?;
        let (tag, _) = rest.split_once(']')?;
        Self::ALL.into_iter().find(|s| s.as_str() == tag)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Incident
// ---------------------------------------------------------------------------

/// A single synthetic road incident. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    #[serde(rename = "type")]
    pub kind: IncidentKind,
    pub route: Route,
    /// `"{region} - {route display name}"`.
    pub location_label: String,
    /// Free text carrying the severity tag.
    pub description: String,
    pub coordinates: GeoPoint,
    pub region_name: String,
    pub created_at: DateTime<Utc>,
    /// `dd/mm/yyyy, HH:MM` in the feed's local offset.
    pub display_date: String,
}

impl Incident {
    pub fn severity(&self) -> Severity {
        Severity::from_description(&self.description)
    }
}
