mod builtin;

use std::path::Path;

use orion_error::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CoreReason, CoreResult};
use crate::geo::GeoPoint;

// ---------------------------------------------------------------------------
// Route / Region
// ---------------------------------------------------------------------------

/// A named road segment. Owned by exactly one [`Region`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Highway designator, e.g. `"BR-116"`.
    pub code: String,
    /// Common name, e.g. `"Rodovia Presidente Dutra"`.
    pub display_name: String,
}

/// A named geographic cluster incidents are generated around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub center: GeoPoint,
    /// Half-side of the square footprint coordinates are drawn from, in degrees.
    pub dispersion_radius: f64,
    /// Relative traffic intensity of the region.
    pub traffic_factor: f64,
    #[serde(default, rename = "route")]
    pub routes: Vec<Route>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "region")]
    regions: Vec<Region>,
}

/// Immutable set of regions eligible for incident generation.
///
/// Every region held here has at least one route; regions without routes are
/// dropped at construction time.
#[derive(Debug, Clone)]
pub struct Catalog {
    regions: Vec<Region>,
}

impl Catalog {
    /// Build a catalog, excluding regions that have no routes.
    ///
    /// Fails when no eligible region remains.
    pub fn new(regions: Vec<Region>) -> CoreResult<Self> {
        let total = regions.len();
        let regions: Vec<Region> = regions
            .into_iter()
            .filter(|r| {
                if r.routes.is_empty() {
                    log::warn!("region {:?} has no routes; excluded from catalog", r.name);
                    false
                } else {
                    true
                }
            })
            .collect();

        if regions.is_empty() {
            return StructError::from(CoreReason::Catalog)
                .with_detail(format!("no eligible regions among {total} loaded"))
                .err();
        }
        Ok(Self { regions })
    }

    /// The catalog shipped with the crate: ten Brazilian states and their highways.
    pub fn builtin() -> Self {
        Self {
            regions: builtin::regions(),
        }
    }

    /// Parse a catalog from TOML (`[[region]]` tables with nested `[[region.route]]`).
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let file: CatalogFile = toml::from_str(s).map_err(|e| {
            StructError::from(CoreReason::Catalog).with_detail(format!("invalid catalog: {e}"))
        })?;
        Self::new(file.regions)
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StructError::from(CoreReason::Catalog)
                .with_detail(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
