use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Snapshot sink settings, deserialized from `[snapshot]`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Append every published snapshot as one JSON line to this file.
    /// Relative paths resolve against the config file's directory.
    pub file: Option<PathBuf>,
}
