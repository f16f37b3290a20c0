use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// `[logging]` section. Omitted entirely, the feed logs `info` and above to
/// stderr in the plain format.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default directive, e.g. `"info"` or `"warn,rw_runtime=debug"`.
    pub level: String,
    /// Per-target overrides applied after `level`, in key order:
    /// `modules = { "rw_core::map" = "debug" }`.
    pub modules: BTreeMap<String, String>,
    /// Extra log file, relative to the config file's directory.
    pub file: Option<PathBuf>,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            modules: BTreeMap::new(),
            file: None,
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `[domain]`-prefixed text lines.
    #[default]
    Plain,
    /// One JSON object per event, `domain` kept as a field.
    Json,
}
