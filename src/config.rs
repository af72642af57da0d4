//! Project configuration file (.grove.toml)

use std::path::Path;

use serde::Deserialize;

pub const CONFIG_FILE: &str = ".grove.toml";

/// Settings read from `.grove.toml` at the project root. CLI flags win
/// over anything set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroveConfig {
    /// Path prefixes to exclude from analysis.
    pub ignore: Vec<String>,
    /// Use extended (import-declared) edge detection.
    pub extended: bool,
    /// Include external modules as pseudo-nodes.
    pub include_modules: bool,
    /// Depth bound for closure queries.
    pub max_depth: Option<usize>,
    /// Globs marking files as entry points for orphan detection.
    pub entry_points: Vec<String>,
}

impl GroveConfig {
    /// Load the config for `root`. A missing file is the default config;
    /// an unreadable one is a warning, never an error.
    pub fn load(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("cannot read {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("cannot parse {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
