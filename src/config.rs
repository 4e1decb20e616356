use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application settings read from the user's config directory
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Route file to replay
    pub route_path: Option<PathBuf>,
    /// Initial speed multiplier
    pub speed: f64,
    /// Start playing as soon as the route is loaded
    pub autoplay: bool,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            route_path: None,
            speed: 1.0,
            autoplay: false,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("route-replay").join("settings.json"))
    }

    /// Read settings from `path`; `Ok(None)` if the file does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;

        if !(settings.speed.is_finite() && settings.speed > 0.0) {
            anyhow::bail!("speed in {} must be a positive number", path.display());
        }

        Ok(Some(settings))
    }
}
