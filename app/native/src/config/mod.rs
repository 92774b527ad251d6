//! Configuration for the docking controller.
//!
//! The configuration file supports JSONC format (JSON with comments). Every
//! field has a default, so a missing or partial file never prevents startup;
//! a malformed file logs a warning and falls back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use json_comments::StripComments;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{geometry, timing};
use crate::dock::state::DockedEdge;

/// File name of the configuration file inside the config directory.
const CONFIG_FILE: &str = "config.jsonc";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file exists at any search path.
    #[error("configuration file not found")]
    NotFound,
    /// The file exists but could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The file exists but is not valid JSONC.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// Config Type
// ============================================================================

/// Tuning knobs for the docking controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DockConfig {
    /// The edge the window docks to at startup.
    pub default_edge: DockedEdge,

    /// Thickness of the collapsed indicator strip (px).
    pub indicator_thickness: f64,

    /// Delay before a leave event collapses the window (ms).
    pub collapse_delay_ms: u64,

    /// Settle window for live-resize events (ms).
    pub resize_settle_ms: u64,

    /// Delay between expand and re-collapse when switching edges (ms).
    pub dock_switch_delay_ms: u64,

    /// Delay before the pointer re-check after a pin release (ms).
    pub pin_release_recheck_ms: u64,

    /// Grace period after a drag ends with the pointer outside (ms).
    pub drag_end_grace_ms: u64,

    /// How long the adjusting guard holds after a corrective move (ms).
    pub adjust_settle_ms: u64,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            default_edge: DockedEdge::Right,
            indicator_thickness: geometry::INDICATOR_THICKNESS,
            collapse_delay_ms: timing::COLLAPSE_DELAY_MS,
            resize_settle_ms: timing::RESIZE_SETTLE_MS,
            dock_switch_delay_ms: timing::DOCK_SWITCH_DELAY_MS,
            pin_release_recheck_ms: timing::PIN_RELEASE_RECHECK_MS,
            drag_end_grace_ms: timing::DRAG_END_GRACE_MS,
            adjust_settle_ms: timing::ADJUST_SETTLE_MS,
        }
    }
}

impl DockConfig {
    /// Delay before a leave event collapses the window.
    #[must_use]
    pub const fn collapse_delay(&self) -> Duration {
        Duration::from_millis(self.collapse_delay_ms)
    }

    /// Settle window for live-resize events.
    #[must_use]
    pub const fn resize_settle(&self) -> Duration { Duration::from_millis(self.resize_settle_ms) }

    /// Delay between expand and re-collapse when switching edges.
    #[must_use]
    pub const fn dock_switch_delay(&self) -> Duration {
        Duration::from_millis(self.dock_switch_delay_ms)
    }

    /// Delay before the pointer re-check after a pin release.
    #[must_use]
    pub const fn pin_release_recheck(&self) -> Duration {
        Duration::from_millis(self.pin_release_recheck_ms)
    }

    /// Grace period after a drag ends with the pointer outside.
    #[must_use]
    pub const fn drag_end_grace(&self) -> Duration {
        Duration::from_millis(self.drag_end_grace_ms)
    }

    /// How long the adjusting guard holds after a corrective move.
    #[must_use]
    pub const fn adjust_settle(&self) -> Duration { Duration::from_millis(self.adjust_settle_ms) }
}

// ============================================================================
// Loading
// ============================================================================

/// The default configuration file path.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("edgenote").join(CONFIG_FILE))
}

/// Load the configuration from a specific path.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when the file does not exist, or an IO
/// or parse error when it exists but cannot be used.
pub fn load_config_from_path(path: &Path) -> Result<DockConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    let content = fs::read_to_string(path)?;
    let stripped = StripComments::new(content.as_bytes());
    let config = serde_json::from_reader(stripped)?;
    Ok(config)
}

/// Load the configuration from the default path, falling back to defaults.
///
/// A missing file is expected on first run; a malformed file is logged and
/// ignored.
#[must_use]
pub fn load_or_default() -> DockConfig {
    let Some(path) = config_path() else {
        tracing::debug!("no config directory available, using default configuration");
        return DockConfig::default();
    };

    match load_config_from_path(&path) {
        Ok(config) => config,
        Err(ConfigError::NotFound) => DockConfig::default(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to load configuration, using defaults");
            DockConfig::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = DockConfig::default();
        assert_eq!(config.default_edge, DockedEdge::Right);
        assert_eq!(config.collapse_delay(), Duration::from_millis(500));
        assert_eq!(config.resize_settle(), Duration::from_millis(500));
        assert_eq!(config.dock_switch_delay(), Duration::from_millis(100));
        assert_eq!(config.drag_end_grace(), Duration::from_millis(300));
        assert!((config.indicator_thickness - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from_path(&dir.path().join(CONFIG_FILE));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_jsonc_with_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{
                // Dock to the top by default
                "default-edge": "Top",
                /* quicker collapse */
                "collapse-delay-ms": 250
            }"#,
        )
        .unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.default_edge, DockedEdge::Top);
        assert_eq!(config.collapse_delay(), Duration::from_millis(250));
        // Unspecified fields keep their defaults
        assert_eq!(config.resize_settle(), Duration::from_millis(500));
    }

    #[test]
    fn test_load_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not valid").unwrap();

        let result = load_config_from_path(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = DockConfig {
            default_edge: DockedEdge::Top,
            collapse_delay_ms: 123,
            ..DockConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: DockConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
