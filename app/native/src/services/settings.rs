//! Persisted window preference and its file-backed store.
//!
//! The preference file is small and read rarely (initialization and resize
//! settle), so the store keeps a cached copy behind a mutex and replaces the
//! file atomically on write: a half-written preference file must never make
//! the next launch fall over.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::SettingsStore;
use crate::dock::state::Rect;
use crate::error::EdgenoteError;

/// File name of the preference store inside the data directory.
const PREFERENCE_FILE: &str = "window.json";

// ============================================================================
// Window Preference
// ============================================================================

/// The persisted window preference.
///
/// Created with defaults at first run; `saved_rect` is overwritten on every
/// resize settle while `remember_size` is on, and is only restored at
/// initialization when it is structurally valid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowPreference {
    /// Whether the expanded geometry survives restarts.
    #[serde(default)]
    pub remember_size: bool,

    /// The last persisted expanded geometry.
    #[serde(default = "default_saved_rect")]
    pub saved_rect: Rect,

    /// Whether edge-snap detection is enabled for manual window drags.
    #[serde(default = "default_edge_docking")]
    pub edge_docking: bool,
}

fn default_saved_rect() -> Rect { Rect::new(1400.0, 100.0, 384.0, 720.0) }

const fn default_edge_docking() -> bool { true }

impl Default for WindowPreference {
    fn default() -> Self {
        Self {
            remember_size: false,
            saved_rect: default_saved_rect(),
            edge_docking: default_edge_docking(),
        }
    }
}

// ============================================================================
// JSON Settings Store
// ============================================================================

/// File-backed [`SettingsStore`] implementation.
pub struct JsonSettingsStore {
    path: PathBuf,
    cache: Mutex<Option<WindowPreference>>,
}

impl JsonSettingsStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path, cache: Mutex::new(None) }
    }

    /// Create a store at the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns an error when no data directory is available or it cannot be
    /// created.
    pub fn at_default_path() -> Result<Self, EdgenoteError> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| EdgenoteError::SettingsError("no data directory".to_string()))?
            .join("edgenote");
        fs::create_dir_all(&data_dir)?;
        Ok(Self::new(data_dir.join(PREFERENCE_FILE)))
    }

    /// The path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    fn read_from_disk(&self) -> WindowPreference {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return WindowPreference::default();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "preference file unreadable, using defaults");
                return WindowPreference::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(preference) => preference,
            Err(err) => {
                // A corrupt or partial preference is treated as absent.
                tracing::warn!(path = %self.path.display(), error = %err, "preference file invalid, using defaults");
                WindowPreference::default()
            }
        }
    }

    fn write_to_disk(&self, preference: &WindowPreference) -> Result<(), EdgenoteError> {
        let content = serde_json::to_string_pretty(preference)?;

        let parent = self.path.parent().ok_or_else(|| {
            EdgenoteError::SettingsError(format!(
                "preference path has no parent: {}",
                self.path.display()
            ))
        })?;

        let mut file = tempfile::NamedTempFile::new_in(parent)?;
        std::io::Write::write_all(&mut file, content.as_bytes())?;
        file.persist(&self.path)
            .map_err(|err| EdgenoteError::SettingsError(err.to_string()))?;
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    async fn load_preference(&self) -> Result<WindowPreference, EdgenoteError> {
        if let Some(cached) = *self.cache.lock() {
            return Ok(cached);
        }

        let preference = self.read_from_disk();
        *self.cache.lock() = Some(preference);
        Ok(preference)
    }

    async fn store_preference(&self, preference: WindowPreference) -> Result<(), EdgenoteError> {
        self.write_to_disk(&preference)?;
        *self.cache.lock() = Some(preference);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
