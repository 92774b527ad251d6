//! Error types for Edgenote.
//!
//! This module provides the unified error type used throughout the docking
//! controller. The type implements `Serialize` so it can cross the IPC
//! boundary to the UI layer as structured error information.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while driving the docking controller.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum EdgenoteError {
    /// A monitor/window/pointer query or a window mutation failed at the
    /// windowing-system boundary.
    #[error("Geometry error: {0}")]
    GeometryError(String),
    /// Loading or storing the persisted window preference failed.
    #[error("Settings error: {0}")]
    SettingsError(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for EdgenoteError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for EdgenoteError {
    fn from(err: serde_json::Error) -> Self { Self::SettingsError(err.to_string()) }
}
