//! Collaborator traits consumed by the docking controller.
//!
//! The controller never talks to the windowing system or the settings layer
//! directly; it goes through these seams. Both traits are asynchronous and
//! fallible: every operation crosses a process or OS boundary that can
//! refuse or stall.

pub mod settings;
pub mod sim;

use std::future::Future;

pub use settings::{JsonSettingsStore, WindowPreference};
pub use sim::{MemorySettingsStore, SimGeometryService};

use crate::dock::state::Rect;
use crate::error::EdgenoteError;

/// Windowing-system collaborator.
///
/// Monitor bounds are a read-only snapshot of the active monitor, refreshed
/// on demand and never cached beyond a single calculation.
pub trait GeometryService: Send + Sync + 'static {
    /// Bounds of the monitor the window currently lives on.
    fn monitor_bounds(&self) -> impl Future<Output = Result<Rect, EdgenoteError>> + Send;

    /// Current outer bounds of the window.
    fn window_rect(&self) -> impl Future<Output = Result<Rect, EdgenoteError>> + Send;

    /// Move and resize the window in one operation.
    fn move_resize_window(
        &self,
        rect: Rect,
    ) -> impl Future<Output = Result<(), EdgenoteError>> + Send;

    /// Whether the pointer is currently over the window.
    fn pointer_in_window(&self) -> impl Future<Output = Result<bool, EdgenoteError>> + Send;
}

/// Settings/persistence collaborator.
pub trait SettingsStore: Send + Sync + 'static {
    /// Load the persisted window preference.
    fn load_preference(
        &self,
    ) -> impl Future<Output = Result<WindowPreference, EdgenoteError>> + Send;

    /// Persist the window preference.
    fn store_preference(
        &self,
        preference: WindowPreference,
    ) -> impl Future<Output = Result<(), EdgenoteError>> + Send;
}
