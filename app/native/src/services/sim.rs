//! In-memory collaborator implementations.
//!
//! `SimGeometryService` models a single monitor, the window rectangle, and a
//! pointer-containment flag, and records every mutation it is asked to
//! perform. It backs the demo binary and the integration tests, where a real
//! windowing system is unavailable. Failure injection covers the error paths
//! of the controller without a misbehaving OS at hand.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{GeometryService, SettingsStore, WindowPreference};
use crate::dock::state::Rect;
use crate::error::EdgenoteError;

// ============================================================================
// Simulated Geometry
// ============================================================================

#[derive(Debug)]
struct SimState {
    monitor: Rect,
    window: Rect,
    pointer_inside: bool,
    moves: Vec<Rect>,
    fail_moves: bool,
    fail_queries: bool,
}

/// In-memory [`GeometryService`].
#[derive(Debug)]
pub struct SimGeometryService {
    state: Mutex<SimState>,
}

impl SimGeometryService {
    /// Create a service with the given monitor and initial window bounds.
    #[must_use]
    pub fn new(monitor: Rect, window: Rect) -> Self {
        Self {
            state: Mutex::new(SimState {
                monitor,
                window,
                pointer_inside: false,
                moves: Vec::new(),
                fail_moves: false,
                fail_queries: false,
            }),
        }
    }

    /// Convenience constructor wrapping the service in an [`Arc`].
    #[must_use]
    pub fn shared(monitor: Rect, window: Rect) -> Arc<Self> { Arc::new(Self::new(monitor, window)) }

    /// The current simulated window bounds.
    #[must_use]
    pub fn window(&self) -> Rect { self.state.lock().window }

    /// Every rectangle the controller asked to move/resize to, in order.
    #[must_use]
    pub fn move_history(&self) -> Vec<Rect> { self.state.lock().moves.clone() }

    /// Place the simulated pointer inside or outside the window.
    pub fn set_pointer_inside(&self, inside: bool) { self.state.lock().pointer_inside = inside; }

    /// Make subsequent mutations fail, as a refusing window system would.
    pub fn set_fail_moves(&self, fail: bool) { self.state.lock().fail_moves = fail; }

    /// Make subsequent queries fail.
    pub fn set_fail_queries(&self, fail: bool) { self.state.lock().fail_queries = fail; }

    /// Overwrite the simulated window bounds without recording a move, as an
    /// OS-driven resize would.
    pub fn resize_externally(&self, rect: Rect) { self.state.lock().window = rect; }
}

impl GeometryService for SimGeometryService {
    async fn monitor_bounds(&self) -> Result<Rect, EdgenoteError> {
        let state = self.state.lock();
        if state.fail_queries {
            return Err(EdgenoteError::GeometryError("monitor query refused".to_string()));
        }
        Ok(state.monitor)
    }

    async fn window_rect(&self) -> Result<Rect, EdgenoteError> {
        let state = self.state.lock();
        if state.fail_queries {
            return Err(EdgenoteError::GeometryError("window query refused".to_string()));
        }
        Ok(state.window)
    }

    async fn move_resize_window(&self, rect: Rect) -> Result<(), EdgenoteError> {
        let mut state = self.state.lock();
        if state.fail_moves {
            return Err(EdgenoteError::GeometryError("window mutation refused".to_string()));
        }
        state.window = rect;
        state.moves.push(rect);
        Ok(())
    }

    async fn pointer_in_window(&self) -> Result<bool, EdgenoteError> {
        let state = self.state.lock();
        if state.fail_queries {
            return Err(EdgenoteError::GeometryError("pointer query refused".to_string()));
        }
        Ok(state.pointer_inside)
    }
}

// ============================================================================
// In-memory Settings
// ============================================================================

/// In-memory [`SettingsStore`] with a store counter for assertions.
#[derive(Debug)]
pub struct MemorySettingsStore {
    preference: Mutex<WindowPreference>,
    store_count: Mutex<usize>,
}

impl MemorySettingsStore {
    /// Create a store seeded with the given preference.
    #[must_use]
    pub const fn new(preference: WindowPreference) -> Self {
        Self {
            preference: Mutex::new(preference),
            store_count: Mutex::new(0),
        }
    }

    /// The current preference.
    #[must_use]
    pub fn current(&self) -> WindowPreference { *self.preference.lock() }

    /// How many times `store_preference` has been called.
    #[must_use]
    pub fn store_count(&self) -> usize { *self.store_count.lock() }
}

impl Default for MemorySettingsStore {
    fn default() -> Self { Self::new(WindowPreference::default()) }
}

impl SettingsStore for MemorySettingsStore {
    async fn load_preference(&self) -> Result<WindowPreference, EdgenoteError> {
        Ok(*self.preference.lock())
    }

    async fn store_preference(&self, preference: WindowPreference) -> Result<(), EdgenoteError> {
        *self.preference.lock() = preference;
        *self.store_count.lock() += 1;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sim_records_moves() {
        let sim = SimGeometryService::new(
            Rect::new(0.0, 0.0, 1920.0, 1080.0),
            Rect::new(100.0, 100.0, 400.0, 600.0),
        );

        let target = Rect::new(200.0, 200.0, 400.0, 600.0);
        sim.move_resize_window(target).await.unwrap();
        assert_eq!(sim.window(), target);
        assert_eq!(sim.move_history(), vec![target]);
    }

    #[tokio::test]
    async fn test_sim_failure_injection() {
        let sim = SimGeometryService::new(Rect::zero(), Rect::zero());
        sim.set_fail_moves(true);
        assert!(sim.move_resize_window(Rect::zero()).await.is_err());
        assert!(sim.move_history().is_empty());

        sim.set_fail_queries(true);
        assert!(sim.monitor_bounds().await.is_err());
        assert!(sim.pointer_in_window().await.is_err());
    }

    #[tokio::test]
    async fn test_external_resize_does_not_record_a_move() {
        let sim = SimGeometryService::new(Rect::zero(), Rect::zero());
        sim.resize_externally(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert!(sim.move_history().is_empty());
        assert_eq!(sim.window(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[tokio::test]
    async fn test_memory_store_counts_writes() {
        let store = MemorySettingsStore::default();
        assert_eq!(store.store_count(), 0);

        let mut preference = store.load_preference().await.unwrap();
        preference.remember_size = true;
        store.store_preference(preference).await.unwrap();

        assert_eq!(store.store_count(), 1);
        assert!(store.current().remember_size);
    }
}
