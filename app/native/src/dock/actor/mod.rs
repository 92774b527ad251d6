//! The dock state machine actor.
//!
//! The actor owns all docking state and processes messages sequentially on a
//! single task, so no locking is required and one logical transition never
//! overlaps another. Geometry mutations are awaited inline; delayed
//! transitions go through the named timer slots and re-validate their guards
//! when they fire.
//!
//! Pin state has unconditional precedence over every timer-driven or
//! hover-driven collapse: it is checked when a collapse is scheduled and
//! again when the timer fires, closing the race where pin is toggled during
//! the delay window.
//!
//! Every windowing-system failure is caught at the call site, logged, and
//! leaves the in-memory state unchanged; the user simply sees no visible
//! effect and can retry by re-triggering the gesture.

mod handle;
mod messages;

use std::sync::Arc;

pub use handle::{ActorError, DockHandle};
pub use messages::{CollapseSource, DockMessage, DockQuery, DockQueryResult, ExpandSource};

use eyeball::SharedObservable;
use tokio::sync::mpsc;

use crate::config::DockConfig;
use crate::dock::geometry;
use crate::dock::state::{DockState, DockedEdge, Rect};
use crate::dock::timer::TimerSlots;
use crate::services::{GeometryService, SettingsStore};

/// Channel buffer size for the dock actor.
const CHANNEL_BUFFER_SIZE: usize = 64;

/// The dock state machine.
///
/// Spawned once per window; communicates with the windowing system through
/// the [`GeometryService`] collaborator and with the settings layer through
/// the [`SettingsStore`] collaborator.
pub struct DockController<G, S> {
    /// Docking state, owned exclusively by this actor.
    state: DockState,

    /// Tuning knobs (delays, strip thickness, default edge).
    config: DockConfig,

    /// Windowing-system collaborator.
    geometry: Arc<G>,

    /// Persistence collaborator.
    settings: Arc<S>,

    /// Receiver for incoming messages.
    receiver: mpsc::Receiver<DockMessage>,

    /// Sender handed to timer slots so completions come back as messages.
    sender: mpsc::Sender<DockMessage>,

    /// Named one-shot timer slots.
    timers: TimerSlots,

    /// Published read-only projection.
    snapshot: SharedObservable<crate::dock::state::DockSnapshot>,
}

impl<G, S> DockController<G, S>
where
    G: GeometryService,
    S: SettingsStore,
{
    /// Spawn the dock actor and return a handle for communication.
    ///
    /// The actor starts in the collapsed state on the configured default
    /// edge; call [`DockHandle::initialize`] once the collaborators are
    /// ready to serve geometry.
    #[must_use]
    pub fn spawn(geometry: Arc<G>, settings: Arc<S>, config: DockConfig) -> DockHandle {
        tracing::debug!(edge = ?config.default_edge, "spawning dock actor");
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let state = DockState::new(config.default_edge);
        let snapshot = SharedObservable::new(state.snapshot());
        let handle = DockHandle::new(sender.clone(), snapshot.clone());

        let actor = Self {
            state,
            config,
            geometry,
            settings,
            receiver,
            sender,
            timers: TimerSlots::default(),
            snapshot,
        };

        tokio::spawn(actor.run());

        handle
    }

    /// Run the actor's message loop.
    async fn run(mut self) {
        tracing::trace!("dock actor message loop starting");

        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, DockMessage::Shutdown) {
                tracing::debug!("dock actor received shutdown message");
                break;
            }
            self.handle_message(msg).await;
        }

        // A late-firing timer must never act on a destroyed window.
        self.timers.cancel_all();
        tracing::debug!("dock actor stopped");
    }

    /// Handle a single message.
    async fn handle_message(&mut self, msg: DockMessage) {
        tracing::trace!(message = msg.name(), "dock actor handling message");
        match msg {
            DockMessage::Initialize => self.on_initialize().await,

            DockMessage::RequestExpand { source } => self.on_request_expand(source).await,
            DockMessage::RequestCollapse { source } => self.on_request_collapse(source),
            DockMessage::TogglePin => self.on_toggle_pin().await,
            DockMessage::ToggleDockEdge => self.on_toggle_dock_edge().await,

            DockMessage::IndicatorEntered => {
                self.timers.collapse.cancel();
                self.on_request_expand(ExpandSource::Hover).await;
            }
            DockMessage::IndicatorLeft => self.on_request_collapse(CollapseSource::HoverLeave),
            DockMessage::WindowEntered => self.timers.collapse.cancel(),
            DockMessage::WindowLeft => self.on_request_collapse(CollapseSource::WindowLeave),
            DockMessage::DragStarted => self.state.dragging = true,
            DockMessage::DragEnded => self.on_drag_ended().await,
            DockMessage::LiveResize { rect } => self.on_live_resize(rect),

            DockMessage::CollapseElapsed { source, generation } => {
                self.on_collapse_elapsed(source, generation).await;
            }
            DockMessage::ResizeSettled { generation } => {
                self.on_resize_settled(generation).await;
            }
            DockMessage::DockSwitchElapsed { generation } => {
                self.on_dock_switch_elapsed(generation).await;
            }
            DockMessage::PinReleaseElapsed { generation } => {
                self.on_pin_release_elapsed(generation).await;
            }
            DockMessage::DragGraceElapsed { generation } => {
                if self.timers.drag_grace.accepts(generation) {
                    self.state.dragging = false;
                    // The pointer never came back; resume leave handling.
                    self.on_request_collapse(CollapseSource::WindowLeave);
                }
            }
            DockMessage::AdjustSettled { generation } => {
                if self.timers.adjust_settle.accepts(generation) {
                    self.state.adjusting = false;
                }
            }

            DockMessage::Query { query, respond_to } => {
                let result = self.execute_query(query);
                if respond_to.send(result).is_err() {
                    tracing::warn!("failed to send query response (channel closed)");
                }
            }

            // Shutdown handled in run()
            DockMessage::Shutdown => unreachable!(),
        }
    }

    // ========================================================================
    // Query Execution
    // ========================================================================

    fn execute_query(&self, query: DockQuery) -> DockQueryResult {
        match query {
            DockQuery::Snapshot => DockQueryResult::Snapshot(self.state.snapshot()),
            DockQuery::ExpandedRect => DockQueryResult::ExpandedRect(self.state.expanded_rect),
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Compute or restore the expanded geometry and dock to the default edge.
    async fn on_initialize(&mut self) {
        let monitor = match self.geometry.monitor_bounds().await {
            Ok(monitor) => monitor,
            Err(err) => {
                tracing::warn!(error = %err, "monitor query failed during initialization");
                return;
            }
        };
        let current = match self.geometry.window_rect().await {
            Ok(rect) => rect,
            Err(err) => {
                tracing::warn!(error = %err, "window query failed during initialization");
                return;
            }
        };

        let preference = match self.settings.load_preference().await {
            Ok(preference) => preference,
            Err(err) => {
                tracing::warn!(error = %err, "preference load failed, using defaults");
                crate::services::WindowPreference::default()
            }
        };

        let expanded = if preference.remember_size && preference.saved_rect.is_fully_specified() {
            tracing::debug!(rect = ?preference.saved_rect, "restoring remembered window geometry");
            preference.saved_rect.floored()
        } else {
            geometry::default_expanded_rect(monitor, current.width)
        };

        self.state.expanded_rect = Some(expanded);
        self.state.right_edge_anchor = Some(expanded.right());

        let strip =
            geometry::collapsed_rect(self.state.edge, expanded, self.config.indicator_thickness);
        match self.geometry.move_resize_window(strip).await {
            Ok(()) => {
                self.state.collapsed = true;
                self.publish();
                tracing::debug!(edge = ?self.state.edge, ?expanded, "docked to default edge");
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to dock during initialization");
            }
        }
    }

    /// Expand the window to the last known expanded geometry.
    async fn on_request_expand(&mut self, source: ExpandSource) {
        if !self.state.collapsed {
            return;
        }
        let Some(expanded) = self.state.expanded_rect else {
            tracing::debug!(?source, "expand requested before initialization");
            return;
        };

        // An expand supersedes any pending collapse.
        self.timers.collapse.cancel();

        match self.geometry.move_resize_window(expanded).await {
            Ok(()) => {
                self.state.collapsed = false;
                self.publish();
                tracing::debug!(?source, "window expanded");
            }
            Err(err) => {
                tracing::warn!(?source, error = %err, "failed to expand window");
            }
        }
    }

    /// Schedule the delayed collapse. Pin wins over every collapse request;
    /// a drag in progress suppresses window-leave collapse entirely.
    fn on_request_collapse(&mut self, source: CollapseSource) {
        if self.state.pinned {
            tracing::debug!(?source, "window pinned, ignoring collapse request");
            return;
        }
        if self.state.collapsed {
            return;
        }
        if self.state.dragging && source == CollapseSource::WindowLeave {
            tracing::trace!("drag in progress, suppressing leave collapse");
            return;
        }

        let sender = self.sender.clone();
        self.timers.collapse.arm(self.config.collapse_delay(), sender, |generation| {
            DockMessage::CollapseElapsed { source, generation }
        });
    }

    /// Commit a delayed collapse, re-validating every guard at fire time.
    async fn on_collapse_elapsed(&mut self, source: CollapseSource, generation: u64) {
        if !self.timers.collapse.accepts(generation) {
            return;
        }
        if self.state.pinned {
            tracing::debug!("pin engaged during collapse delay, cancelling collapse");
            return;
        }
        if self.state.collapsed {
            return;
        }
        let Some(expanded) = self.state.expanded_rect else {
            return;
        };

        // A window-leave collapse only commits when the pointer really is
        // outside; hovering back across internal element boundaries keeps
        // the window open.
        if source == CollapseSource::WindowLeave {
            match self.geometry.pointer_in_window().await {
                Ok(true) => {
                    tracing::trace!("pointer back inside window, skipping collapse");
                    return;
                }
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "pointer query failed, skipping collapse");
                    return;
                }
            }
        }

        let strip =
            geometry::collapsed_rect(self.state.edge, expanded, self.config.indicator_thickness);
        match self.geometry.move_resize_window(strip).await {
            Ok(()) => {
                self.state.collapsed = true;
                self.publish();
                tracing::debug!(?source, edge = ?self.state.edge, "window collapsed");
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to collapse window");
            }
        }
    }

    /// Flip the pin override.
    async fn on_toggle_pin(&mut self) {
        self.state.pinned = !self.state.pinned;
        self.publish();

        if self.state.pinned {
            // Pin wins over any pending or future collapse.
            self.timers.collapse.cancel();
            self.timers.pin_release.cancel();
            tracing::debug!("window pinned");
            if self.state.collapsed {
                self.on_request_expand(ExpandSource::Pin).await;
            }
        } else {
            tracing::debug!("window unpinned");
            let sender = self.sender.clone();
            self.timers.pin_release.arm(
                self.config.pin_release_recheck(),
                sender,
                |generation| DockMessage::PinReleaseElapsed { generation },
            );
        }
    }

    /// Re-check pointer containment shortly after a pin release.
    async fn on_pin_release_elapsed(&mut self, generation: u64) {
        if !self.timers.pin_release.accepts(generation) {
            return;
        }
        if self.state.pinned || self.state.collapsed {
            return;
        }

        match self.geometry.pointer_in_window().await {
            Ok(true) => {}
            Ok(false) => self.on_request_collapse(CollapseSource::WindowLeave),
            Err(err) => {
                tracing::warn!(error = %err, "pointer query failed after pin release");
            }
        }
    }

    /// Switch between the two supported docked edges.
    ///
    /// When pinned only the edge label changes. When collapsed, the window
    /// first expands in place, then re-collapses to the new edge at a
    /// monitor-centered position once the switch delay elapses.
    async fn on_toggle_dock_edge(&mut self) {
        let new_edge = self.state.edge.toggled();
        self.state.edge = new_edge;
        self.publish();
        tracing::debug!(edge = ?new_edge, "docked edge switched");

        if self.state.pinned {
            tracing::debug!("window pinned, edge label changed without relocation");
            return;
        }
        if !self.state.collapsed {
            return;
        }
        let Some(expanded) = self.state.expanded_rect else {
            return;
        };

        match self.geometry.move_resize_window(expanded).await {
            Ok(()) => {
                self.state.collapsed = false;
                self.publish();
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to expand for dock switch");
                return;
            }
        }

        let sender = self.sender.clone();
        self.timers.dock_switch.arm(self.config.dock_switch_delay(), sender, |generation| {
            DockMessage::DockSwitchElapsed { generation }
        });
    }

    /// Commit the re-collapse half of a dock-edge switch.
    async fn on_dock_switch_elapsed(&mut self, generation: u64) {
        if !self.timers.dock_switch.accepts(generation) {
            return;
        }
        // Pin may have been engaged during the delay; the window then stays
        // expanded and un-relocated.
        if self.state.pinned {
            tracing::debug!("pin engaged during dock switch, staying expanded");
            return;
        }
        if self.state.collapsed {
            return;
        }
        let Some(expanded) = self.state.expanded_rect else {
            return;
        };

        let monitor = match self.geometry.monitor_bounds().await {
            Ok(monitor) => monitor,
            Err(err) => {
                tracing::warn!(error = %err, "monitor query failed during dock switch");
                return;
            }
        };

        let centered = geometry::centered_rect(monitor, expanded.width, expanded.height);
        let strip =
            geometry::collapsed_rect(self.state.edge, centered, self.config.indicator_thickness);
        match self.geometry.move_resize_window(strip).await {
            Ok(()) => {
                self.state.collapsed = true;
                self.publish();
                tracing::debug!(edge = ?self.state.edge, "re-collapsed to new edge");
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to re-collapse to new edge");
            }
        }
    }

    /// Track a user resize; the new geometry is only accepted on settle.
    fn on_live_resize(&mut self, rect: Rect) {
        if self.state.collapsed || self.state.pinned || self.state.adjusting {
            return;
        }

        self.state.pending_resize = Some(rect);
        let sender = self.sender.clone();
        self.timers.resize_settle.arm(self.config.resize_settle(), sender, |generation| {
            DockMessage::ResizeSettled { generation }
        });
    }

    /// Accept a settled resize, correcting top-docked horizontal drift.
    async fn on_resize_settled(&mut self, generation: u64) {
        if !self.timers.resize_settle.accepts(generation) {
            return;
        }
        if self.state.collapsed || self.state.pinned || self.state.adjusting {
            return;
        }
        let Some(pending) = self.state.pending_resize.take() else {
            return;
        };
        let mut rect = pending.floored();

        if self.state.edge == DockedEdge::Top {
            if let Some(anchor) = self.state.right_edge_anchor {
                if geometry::anchor_drift_exceeded(anchor, rect) {
                    // The window system resizes top-docked windows from the
                    // left; restore the recorded right edge with a single
                    // corrective move.
                    let corrected = Rect::new(anchor - rect.width, rect.y, rect.width, rect.height);
                    self.state.adjusting = true;
                    match self.geometry.move_resize_window(corrected).await {
                        Ok(()) => {
                            rect = corrected;
                            let sender = self.sender.clone();
                            self.timers.adjust_settle.arm(
                                self.config.adjust_settle(),
                                sender,
                                |generation| DockMessage::AdjustSettled { generation },
                            );
                            tracing::debug!(anchor, x = corrected.x, "restored right edge");
                        }
                        Err(err) => {
                            self.state.adjusting = false;
                            tracing::warn!(error = %err, "corrective move failed");
                            return;
                        }
                    }
                } else {
                    self.state.right_edge_anchor = Some(rect.right());
                }
            }
        }

        self.state.expanded_rect = Some(rect);
        self.persist_geometry(rect).await;
    }

    /// Write the settled geometry through the settings store when the user
    /// opted into remembering the window size.
    async fn persist_geometry(&self, rect: Rect) {
        let mut preference = match self.settings.load_preference().await {
            Ok(preference) => preference,
            Err(err) => {
                tracing::warn!(error = %err, "preference load failed, geometry not persisted");
                return;
            }
        };

        if !preference.remember_size {
            tracing::trace!("remember_size disabled, geometry updated for this session only");
            return;
        }

        preference.saved_rect = rect;
        match self.settings.store_preference(preference).await {
            Ok(()) => tracing::debug!(?rect, "window geometry persisted"),
            Err(err) => tracing::warn!(error = %err, "failed to persist window geometry"),
        }
    }

    /// End a drag, applying the pointer-outside grace period.
    async fn on_drag_ended(&mut self) {
        if self.state.pinned {
            self.state.dragging = false;
            return;
        }

        match self.geometry.pointer_in_window().await {
            Ok(true) => self.state.dragging = false,
            Ok(false) => {
                // Give the pointer a moment to come back before leave
                // handling resumes.
                let sender = self.sender.clone();
                self.timers.drag_grace.arm(self.config.drag_end_grace(), sender, |generation| {
                    DockMessage::DragGraceElapsed { generation }
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "pointer query failed after drag end");
                self.state.dragging = false;
            }
        }
    }

    // ========================================================================
    // Projection
    // ========================================================================

    /// Publish the read-only projection when it changed.
    fn publish(&self) {
        let _previous = self.snapshot.set_if_not_eq(self.state.snapshot());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sim::{MemorySettingsStore, SimGeometryService};
    use crate::services::WindowPreference;

    const MONITOR: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    const WINDOW: Rect = Rect::new(1400.0, 100.0, 384.0, 720.0);

    fn spawn_controller() -> (DockHandle, Arc<SimGeometryService>, Arc<MemorySettingsStore>) {
        let geometry = Arc::new(SimGeometryService::new(MONITOR, WINDOW));
        let settings = Arc::new(MemorySettingsStore::new(WindowPreference::default()));
        let handle =
            DockController::spawn(geometry.clone(), settings.clone(), DockConfig::default());
        (handle, geometry, settings)
    }

    async fn barrier(handle: &DockHandle) -> crate::dock::state::DockSnapshot {
        handle
            .query(DockQuery::Snapshot)
            .await
            .unwrap()
            .into_snapshot()
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_starts_collapsed() {
        let (handle, _geometry, _settings) = spawn_controller();
        assert!(handle.is_alive());

        let snapshot = barrier(&handle).await;
        assert!(snapshot.collapsed);
        assert!(!snapshot.pinned);
        assert_eq!(snapshot.edge, DockedEdge::Right);

        handle.shutdown().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_computes_default_geometry() {
        let (handle, geometry, _settings) = spawn_controller();

        handle.initialize().unwrap();
        let expanded = handle.expanded_rect().await.unwrap().unwrap();
        assert_eq!(expanded, Rect::new(1512.0, 24.0, 384.0, 720.0));

        // The window itself was moved to the collapsed strip
        let strip = geometry.window();
        assert_eq!(strip, Rect::new(1894.0, 24.0, 2.0, 720.0));

        handle.shutdown().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_expand_before_initialize_is_a_noop() {
        let (handle, geometry, _settings) = spawn_controller();

        handle.request_expand(ExpandSource::Hover).unwrap();
        let snapshot = barrier(&handle).await;
        assert!(snapshot.collapsed);
        assert!(geometry.move_history().is_empty());

        handle.shutdown().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_expand_and_pin_guard() {
        let (handle, _geometry, _settings) = spawn_controller();
        handle.initialize().unwrap();

        handle.indicator_entered().unwrap();
        let snapshot = barrier(&handle).await;
        assert!(!snapshot.collapsed);

        // Pinned windows ignore leave events entirely
        handle.toggle_pin().unwrap();
        handle.window_left().unwrap();
        let snapshot = barrier(&handle).await;
        assert!(snapshot.pinned);

        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        let snapshot = barrier(&handle).await;
        assert!(!snapshot.collapsed, "pinned window must never collapse");

        handle.shutdown().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_geometry_failure_rolls_back_nothing() {
        let (handle, geometry, _settings) = spawn_controller();
        handle.initialize().unwrap();

        geometry.set_fail_moves(true);
        handle.indicator_entered().unwrap();
        let snapshot = barrier(&handle).await;
        assert!(snapshot.collapsed, "failed expand leaves the state collapsed");

        // Recovery: the next gesture works again
        geometry.set_fail_moves(false);
        handle.indicator_entered().unwrap();
        let snapshot = barrier(&handle).await;
        assert!(!snapshot.collapsed);

        handle.shutdown().unwrap();
    }
}
