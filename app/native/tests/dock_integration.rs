//! End-to-end tests for the docking controller.
//!
//! These drive the real actor with the in-memory collaborators under a
//! paused tokio clock, so every delayed transition is exercised with exact
//! timing and zero wall-clock cost.
//!
//! Pattern: after every fire-and-forget intent, `snap` round-trips a query
//! through the actor's channel. The channel is FIFO, so the query doubles as
//! a barrier guaranteeing the intent was processed (and its timer armed)
//! before the test advances the clock.

use std::sync::Arc;
use std::time::Duration;

use edgenote_lib::services::sim::{MemorySettingsStore, SimGeometryService};
use edgenote_lib::{
    CollapseSource, DockConfig, DockController, DockHandle, DockQuery, DockSnapshot, DockedEdge,
    Rect, WindowPreference,
};

const MONITOR: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);
const WINDOW: Rect = Rect::new(1400.0, 100.0, 384.0, 720.0);

/// The default expanded geometry on [`MONITOR`]: margin 24, two thirds high.
const DEFAULT_EXPANDED: Rect = Rect::new(1512.0, 24.0, 384.0, 720.0);

fn controller_with(
    preference: WindowPreference,
    config: DockConfig,
) -> (DockHandle, Arc<SimGeometryService>, Arc<MemorySettingsStore>) {
    let geometry = SimGeometryService::shared(MONITOR, WINDOW);
    let settings = Arc::new(MemorySettingsStore::new(preference));
    let handle = DockController::spawn(geometry.clone(), settings.clone(), config);
    (handle, geometry, settings)
}

fn controller() -> (DockHandle, Arc<SimGeometryService>, Arc<MemorySettingsStore>) {
    controller_with(WindowPreference::default(), DockConfig::default())
}

/// Barrier: wait until the actor has drained everything sent so far, then
/// return the current projection.
async fn snap(handle: &DockHandle) -> DockSnapshot {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    handle
        .query(DockQuery::Snapshot)
        .await
        .expect("actor alive")
        .into_snapshot()
        .expect("snapshot result")
}

async fn advance(duration: Duration) { tokio::time::advance(duration).await; }

// ============================================================================
// Initialization
// ============================================================================

#[tokio::test(start_paused = true)]
async fn initialization_docks_to_the_default_edge() {
    let (handle, geometry, _settings) = controller();

    handle.initialize().unwrap();
    let snapshot = snap(&handle).await;
    assert!(snapshot.collapsed);
    assert_eq!(snapshot.edge, DockedEdge::Right);

    // Expanded geometry derives from monitor bounds and the current width
    let expanded = handle.expanded_rect().await.unwrap().unwrap();
    assert_eq!(expanded, DEFAULT_EXPANDED);

    // The window itself was collapsed to the 2px strip on the right edge
    assert_eq!(geometry.window(), Rect::new(1894.0, 24.0, 2.0, 720.0));
    assert_eq!(geometry.move_history().len(), 1);

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn initialization_restores_remembered_geometry_verbatim() {
    let saved = Rect::new(100.0, 100.0, 400.0, 600.0);
    let (handle, _geometry, _settings) = controller_with(
        WindowPreference {
            remember_size: true,
            saved_rect: saved,
            ..WindowPreference::default()
        },
        DockConfig::default(),
    );

    handle.initialize().unwrap();
    snap(&handle).await;

    let expanded = handle.expanded_rect().await.unwrap().unwrap();
    assert_eq!(expanded, saved);

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn initialization_rejects_partial_saved_geometry() {
    // A zeroed field makes the saved rect structurally invalid
    let (handle, _geometry, _settings) = controller_with(
        WindowPreference {
            remember_size: true,
            saved_rect: Rect::new(0.0, 100.0, 400.0, 600.0),
            ..WindowPreference::default()
        },
        DockConfig::default(),
    );

    handle.initialize().unwrap();
    snap(&handle).await;

    let expanded = handle.expanded_rect().await.unwrap().unwrap();
    assert_eq!(expanded, DEFAULT_EXPANDED);

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn initialization_survives_query_failures() {
    let (handle, geometry, _settings) = controller();

    geometry.set_fail_queries(true);
    handle.initialize().unwrap();
    let snapshot = snap(&handle).await;
    assert!(snapshot.collapsed);
    assert_eq!(handle.expanded_rect().await.unwrap(), None);
    assert!(geometry.move_history().is_empty());

    // Retrying once the window system recovers works
    geometry.set_fail_queries(false);
    handle.initialize().unwrap();
    snap(&handle).await;
    assert_eq!(handle.expanded_rect().await.unwrap(), Some(DEFAULT_EXPANDED));

    handle.shutdown().unwrap();
}

// ============================================================================
// Hover expand / delayed collapse
// ============================================================================

#[tokio::test(start_paused = true)]
async fn hover_expands_and_rehover_cancels_the_collapse() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;

    handle.indicator_entered().unwrap();
    let snapshot = snap(&handle).await;
    assert!(!snapshot.collapsed);
    assert_eq!(geometry.window(), DEFAULT_EXPANDED);

    // Leave, then hover again before the collapse delay elapses
    handle.indicator_left().unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(300)).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;

    // Long after the original deadline the window is still expanded and no
    // further geometry mutation happened: init strip + expand only.
    advance(Duration::from_secs(2)).await;
    let snapshot = snap(&handle).await;
    assert!(!snapshot.collapsed);
    assert_eq!(geometry.move_history().len(), 2);

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn window_leave_collapses_after_the_delay() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;

    handle.indicator_entered().unwrap();
    snap(&handle).await;

    geometry.set_pointer_inside(false);
    handle.window_left().unwrap();
    snap(&handle).await;

    // Not yet: the flicker window is still open
    advance(Duration::from_millis(499)).await;
    assert!(!snap(&handle).await.collapsed);

    advance(Duration::from_millis(2)).await;
    let snapshot = snap(&handle).await;
    assert!(snapshot.collapsed);
    assert_eq!(geometry.window(), Rect::new(1894.0, 24.0, 2.0, 720.0));

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn window_leave_aborts_when_the_pointer_is_back_inside() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;

    // The pointer slipped out and back in without a window-enter event
    geometry.set_pointer_inside(true);
    handle.window_left().unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(600)).await;

    assert!(!snap(&handle).await.collapsed);

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn collapse_requests_coalesce_into_one_action() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;
    geometry.set_pointer_inside(false);

    // Three leave events within the debounce window
    handle.window_left().unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(300)).await;
    handle.window_left().unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(300)).await;
    handle.window_left().unwrap();
    snap(&handle).await;

    // 500ms after the FIRST request: nothing, the slot was re-armed
    advance(Duration::from_millis(400)).await;
    assert!(!snap(&handle).await.collapsed);

    // 500ms after the LAST request: exactly one collapse
    advance(Duration::from_millis(101)).await;
    assert!(snap(&handle).await.collapsed);
    // init strip + expand + one collapse
    assert_eq!(geometry.move_history().len(), 3);

    handle.shutdown().unwrap();
}

// ============================================================================
// Pin precedence
// ============================================================================

#[tokio::test(start_paused = true)]
async fn pin_blocks_every_collapse_until_released() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;
    geometry.set_pointer_inside(false);

    // Pin while collapsed forces an expand
    handle.toggle_pin().unwrap();
    let snapshot = snap(&handle).await;
    assert!(snapshot.pinned);
    assert!(!snapshot.collapsed);

    // No sequence of leave events collapses a pinned window
    for _ in 0..3 {
        handle.indicator_left().unwrap();
        handle.window_left().unwrap();
        snap(&handle).await;
        advance(Duration::from_secs(1)).await;
        assert!(!snap(&handle).await.collapsed);
    }

    // Releasing the pin with the pointer outside re-checks and collapses
    handle.toggle_pin().unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(100)).await;
    snap(&handle).await;
    advance(Duration::from_millis(501)).await;
    let snapshot = snap(&handle).await;
    assert!(!snapshot.pinned);
    assert!(snapshot.collapsed);

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn pin_during_the_collapse_delay_wins() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;
    geometry.set_pointer_inside(false);

    handle.window_left().unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(400)).await;

    // Pin lands while the collapse timer is pending
    handle.toggle_pin().unwrap();
    snap(&handle).await;
    advance(Duration::from_secs(2)).await;

    let snapshot = snap(&handle).await;
    assert!(snapshot.pinned);
    assert!(!snapshot.collapsed, "pin must cancel the pending collapse");

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn pin_release_with_pointer_inside_stays_expanded() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;

    handle.toggle_pin().unwrap();
    snap(&handle).await;

    geometry.set_pointer_inside(true);
    handle.toggle_pin().unwrap();
    snap(&handle).await;
    advance(Duration::from_secs(2)).await;

    assert!(!snap(&handle).await.collapsed);

    handle.shutdown().unwrap();
}

// ============================================================================
// Dock edge switching
// ============================================================================

#[tokio::test(start_paused = true)]
async fn dock_switch_expands_then_recollapses_centered() {
    let (handle, geometry, _settings) =
        controller_with(WindowPreference::default(), DockConfig {
            default_edge: DockedEdge::Top,
            ..DockConfig::default()
        });
    handle.initialize().unwrap();
    snap(&handle).await;
    assert_eq!(snap(&handle).await.edge, DockedEdge::Top);

    handle.toggle_dock_edge().unwrap();
    let snapshot = snap(&handle).await;
    // First half: the window expanded in place on the new edge label
    assert_eq!(snapshot.edge, DockedEdge::Right);
    assert!(!snapshot.collapsed);
    assert_eq!(geometry.window(), DEFAULT_EXPANDED);

    // Second half after the settle delay: centered strip on the new edge
    advance(Duration::from_millis(101)).await;
    let snapshot = snap(&handle).await;
    assert!(snapshot.collapsed);
    let centered = Rect::new(768.0, 180.0, 384.0, 720.0);
    assert_eq!(
        geometry.window(),
        Rect::new(centered.right() - 2.0, centered.y, 2.0, centered.height)
    );

    // The expanded geometry itself is untouched by the switch
    assert_eq!(handle.expanded_rect().await.unwrap(), Some(DEFAULT_EXPANDED));

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn dock_switch_recollapse_is_skipped_when_pin_lands_mid_delay() {
    let (handle, geometry, _settings) =
        controller_with(WindowPreference::default(), DockConfig {
            default_edge: DockedEdge::Top,
            ..DockConfig::default()
        });
    handle.initialize().unwrap();
    snap(&handle).await;

    handle.toggle_dock_edge().unwrap();
    snap(&handle).await;
    let moves_after_expand = geometry.move_history().len();

    // Pin arrives inside the 100ms switch delay
    handle.toggle_pin().unwrap();
    snap(&handle).await;
    advance(Duration::from_secs(1)).await;

    let snapshot = snap(&handle).await;
    assert!(snapshot.pinned);
    assert!(!snapshot.collapsed, "re-collapse must be skipped under pin");
    assert_eq!(snapshot.edge, DockedEdge::Right);
    assert_eq!(geometry.move_history().len(), moves_after_expand);

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn dock_switch_while_pinned_changes_only_the_label() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.toggle_pin().unwrap();
    snap(&handle).await;
    let moves_before = geometry.move_history().len();

    handle.toggle_dock_edge().unwrap();
    advance(Duration::from_secs(1)).await;
    let snapshot = snap(&handle).await;

    assert_eq!(snapshot.edge, DockedEdge::Top);
    assert!(!snapshot.collapsed);
    assert_eq!(geometry.move_history().len(), moves_before);

    handle.shutdown().unwrap();
}

// ============================================================================
// Live resize and the top-dock anchor
// ============================================================================

#[tokio::test(start_paused = true)]
async fn resize_settle_updates_the_expanded_geometry() {
    let (handle, _geometry, settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;

    let resized = Rect::new(1512.0, 24.0, 384.0, 800.0);
    handle.live_resize(resized).unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(501)).await;
    snap(&handle).await;

    assert_eq!(handle.expanded_rect().await.unwrap(), Some(resized));
    // remember_size is off: nothing was persisted
    assert_eq!(settings.store_count(), 0);

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn resize_settle_persists_when_remembering() {
    let (handle, _geometry, settings) = controller_with(
        WindowPreference {
            remember_size: true,
            saved_rect: Rect::new(100.0, 100.0, 400.0, 600.0),
            ..WindowPreference::default()
        },
        DockConfig::default(),
    );
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;

    let resized = Rect::new(100.0, 100.0, 500.0, 650.0);
    handle.live_resize(resized).unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(501)).await;
    snap(&handle).await;

    assert_eq!(settings.store_count(), 1);
    assert_eq!(settings.current().saved_rect, resized);

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn top_dock_small_drift_updates_the_anchor_without_a_move() {
    let (handle, geometry, _settings) =
        controller_with(WindowPreference::default(), DockConfig {
            default_edge: DockedEdge::Top,
            ..DockConfig::default()
        });
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;
    let moves_before = geometry.move_history().len();

    // Width changes but the right edge stays put (anchor = 1896)
    let resized = Rect::new(1412.0, 24.0, 484.0, 720.0);
    handle.live_resize(resized).unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(501)).await;
    snap(&handle).await;

    assert_eq!(geometry.move_history().len(), moves_before);
    assert_eq!(handle.expanded_rect().await.unwrap(), Some(resized));

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn top_dock_large_drift_triggers_exactly_one_corrective_move() {
    let (handle, geometry, _settings) =
        controller_with(WindowPreference::default(), DockConfig {
            default_edge: DockedEdge::Top,
            ..DockConfig::default()
        });
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;
    let moves_before = geometry.move_history().len();

    // The window system resized from the left: right edge drifted to 1812
    let resized = Rect::new(1512.0, 24.0, 300.0, 720.0);
    handle.live_resize(resized).unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(501)).await;
    snap(&handle).await;

    // Exactly one corrective move restoring the right edge at 1896
    assert_eq!(geometry.move_history().len(), moves_before + 1);
    let corrected = Rect::new(1896.0 - 300.0, 24.0, 300.0, 720.0);
    assert_eq!(geometry.window(), corrected);
    assert_eq!(handle.expanded_rect().await.unwrap(), Some(corrected));

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn right_dock_resize_never_corrects() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;
    let moves_before = geometry.move_history().len();

    // Large right-edge drift, but the anchor only applies while docked Top
    let resized = Rect::new(1512.0, 24.0, 300.0, 720.0);
    handle.live_resize(resized).unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(501)).await;
    snap(&handle).await;

    assert_eq!(geometry.move_history().len(), moves_before);
    assert_eq!(handle.expanded_rect().await.unwrap(), Some(resized));

    handle.shutdown().unwrap();
}

// ============================================================================
// Drag suppression
// ============================================================================

#[tokio::test(start_paused = true)]
async fn drag_suppresses_leave_collapse_until_grace_expires() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;

    handle.notify_drag_start().unwrap();
    geometry.set_pointer_inside(false);
    handle.window_left().unwrap();
    snap(&handle).await;

    // The leave was swallowed entirely; no collapse at any point mid-drag
    advance(Duration::from_secs(2)).await;
    assert!(!snap(&handle).await.collapsed);

    // Drop outside the window: 300ms grace, then normal leave handling
    handle.notify_drag_end().unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(299)).await;
    assert!(!snap(&handle).await.collapsed);

    advance(Duration::from_millis(2)).await;
    snap(&handle).await;
    advance(Duration::from_millis(501)).await;
    assert!(snap(&handle).await.collapsed);

    handle.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn drag_end_inside_the_window_resumes_without_collapsing() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;

    handle.notify_drag_start().unwrap();
    geometry.set_pointer_inside(true);
    handle.notify_drag_end().unwrap();
    snap(&handle).await;
    advance(Duration::from_secs(2)).await;

    assert!(!snap(&handle).await.collapsed);

    // A later leave collapses normally again
    geometry.set_pointer_inside(false);
    handle.window_left().unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(501)).await;
    assert!(snap(&handle).await.collapsed);

    handle.shutdown().unwrap();
}

// ============================================================================
// Failure degradation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn refused_collapse_leaves_the_window_expanded() {
    let (handle, geometry, _settings) = controller();
    handle.initialize().unwrap();
    snap(&handle).await;
    handle.indicator_entered().unwrap();
    snap(&handle).await;

    geometry.set_pointer_inside(false);
    geometry.set_fail_moves(true);
    handle.window_left().unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(501)).await;

    // The mutation failed: no partial transition was recorded
    assert!(!snap(&handle).await.collapsed);

    // Retrying the gesture after recovery works
    geometry.set_fail_moves(false);
    handle.request_collapse(CollapseSource::WindowLeave).unwrap();
    snap(&handle).await;
    advance(Duration::from_millis(501)).await;
    assert!(snap(&handle).await.collapsed);

    handle.shutdown().unwrap();
}

// ============================================================================
// Projection
// ============================================================================

#[tokio::test(start_paused = true)]
async fn snapshot_subscription_sees_state_changes() {
    let (handle, _geometry, _settings) = controller();
    let mut subscriber = handle.subscribe();

    handle.initialize().unwrap();
    snap(&handle).await;

    handle.indicator_entered().unwrap();
    let update = subscriber.next().await.expect("observable alive");
    assert!(!update.collapsed);

    handle.toggle_pin().unwrap();
    let update = subscriber.next().await.expect("observable alive");
    assert!(update.pinned);

    handle.shutdown().unwrap();
}
