//! Edgenote headless demo.
//!
//! Drives the docking controller against the in-memory geometry service
//! through a short scripted session: initialize, hover-expand, leave,
//! pin, dock-edge switch. Useful as a smoke harness and as a reference for
//! wiring the controller into a real windowing shell.
//!
//! Set `RUST_LOG=edgenote_lib=trace` to watch every transition.

use std::sync::Arc;
use std::time::Duration;

use edgenote_lib::services::sim::{MemorySettingsStore, SimGeometryService};
use edgenote_lib::{DockController, Rect};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let monitor = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    let window = Rect::new(1400.0, 100.0, 384.0, 720.0);
    let geometry = SimGeometryService::shared(monitor, window);
    let settings = Arc::new(MemorySettingsStore::default());

    let config = edgenote_lib::config::load_or_default();
    let handle = DockController::spawn(geometry.clone(), settings, config);

    handle.initialize().expect("dock actor not running");
    settle(&handle).await;
    tracing::info!(snapshot = ?handle.snapshot(), window = ?geometry.window(), "initialized");

    // Hover over the indicator strip: the panel expands.
    handle.indicator_entered().expect("dock actor not running");
    settle(&handle).await;
    tracing::info!(snapshot = ?handle.snapshot(), window = ?geometry.window(), "after hover");

    // Leave the window: it collapses once the flicker window passes.
    handle.window_left().expect("dock actor not running");
    tokio::time::sleep(config.collapse_delay() + Duration::from_millis(50)).await;
    tracing::info!(snapshot = ?handle.snapshot(), window = ?geometry.window(), "after leave");

    // Pin: expands and stays expanded regardless of pointer position.
    handle.toggle_pin().expect("dock actor not running");
    settle(&handle).await;
    handle.window_left().expect("dock actor not running");
    tokio::time::sleep(config.collapse_delay() + Duration::from_millis(50)).await;
    tracing::info!(snapshot = ?handle.snapshot(), "pinned through a leave event");

    // Release the pin; the pointer is outside, so the window collapses.
    handle.toggle_pin().expect("dock actor not running");
    tokio::time::sleep(
        config.pin_release_recheck() + config.collapse_delay() + Duration::from_millis(50),
    )
    .await;
    tracing::info!(snapshot = ?handle.snapshot(), "after unpin");

    // Switch the docked edge: expand, settle, re-collapse centered.
    handle.toggle_dock_edge().expect("dock actor not running");
    tokio::time::sleep(config.dock_switch_delay() + Duration::from_millis(100)).await;
    tracing::info!(snapshot = ?handle.snapshot(), window = ?geometry.window(), "after edge switch");

    handle.shutdown().expect("dock actor not running");
    tracing::info!(moves = geometry.move_history().len(), "session complete");
}

/// Let the actor drain its queue before reading the projection.
async fn settle(handle: &edgenote_lib::DockHandle) {
    let _ = handle
        .query_timeout(edgenote_lib::DockQuery::Snapshot, Duration::from_secs(1))
        .await;
}
