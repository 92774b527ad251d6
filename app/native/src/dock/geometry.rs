//! Pure edge-docking geometry calculators.
//!
//! Every function here is deterministic and side-effect-free so the geometry
//! can be tested independently of the actor and the windowing system. All
//! returned rectangles are floored to whole pixels; the geometry service
//! boundary rejects fractional positions.

use crate::constants::geometry::{
    ANCHOR_DRIFT_TOLERANCE, EXPANDED_HEIGHT_RATIO, RIGHT_MARGIN_DIVISOR, SNAP_THRESHOLD,
    TOP_MARGIN_DIVISOR,
};
use crate::dock::state::{DockedEdge, Rect};

/// The margin kept between the default expanded window and the monitor edges.
///
/// The right and top margins are computed from the monitor dimensions and the
/// smaller one wins, which keeps the margin sensible on both wide and tall
/// monitors.
#[must_use]
pub fn default_margin(monitor: Rect) -> f64 {
    let right_margin = monitor.width / RIGHT_MARGIN_DIVISOR;
    let top_margin = monitor.height / TOP_MARGIN_DIVISOR;
    right_margin.min(top_margin)
}

/// Compute the default expanded rectangle for a monitor.
///
/// The window keeps its current width, takes two thirds of the monitor
/// height, and sits in the monitor's top-right corner inset by
/// [`default_margin`].
#[must_use]
pub fn default_expanded_rect(monitor: Rect, current_width: f64) -> Rect {
    let margin = default_margin(monitor);
    let height = (monitor.height * EXPANDED_HEIGHT_RATIO).floor();
    let width = current_width;
    let x = monitor.x + monitor.width - width - margin;
    let y = monitor.y + margin;
    Rect::new(x, y, width, height).floored()
}

/// Compute the collapsed indicator strip for an expanded rectangle.
///
/// The strip is a thin rectangle spanning the full length of the given edge
/// of `expanded`, anchored at the same origin corner. Idempotent over the
/// expanded rectangle: the strip does not feed back into it.
#[must_use]
pub fn collapsed_rect(edge: DockedEdge, expanded: Rect, thickness: f64) -> Rect {
    let rect = match edge {
        DockedEdge::Right => {
            Rect::new(expanded.right() - thickness, expanded.y, thickness, expanded.height)
        }
        DockedEdge::Left => Rect::new(expanded.x, expanded.y, thickness, expanded.height),
        DockedEdge::Top => Rect::new(expanded.x, expanded.y, expanded.width, thickness),
        DockedEdge::Bottom => {
            Rect::new(expanded.x, expanded.bottom() - thickness, expanded.width, thickness)
        }
    };
    rect.floored()
}

/// Compute a monitor-centered rectangle with the given size.
///
/// Used when switching docked edges: the re-collapse anchors on a centered
/// rectangle with the previous expanded dimensions.
#[must_use]
pub fn centered_rect(monitor: Rect, width: f64, height: f64) -> Rect {
    let x = monitor.x + (monitor.width - width) / 2.0;
    let y = monitor.y + (monitor.height - height) / 2.0;
    Rect::new(x, y, width, height).floored()
}

/// Whether a right-edge drift is large enough to need a corrective move.
#[must_use]
pub fn anchor_drift_exceeded(anchor: f64, rect: Rect) -> bool {
    (rect.right() - anchor).abs() > ANCHOR_DRIFT_TOLERANCE
}

/// Detect whether a window sits close enough to a monitor edge to dock.
///
/// Only the right and top edges are candidates; the right edge takes
/// priority when both are within the threshold. Returns `None` when the
/// window is clear of both edges or already past them.
#[must_use]
pub fn snap_edge(window: Rect, monitor: Rect) -> Option<DockedEdge> {
    let distance_to_right = monitor.right() - window.right();
    let distance_to_top = window.y - monitor.y;

    if (0.0..SNAP_THRESHOLD).contains(&distance_to_right) {
        Some(DockedEdge::Right)
    } else if (0.0..SNAP_THRESHOLD).contains(&distance_to_top) {
        Some(DockedEdge::Top)
    } else {
        None
    }
}

/// The flush-against-edge position for a window docked to `edge`.
///
/// Side edges sit a third of the way down the monitor; top and bottom are
/// centered horizontally. The window keeps its size.
#[must_use]
pub fn docked_position(edge: DockedEdge, monitor: Rect, window: Rect) -> Rect {
    let (x, y) = match edge {
        DockedEdge::Left => (monitor.x, monitor.y + monitor.height / 3.0),
        DockedEdge::Right => {
            (monitor.right() - window.width, monitor.y + monitor.height / 3.0)
        }
        DockedEdge::Top => (monitor.x + (monitor.width - window.width) / 2.0, monitor.y),
        DockedEdge::Bottom => (
            monitor.x + (monitor.width - window.width) / 2.0,
            monitor.bottom() - window.height,
        ),
    };
    Rect::new(x, y, window.width, window.height).floored()
}

// ============================================================================
// Tests
// ============================================================================
