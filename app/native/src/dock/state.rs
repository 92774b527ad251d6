//! Core state types for the docking controller.
//!
//! The [`DockState`] is owned exclusively by the dock actor and mutated only
//! by its transition handlers; the rest of the application sees the read-only
//! [`DockSnapshot`] projection published through an observable.

use serde::{Deserialize, Serialize};

// ============================================================================
// Geometry Types
// ============================================================================

/// A rectangle with position and size in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create a zero-sized rectangle at origin.
    #[must_use]
    pub const fn zero() -> Self { Self::new(0.0, 0.0, 0.0, 0.0) }

    /// Check if this rectangle has valid dimensions.
    #[must_use]
    pub fn is_valid(&self) -> bool { self.width > 0.0 && self.height > 0.0 }

    /// Check whether every field is non-zero.
    ///
    /// A persisted rectangle is only restored when it is fully specified;
    /// anything with a zeroed field is treated as absent.
    #[must_use]
    pub fn is_fully_specified(&self) -> bool {
        self.x != 0.0 && self.y != 0.0 && self.width > 0.0 && self.height > 0.0
    }

    /// The horizontal coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f64 { self.x + self.width }

    /// The vertical coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 { self.y + self.height }

    /// Check if this rectangle contains a point.
    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Floor every field to a whole pixel.
    ///
    /// Fractional positions are ambiguous at the windowing-system boundary,
    /// so every rectangle is floored before it is handed to the geometry
    /// service.
    #[must_use]
    pub fn floored(&self) -> Self {
        Self::new(self.x.floor(), self.y.floor(), self.width.floor(), self.height.floor())
    }

    /// Check if two rectangles are approximately equal (within epsilon).
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.width - other.width).abs() < epsilon
            && (self.height - other.height).abs() < epsilon
    }
}

// ============================================================================
// Docked Edge
// ============================================================================

/// The screen edge the collapsed indicator strip is attached to.
///
/// Exactly one edge is active at any time. Only `Right` and `Top` are
/// reachable through [`DockedEdge::toggled`]; the other two variants exist
/// for forward compatibility and are handled by the geometry calculators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DockedEdge {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

impl DockedEdge {
    /// The edge the UI toggle switches to from this one.
    ///
    /// Alternates between the two supported edges; the unreachable variants
    /// funnel into `Right`.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Right => Self::Top,
            Self::Top | Self::Left | Self::Bottom => Self::Right,
        }
    }
}

// ============================================================================
// Dock State
// ============================================================================

/// Mutable state owned by the dock actor.
///
/// All fields that the original design kept as ad-hoc refs (collapse timer
/// handle, right-edge anchor, adjusting flag) live here as explicit fields
/// of the single state-machine owner.
#[derive(Debug)]
pub struct DockState {
    /// Whether the window is currently collapsed to the indicator strip.
    pub collapsed: bool,

    /// User-controlled override that keeps the window expanded.
    pub pinned: bool,

    /// The currently active docked edge.
    pub edge: DockedEdge,

    /// The last known expanded geometry. `None` only before initialization.
    pub expanded_rect: Option<Rect>,

    /// Right-edge screen coordinate preserved across top-docked resizes.
    pub right_edge_anchor: Option<f64>,

    /// Guard against processing resize echoes of our own geometry writes.
    pub adjusting: bool,

    /// Whether a list-reorder drag is in progress (suppresses leave-collapse).
    pub dragging: bool,

    /// Rect of the most recent live-resize event, consumed on settle.
    pub pending_resize: Option<Rect>,
}

impl DockState {
    /// Create the initial state: collapsed on the given edge, pin off.
    #[must_use]
    pub const fn new(edge: DockedEdge) -> Self {
        Self {
            collapsed: true,
            pinned: false,
            edge,
            expanded_rect: None,
            right_edge_anchor: None,
            adjusting: false,
            dragging: false,
            pending_resize: None,
        }
    }

    /// The read-only projection of this state.
    #[must_use]
    pub const fn snapshot(&self) -> DockSnapshot {
        DockSnapshot {
            collapsed: self.collapsed,
            pinned: self.pinned,
            edge: self.edge,
        }
    }
}

// ============================================================================
// Snapshot Projection
// ============================================================================

/// Read-only projection of the dock state.
///
/// The UI uses this to decide whether to render the indicator strip or the
/// full panel; it carries no geometry and cannot be used to mutate the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DockSnapshot {
    pub collapsed: bool,
    pub pinned: bool,
    pub edge: DockedEdge,
}

// ============================================================================
// Tests
// ============================================================================
