//! Message types for the dock actor.
//!
//! All communication with the actor happens through messages:
//! - [`DockMessage`] - intents, surface events, and timer completions
//! - [`DockQuery`] - requests for state data (with response channel)
//! - [`DockQueryResult`] - responses from queries

use tokio::sync::oneshot;

use crate::dock::state::{DockSnapshot, Rect};

// ============================================================================
// Intent Sources
// ============================================================================

/// The trigger source of an expand request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpandSource {
    /// Pointer entered the collapsed indicator strip.
    Hover,
    /// Pin was turned on while collapsed.
    Pin,
    /// A dock-edge switch needs the window expanded first.
    DockToggle,
}

/// The trigger source of a collapse request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollapseSource {
    /// Pointer left the indicator strip.
    HoverLeave,
    /// Pointer left the expanded window.
    WindowLeave,
}

// ============================================================================
// Dock Messages
// ============================================================================

/// Messages sent to the dock actor.
#[derive(Debug)]
pub enum DockMessage {
    // ════════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ════════════════════════════════════════════════════════════════════════
    /// Query monitor/window/preference state and dock to the default edge.
    Initialize,

    // ════════════════════════════════════════════════════════════════════════
    // Imperative Intents (from the UI layer)
    // ════════════════════════════════════════════════════════════════════════
    /// Expand the window to the last known expanded geometry.
    RequestExpand { source: ExpandSource },

    /// Schedule a delayed collapse to the docked edge.
    RequestCollapse { source: CollapseSource },

    /// Flip the pin override.
    TogglePin,

    /// Switch between the two supported docked edges.
    ToggleDockEdge,

    // ════════════════════════════════════════════════════════════════════════
    // Trigger Surface Events
    // ════════════════════════════════════════════════════════════════════════
    /// Pointer entered the indicator strip.
    IndicatorEntered,

    /// Pointer left the indicator strip.
    IndicatorLeft,

    /// Pointer entered the expanded window.
    WindowEntered,

    /// Pointer left the expanded window.
    WindowLeft,

    /// A list-reorder drag started inside the window.
    DragStarted,

    /// The list-reorder drag ended.
    DragEnded,

    /// The window is being resized by the user.
    LiveResize { rect: Rect },

    // ════════════════════════════════════════════════════════════════════════
    // Timer Completions (scheduled by the actor itself)
    // ════════════════════════════════════════════════════════════════════════
    /// The delayed collapse window elapsed.
    CollapseElapsed { source: CollapseSource, generation: u64 },

    /// No resize event arrived for the settle window.
    ResizeSettled { generation: u64 },

    /// The dock-switch delay elapsed; commit the re-collapse.
    DockSwitchElapsed { generation: u64 },

    /// The post-pin-release delay elapsed; re-check the pointer.
    PinReleaseElapsed { generation: u64 },

    /// The post-drag grace period elapsed.
    DragGraceElapsed { generation: u64 },

    /// The corrective-move echo window elapsed.
    AdjustSettled { generation: u64 },

    // ════════════════════════════════════════════════════════════════════════
    // Queries
    // ════════════════════════════════════════════════════════════════════════
    /// Request state data.
    Query {
        query: DockQuery,
        respond_to: oneshot::Sender<DockQueryResult>,
    },

    /// Stop the actor.
    Shutdown,
}

impl DockMessage {
    /// A short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Initialize => "Initialize",
            Self::RequestExpand { .. } => "RequestExpand",
            Self::RequestCollapse { .. } => "RequestCollapse",
            Self::TogglePin => "TogglePin",
            Self::ToggleDockEdge => "ToggleDockEdge",
            Self::IndicatorEntered => "IndicatorEntered",
            Self::IndicatorLeft => "IndicatorLeft",
            Self::WindowEntered => "WindowEntered",
            Self::WindowLeft => "WindowLeft",
            Self::DragStarted => "DragStarted",
            Self::DragEnded => "DragEnded",
            Self::LiveResize { .. } => "LiveResize",
            Self::CollapseElapsed { .. } => "CollapseElapsed",
            Self::ResizeSettled { .. } => "ResizeSettled",
            Self::DockSwitchElapsed { .. } => "DockSwitchElapsed",
            Self::PinReleaseElapsed { .. } => "PinReleaseElapsed",
            Self::DragGraceElapsed { .. } => "DragGraceElapsed",
            Self::AdjustSettled { .. } => "AdjustSettled",
            Self::Query { .. } => "Query",
            Self::Shutdown => "Shutdown",
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Requests for dock state data.
#[derive(Clone, Copy, Debug)]
pub enum DockQuery {
    /// The read-only projection.
    Snapshot,
    /// The last known expanded geometry.
    ExpandedRect,
}

/// Responses from queries.
#[derive(Clone, Copy, Debug)]
pub enum DockQueryResult {
    Snapshot(DockSnapshot),
    ExpandedRect(Option<Rect>),
}

impl DockQueryResult {
    /// Extract a snapshot result.
    #[must_use]
    pub fn into_snapshot(self) -> Option<DockSnapshot> {
        match self {
            Self::Snapshot(snapshot) => Some(snapshot),
            Self::ExpandedRect(_) => None,
        }
    }

    /// Extract an expanded-rect result.
    #[must_use]
    pub fn into_expanded_rect(self) -> Option<Option<Rect>> {
        match self {
            Self::ExpandedRect(rect) => Some(rect),
            Self::Snapshot(_) => None,
        }
    }
}
