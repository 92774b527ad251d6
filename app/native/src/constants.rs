//! Internal constants for docking behavior tuning.
//!
//! This module centralizes the magic numbers used by the docking controller.
//! Most of them are also exposed through [`crate::config::DockConfig`] so a
//! deployment can override them; the values here are the calibrated defaults.
//!
//! # Organization
//!
//! - `timing` - debouncing, grace periods, and settle delays
//! - `geometry` - strip thickness, margins, and snap thresholds

/// Timing constants for delayed transitions and debouncing.
pub mod timing {
    /// Delay before a hover-leave or window-leave collapses the window (ms).
    ///
    /// Absorbs transient pointer flicker across internal element boundaries;
    /// re-entering the window within this delay cancels the collapse.
    pub const COLLAPSE_DELAY_MS: u64 = 500;

    /// Settle window for live-resize events (ms).
    ///
    /// The expanded geometry is only accepted (and optionally persisted)
    /// once no resize event has arrived for this long.
    pub const RESIZE_SETTLE_MS: u64 = 500;

    /// Delay between the expand and the re-collapse of a dock-edge switch (ms).
    ///
    /// Gives the window system time to finish the expand before the window
    /// is re-docked to the other edge. Pin state is re-checked when it fires.
    pub const DOCK_SWITCH_DELAY_MS: u64 = 100;

    /// Delay before re-checking pointer containment after a pin release (ms).
    pub const PIN_RELEASE_RECHECK_MS: u64 = 100;

    /// Grace period after a drag ends with the pointer outside the window (ms).
    ///
    /// Allows the pointer to re-enter before leave-collapse resumes.
    pub const DRAG_END_GRACE_MS: u64 = 300;

    /// Duration the adjusting guard stays up after a corrective move (ms).
    ///
    /// Resize events arriving within this window are echoes of the
    /// controller's own geometry write, not user input.
    pub const ADJUST_SETTLE_MS: u64 = 100;
}

/// Geometry constants for strip and default-rect calculation.
pub mod geometry {
    /// Thickness of the collapsed indicator strip (px).
    pub const INDICATOR_THICKNESS: f64 = 2.0;

    /// Divisor applied to the monitor width for the right-hand margin.
    pub const RIGHT_MARGIN_DIVISOR: f64 = 80.0;

    /// Divisor applied to the monitor height for the top margin.
    ///
    /// The smaller of the two margins wins so the default position works on
    /// both wide and tall monitors.
    pub const TOP_MARGIN_DIVISOR: f64 = 45.0;

    /// Fraction of the monitor height used for the default expanded height.
    pub const EXPANDED_HEIGHT_RATIO: f64 = 2.0 / 3.0;

    /// Tolerated right-edge drift before a corrective move is issued (px).
    pub const ANCHOR_DRIFT_TOLERANCE: f64 = 1.0;

    /// Distance from a monitor edge at which a window counts as docked (px).
    pub const SNAP_THRESHOLD: f64 = 15.0;
}
