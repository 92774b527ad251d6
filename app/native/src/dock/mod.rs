//! Window docking and auto-collapse.
//!
//! The window collapses to a thin indicator strip on a screen edge and
//! expands to the full panel on hover, drag, or pin. This module owns the
//! whole behavior:
//!
//! - [`state`] - core state types and the read-only snapshot projection
//! - [`geometry`] - pure edge-docking rectangle calculators
//! - [`timer`] - cancellable one-shot timer slots for delayed transitions
//! - [`actor`] - the state machine actor and its handle

pub mod actor;
pub mod geometry;
pub mod state;
pub mod timer;
