//! Edgenote - the native core of an edge-docked note/todo manager.
//!
//! The window collapses to a thin animated indicator strip on a screen edge
//! and expands to the full panel on hover, drag, or pin. This crate owns the
//! hard part of that behavior: the docking controller that tracks window
//! geometry across monitor configurations, negotiates collapse/expand
//! transitions against competing trigger sources, and persists the user's
//! preferred geometry.
//!
//! The rest of the application (todo/group CRUD, theming, settings UI) is a
//! consumer: it implements [`services::GeometryService`] and
//! [`services::SettingsStore`] for its windowing stack, spawns a
//! [`DockController`], raises pointer and drag events through the
//! [`DockHandle`], and renders whatever the [`DockSnapshot`] projection says.

pub mod config;
pub mod constants;
pub mod dock;
pub mod error;
pub mod services;

pub use config::DockConfig;
pub use dock::actor::{
    ActorError, CollapseSource, DockController, DockHandle, DockQuery, DockQueryResult,
    ExpandSource,
};
pub use dock::state::{DockSnapshot, DockState, DockedEdge, Rect};
pub use error::EdgenoteError;
pub use services::{GeometryService, SettingsStore, WindowPreference};
