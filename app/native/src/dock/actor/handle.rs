//! Handle for communicating with the dock actor.
//!
//! The `DockHandle` provides a safe, cloneable interface for raising intents
//! and surface events into the actor, querying its state, and subscribing to
//! the read-only snapshot projection.

use std::time::Duration;

use eyeball::{SharedObservable, Subscriber};
use tokio::sync::{mpsc, oneshot};

use super::messages::{CollapseSource, DockMessage, DockQuery, DockQueryResult, ExpandSource};
use crate::dock::state::{DockSnapshot, Rect};

/// Error types for actor communication.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Failed to send message to actor.
    #[error("Failed to send message to dock actor: channel closed")]
    SendFailed,

    /// Failed to receive response from actor.
    #[error("Failed to receive response from dock actor: channel closed")]
    ReceiveFailed,

    /// Query timed out.
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),
}

/// Handle for communicating with the dock actor.
///
/// This handle is cheap to clone and can be shared across threads. Intents
/// are fire-and-forget; the actor applies its pin/drag guards and publishes
/// the outcome through the snapshot observable.
#[derive(Clone)]
pub struct DockHandle {
    sender: mpsc::Sender<DockMessage>,
    snapshot: SharedObservable<DockSnapshot>,
}

impl DockHandle {
    /// Create a new handle with the given sender and snapshot observable.
    pub(crate) const fn new(
        sender: mpsc::Sender<DockMessage>,
        snapshot: SharedObservable<DockSnapshot>,
    ) -> Self {
        Self { sender, snapshot }
    }

    // ========================================================================
    // Fire-and-forget sending
    // ========================================================================

    /// Send a message to the actor without waiting for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn send(&self, msg: DockMessage) -> Result<(), ActorError> {
        self.sender.try_send(msg).map_err(|_| ActorError::SendFailed)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Run the initialization transition: restore or compute the expanded
    /// geometry and dock to the default edge.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn initialize(&self) -> Result<(), ActorError> { self.send(DockMessage::Initialize) }

    /// Request shutdown of the actor. Pending timers are cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn shutdown(&self) -> Result<(), ActorError> { self.send(DockMessage::Shutdown) }

    // ========================================================================
    // Imperative intents
    // ========================================================================

    /// Expand the window to the last known expanded geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn request_expand(&self, source: ExpandSource) -> Result<(), ActorError> {
        self.send(DockMessage::RequestExpand { source })
    }

    /// Schedule a delayed collapse to the docked edge.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn request_collapse(&self, source: CollapseSource) -> Result<(), ActorError> {
        self.send(DockMessage::RequestCollapse { source })
    }

    /// Flip the pin override.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn toggle_pin(&self) -> Result<(), ActorError> { self.send(DockMessage::TogglePin) }

    /// Switch between the two supported docked edges.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn toggle_dock_edge(&self) -> Result<(), ActorError> {
        self.send(DockMessage::ToggleDockEdge)
    }

    // ========================================================================
    // Trigger surface events
    // ========================================================================

    /// Pointer entered the indicator strip.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn indicator_entered(&self) -> Result<(), ActorError> {
        self.send(DockMessage::IndicatorEntered)
    }

    /// Pointer left the indicator strip.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn indicator_left(&self) -> Result<(), ActorError> {
        self.send(DockMessage::IndicatorLeft)
    }

    /// Pointer entered the expanded window; cancels a pending collapse.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn window_entered(&self) -> Result<(), ActorError> {
        self.send(DockMessage::WindowEntered)
    }

    /// Pointer left the expanded window.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn window_left(&self) -> Result<(), ActorError> { self.send(DockMessage::WindowLeft) }

    /// A list-reorder drag started; leave-collapse is suppressed until it
    /// ends.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn notify_drag_start(&self) -> Result<(), ActorError> {
        self.send(DockMessage::DragStarted)
    }

    /// The list-reorder drag ended.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn notify_drag_end(&self) -> Result<(), ActorError> { self.send(DockMessage::DragEnded) }

    /// The window is being resized by the user.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn live_resize(&self, rect: Rect) -> Result<(), ActorError> {
        self.send(DockMessage::LiveResize { rect })
    }

    // ========================================================================
    // Queries and projection
    // ========================================================================

    /// The current read-only snapshot.
    ///
    /// Served from the shared observable; does not round-trip to the actor.
    #[must_use]
    pub fn snapshot(&self) -> DockSnapshot { self.snapshot.get() }

    /// Subscribe to snapshot changes.
    ///
    /// The subscriber yields a value every time the projection actually
    /// changes (collapse/expand, pin flips, edge switches).
    #[must_use]
    pub fn subscribe(&self) -> Subscriber<DockSnapshot> { self.snapshot.subscribe() }

    /// Execute a query and wait for the result.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed, or
    /// [`ActorError::ReceiveFailed`] if the response channel is closed.
    pub async fn query(&self, query: DockQuery) -> Result<DockQueryResult, ActorError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(DockMessage::Query { query, respond_to: tx })
            .await
            .map_err(|_| ActorError::SendFailed)?;

        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Execute a query with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Timeout`] if the query doesn't complete in time,
    /// or any error from [`Self::query`].
    pub async fn query_timeout(
        &self,
        query: DockQuery,
        timeout: Duration,
    ) -> Result<DockQueryResult, ActorError> {
        tokio::time::timeout(timeout, self.query(query))
            .await
            .map_err(|_| ActorError::Timeout(timeout))?
    }

    /// The last known expanded geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn expanded_rect(&self) -> Result<Option<Rect>, ActorError> {
        let result = self.query(DockQuery::ExpandedRect).await?;
        result.into_expanded_rect().ok_or(ActorError::ReceiveFailed)
    }

    // ========================================================================
    // Channel state
    // ========================================================================

    /// Check if the actor is still running (channel is open).
    #[must_use]
    pub fn is_alive(&self) -> bool { !self.sender.is_closed() }

    /// Get the number of messages waiting in the queue.
    #[must_use]
    pub fn pending_messages(&self) -> usize { self.sender.max_capacity() - self.sender.capacity() }
}

impl std::fmt::Debug for DockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockHandle")
            .field("alive", &self.is_alive())
            .field("pending", &self.pending_messages())
            .field("snapshot", &self.snapshot.get())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
