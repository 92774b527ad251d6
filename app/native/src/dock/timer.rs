//! Cancellable one-shot timer slots for delayed dock transitions.
//!
//! Each purpose (collapse, resize settle, dock switch, ...) owns a single
//! named slot. Arming a slot that is already armed cancels the previous
//! pending action first, so at most one action per slot is ever pending.
//!
//! Cancellation is total. Two mechanisms back that guarantee:
//! - the sleeping task is aborted, so a fire that has not happened yet never
//!   happens;
//! - every armed action carries a generation number that the actor validates
//!   at fire time, so a fire that raced past the abort is dropped as stale.
//!
//! The generation check is the schedule-then-revalidate idiom: the delayed
//! action re-checks its guards when it fires rather than trusting the state
//! captured when it was scheduled.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A single named timer slot with cancel-on-reschedule semantics.
#[derive(Debug, Default)]
pub struct TimerSlot {
    /// Incremented on every arm and cancel; stale fires carry an old value.
    generation: u64,
    /// Abort handle of the currently armed sleep task, if any.
    armed: Option<AbortHandle>,
}

impl TimerSlot {
    /// Create an empty, disarmed slot.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Arm the slot: after `delay`, send the message built by `make` on
    /// `sender`. A previously armed action is cancelled first.
    ///
    /// `make` receives the generation number that the fired message must
    /// carry back for [`TimerSlot::accepts`] to let it through.
    pub fn arm<M, F>(&mut self, delay: Duration, sender: mpsc::Sender<M>, make: F)
    where
        M: Send + 'static,
        F: FnOnce(u64) -> M,
    {
        self.cancel();
        let msg = make(self.generation);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver deciding to shut down while we slept is fine.
            let _ = sender.send(msg).await;
        });
        self.armed = Some(task.abort_handle());
    }

    /// Cancel any pending action. Safe to call on a disarmed slot.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.armed.take() {
            handle.abort();
        }
    }

    /// Validate a fired generation and disarm the slot when it matches.
    ///
    /// Returns `true` exactly once per armed action; stale or duplicate
    /// fires return `false`.
    pub fn accepts(&mut self, generation: u64) -> bool {
        if self.armed.is_some() && generation == self.generation {
            self.armed = None;
            true
        } else {
            false
        }
    }

    /// Whether an action is currently pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool { self.armed.is_some() }
}

/// The named timer slots used by the dock actor, one per purpose.
#[derive(Debug, Default)]
pub struct TimerSlots {
    /// Delayed collapse after hover-leave / window-leave.
    pub collapse: TimerSlot,
    /// Live-resize settle detection.
    pub resize_settle: TimerSlot,
    /// Re-collapse after a dock-edge switch.
    pub dock_switch: TimerSlot,
    /// Pointer re-check after a pin release.
    pub pin_release: TimerSlot,
    /// Grace period after a drag ends with the pointer outside.
    pub drag_grace: TimerSlot,
    /// Clears the adjusting guard after a corrective move.
    pub adjust_settle: TimerSlot,
}

impl TimerSlots {
    /// Cancel every pending action.
    ///
    /// Called before the actor is torn down so a late fire never acts on a
    /// destroyed window.
    pub fn cancel_all(&mut self) {
        self.collapse.cancel();
        self.resize_settle.cancel();
        self.dock_switch.cancel();
        self.pin_release.cancel();
        self.drag_grace.cancel();
        self.adjust_settle.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
