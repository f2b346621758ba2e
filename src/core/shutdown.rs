//! Shutdown controller
//!
//! Coordinates normal completion and operator-interrupt termination.
//! The interrupt handler does no blocking work: it only flips an atomic
//! flag. The engine, running in normal thread context, observes the flag,
//! lets the producer abort its walk, and still joins every thread before
//! the final statistics are read. State transitions are one-way:
//! `Running -> Draining -> Stopped`.

use crate::error::{MirrorError, Result};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

const STATE_RUNNING: u8 = 0;
const STATE_DRAINING: u8 = 1;
const STATE_STOPPED: u8 = 2;

/// Lifecycle state of a replication run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Producer traverses, workers consume, backpressure applies.
    Running,
    /// No further jobs will be produced; workers finish what is buffered.
    Draining,
    /// Every thread has been joined; statistics are final.
    Stopped,
}

/// Cooperative stop flag plus the run-state machine.
#[derive(Debug)]
pub struct ShutdownController {
    stop_requested: AtomicBool,
    state: AtomicU8,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    /// Create a controller in the `Running` state.
    pub fn new() -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            state: AtomicU8::new(STATE_RUNNING),
        }
    }

    /// Request early termination. Safe to call from a signal-handling
    /// context: this only stores a flag.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    /// Whether early termination has been requested.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Transition `Running -> Draining`. Idempotent: later calls and calls
    /// after `Stopped` are no-ops.
    pub fn begin_draining(&self) {
        let _ = self.state.compare_exchange(
            STATE_RUNNING,
            STATE_DRAINING,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    /// Transition `Draining -> Stopped`.
    pub fn mark_stopped(&self) {
        let _ = self.state.compare_exchange(
            STATE_DRAINING,
            STATE_STOPPED,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        match self.state.load(Ordering::SeqCst) {
            STATE_RUNNING => RunState::Running,
            STATE_DRAINING => RunState::Draining,
            _ => RunState::Stopped,
        }
    }

    /// Install a ctrl-c handler that records the stop request.
    pub fn install_interrupt_handler(self: &Arc<Self>) -> Result<()> {
        let controller = Arc::clone(self);
        ctrlc::set_handler(move || {
            tracing::warn!("interrupt received, draining and shutting down");
            controller.request_stop();
        })
        .map_err(|e| MirrorError::config(format!("failed to install interrupt handler: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let controller = ShutdownController::new();
        assert_eq!(controller.state(), RunState::Running);
        assert!(!controller.stop_requested());
    }

    #[test]
    fn test_states_are_one_way() {
        let controller = ShutdownController::new();

        controller.begin_draining();
        assert_eq!(controller.state(), RunState::Draining);

        controller.mark_stopped();
        assert_eq!(controller.state(), RunState::Stopped);

        // Neither transition can re-enter an earlier state.
        controller.begin_draining();
        assert_eq!(controller.state(), RunState::Stopped);
    }

    #[test]
    fn test_stopped_requires_draining_first() {
        let controller = ShutdownController::new();
        controller.mark_stopped();
        assert_eq!(controller.state(), RunState::Running);
    }

    #[test]
    fn test_stop_request_is_sticky() {
        let controller = ShutdownController::new();
        controller.request_stop();
        controller.request_stop();
        assert!(controller.stop_requested());
    }
}
