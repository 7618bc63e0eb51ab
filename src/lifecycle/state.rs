//! Harness phase state machine.
//!
//! # States
//! - Idle: constructed, not yet running
//! - Initializing: auxiliary subsystems being set up
//! - Serving: listener task running
//! - ShuttingDown: stopping the listener and running teardown hooks
//! - Terminated: result available, no further transitions
//!
//! # State Transitions
//! ```text
//! Idle → Initializing → Serving → ShuttingDown → Terminated
//!              └───────────────────────↑ (setup failure)
//! ```

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

/// Phase of a harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Idle,
    Initializing,
    Serving,
    ShuttingDown,
    Terminated,
}

impl LifecyclePhase {
    /// Whether `next` is a legal successor of this phase.
    pub fn can_transition_to(self, next: LifecyclePhase) -> bool {
        use LifecyclePhase::{Idle, Initializing, Serving, ShuttingDown, Terminated};
        matches!(
            (self, next),
            (Idle, Initializing)
                | (Initializing, Serving)
                | (Initializing, ShuttingDown)
                | (Serving, ShuttingDown)
                | (ShuttingDown, Terminated)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecyclePhase::Idle => "idle",
            LifecyclePhase::Initializing => "initializing",
            LifecyclePhase::Serving => "serving",
            LifecyclePhase::ShuttingDown => "shutting_down",
            LifecyclePhase::Terminated => "terminated",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared view of a harness's current phase.
///
/// Observers either poll [`current`](Self::current), await changes through
/// [`subscribe`](Self::subscribe), or inspect every accepted transition via
/// [`history`](Self::history).
#[derive(Debug, Clone)]
pub struct LifecycleState {
    tx: Arc<watch::Sender<LifecyclePhase>>,
    history: Arc<Mutex<Vec<LifecyclePhase>>>,
}

impl LifecycleState {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecyclePhase::Idle);
        Self {
            tx: Arc::new(tx),
            history: Arc::new(Mutex::new(vec![LifecyclePhase::Idle])),
        }
    }

    pub fn current(&self) -> LifecyclePhase {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecyclePhase> {
        self.tx.subscribe()
    }

    /// Every phase entered so far, starting with `Idle`.
    pub fn history(&self) -> Vec<LifecyclePhase> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Move to `next`. Illegal transitions are refused and leave the phase unchanged.
    pub fn transition(&self, next: LifecyclePhase) -> bool {
        let mut from = None;
        let moved = self.tx.send_if_modified(|phase| {
            if !phase.can_transition_to(next) {
                from = Some(*phase);
                return false;
            }
            *phase = next;
            true
        });

        if moved {
            self.history
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(next);
            tracing::debug!(phase = %next, "Lifecycle transition");
        } else if let Some(from) = from {
            tracing::warn!(from = %from, to = %next, "Refused lifecycle transition");
        }
        moved
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::new()
    }
}
