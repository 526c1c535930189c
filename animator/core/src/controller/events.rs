//! Callback delivery
//!
//! # Design
//!
//! Callbacks never run under the controller lock. Events are pushed onto a
//! bounded channel while the lock is held (non-blocking `try_send`) and a
//! dedicated dispatcher thread drains the channel and invokes the user's
//! closures. This keeps delivery ordered and lets a callback call back into
//! the controller without deadlocking.
//!
//! The dispatcher is spawned lazily on the first callback registration and
//! exits once every sender has been dropped, i.e. when the controller goes
//! away.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Pending events before new ones are dropped
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Called with `(from, to)` when the current state changes
pub type StateChangeCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Called with `(state, loop_number)` each time a state wraps around
pub type LoopCompleteCallback = Arc<dyn Fn(&str, usize) + Send + Sync>;

/// Something the controller reports to callbacks
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ControllerEvent {
    StateChanged { from: String, to: String },
    LoopCompleted { state: String, loop_number: usize },
}

/// Registered callbacks; at most one of each kind
#[derive(Default)]
pub(crate) struct Callbacks {
    pub(crate) on_state_change: Option<StateChangeCallback>,
    pub(crate) on_loop_complete: Option<LoopCompleteCallback>,
}

/// Producer side of the dispatcher channel
pub(crate) struct EventSender {
    tx: mpsc::Sender<ControllerEvent>,
}

impl EventSender {
    /// Queue an event without blocking; drops it if the dispatcher is behind
    pub(crate) fn emit(&self, event: ControllerEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    capacity = EVENT_QUEUE_CAPACITY,
                    ?event,
                    "Callback queue full, dropping event"
                );
            }
            Err(TrySendError::Closed(event)) => {
                tracing::warn!(?event, "Callback dispatcher gone, dropping event");
            }
        }
    }
}

/// Start a dispatcher thread for `callbacks`
///
/// Returns `None` if the OS refuses to spawn the thread.
pub(crate) fn spawn_dispatcher(callbacks: Arc<RwLock<Callbacks>>) -> Option<EventSender> {
    let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);

    let spawned = std::thread::Builder::new()
        .name("animator-events".to_string())
        .spawn(move || dispatch(rx, &callbacks));

    match spawned {
        Ok(_) => {
            tracing::debug!("Callback dispatcher started");
            Some(EventSender { tx })
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to spawn callback dispatcher");
            None
        }
    }
}

fn dispatch(mut rx: mpsc::Receiver<ControllerEvent>, callbacks: &RwLock<Callbacks>) {
    while let Some(event) = rx.blocking_recv() {
        match event {
            ControllerEvent::StateChanged { from, to } => {
                // Clone out so the callback runs without the lock
                let callback = callbacks.read().on_state_change.clone();
                if let Some(callback) = callback {
                    callback(&from, &to);
                }
            }
            ControllerEvent::LoopCompleted { state, loop_number } => {
                let callback = callbacks.read().on_loop_complete.clone();
                if let Some(callback) = callback {
                    callback(&state, loop_number);
                }
            }
        }
    }
    tracing::debug!("Callback dispatcher stopped");
}
