//! Deferred state transitions
//!
//! A queued transition waits for a [`QueueCondition`] to hold before it
//! takes effect. Conditions are checked once per tick, after the counters
//! have advanced, against the loop and frame counts of the current state.

use std::fmt;
use std::sync::Arc;

/// Predicate deciding when a queued transition activates
///
/// Implementations must be side-effect free; they may be evaluated on any
/// thread while the controller lock is held.
pub trait QueueCondition: Send + Sync + fmt::Debug {
    /// `loop_count`: completed passes through the current state's frames.
    /// `frame_count`: ticks since the current state was entered.
    fn should_activate(&self, loop_count: usize, frame_count: usize) -> bool;
}

/// Activates once the current state has looped `n` times
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AfterLoops {
    n: usize,
}

impl AfterLoops {
    /// `n` is clamped to at least 1
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n: n.max(1) }
    }

    /// Required loop count
    #[must_use]
    pub fn loops(&self) -> usize {
        self.n
    }
}

impl QueueCondition for AfterLoops {
    fn should_activate(&self, loop_count: usize, _frame_count: usize) -> bool {
        loop_count >= self.n
    }
}

/// Activates once `n` ticks have elapsed in the current state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AfterFrames {
    n: usize,
}

impl AfterFrames {
    /// `n` is clamped to at least 1
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n: n.max(1) }
    }

    /// Required frame count
    #[must_use]
    pub fn frames(&self) -> usize {
        self.n
    }
}

impl QueueCondition for AfterFrames {
    fn should_activate(&self, _loop_count: usize, frame_count: usize) -> bool {
        frame_count >= self.n
    }
}

/// Activates on the next tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Immediate;

impl QueueCondition for Immediate {
    fn should_activate(&self, _loop_count: usize, _frame_count: usize) -> bool {
        true
    }
}

/// Condition after `n` complete loops (`n` clamped to at least 1)
#[must_use]
pub fn after_loops(n: usize) -> AfterLoops {
    AfterLoops::new(n)
}

/// Condition after `n` ticks (`n` clamped to at least 1)
#[must_use]
pub fn after_frames(n: usize) -> AfterFrames {
    AfterFrames::new(n)
}

/// Condition that holds on the next tick
#[must_use]
pub fn immediate() -> Immediate {
    Immediate
}

/// A pending transition
#[derive(Clone, Debug)]
pub struct QueuedTransition {
    /// Resolved target state
    pub state: String,
    /// When to activate
    pub condition: Arc<dyn QueueCondition>,
    /// Transient FPS to apply on activation
    pub fps: Option<u32>,
}

impl QueuedTransition {
    /// Whether the transition should fire now
    #[must_use]
    pub fn is_ready(&self, loop_count: usize, frame_count: usize) -> bool {
        self.condition.should_activate(loop_count, frame_count)
    }
}
