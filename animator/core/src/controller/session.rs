//! Mutable controller state
//!
//! Everything in here is guarded by the controller's single lock and is
//! only touched through `StateController` methods.

use std::collections::HashMap;

use crate::alias::AliasResolver;
use crate::overlay::{NoiseConfig, NoiseSlots};
use crate::queue::QueuedTransition;

use super::events::EventSender;
use super::ticker::TickerHandle;

/// Default frame rate when nothing else is configured
pub const DEFAULT_FPS: u32 = 5;

/// Frame-rate configuration with override precedence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FpsConfig {
    /// Fallback rate
    pub default_fps: u32,
    /// Per-state rates
    pub state_fps: HashMap<String, u32>,
    /// Single-shot override, cleared on the next transition
    pub transient: Option<u32>,
}

impl FpsConfig {
    /// Config with the given default and no overrides
    #[must_use]
    pub fn new(default_fps: u32) -> Self {
        Self {
            default_fps: default_fps.max(1),
            state_fps: HashMap::new(),
            transient: None,
        }
    }

    /// Transient, then per-state, then default; never below 1
    #[must_use]
    pub fn effective(&self, state: &str) -> u32 {
        self.transient
            .or_else(|| self.state_fps.get(state).copied())
            .unwrap_or(self.default_fps)
            .max(1)
    }
}

impl Default for FpsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

/// The mutable heart of a controller
pub(crate) struct ControllerSession {
    pub(crate) current_state: String,
    pub(crate) frame_index: usize,
    pub(crate) loop_count: usize,
    pub(crate) frame_count: usize,
    pub(crate) fps: FpsConfig,
    pub(crate) aliases: AliasResolver,
    pub(crate) queued: Option<QueuedTransition>,
    pub(crate) noise: HashMap<String, NoiseConfig>,
    pub(crate) noise_slots: NoiseSlots,
    pub(crate) running: bool,
    pub(crate) ticker: Option<TickerHandle>,
    pub(crate) ticker_generation: u64,
    pub(crate) events: Option<EventSender>,
}

impl ControllerSession {
    pub(crate) fn new(
        initial_state: String,
        fps: FpsConfig,
        aliases: AliasResolver,
        noise: HashMap<String, NoiseConfig>,
    ) -> Self {
        Self {
            current_state: initial_state,
            frame_index: 0,
            loop_count: 0,
            frame_count: 0,
            fps,
            aliases,
            queued: None,
            noise,
            noise_slots: NoiseSlots::default(),
            running: false,
            ticker: None,
            ticker_generation: 0,
            events: None,
        }
    }

    pub(crate) fn effective_fps(&self) -> u32 {
        self.fps.effective(&self.current_state)
    }

    /// Started and the ticker task is still alive
    pub(crate) fn is_running(&self) -> bool {
        self.running && self.ticker.as_ref().is_some_and(TickerHandle::is_alive)
    }

    /// Enter `state`: reset counters, replace the transient FPS, drop the queue
    pub(crate) fn enter(&mut self, state: String, fps: Option<u32>) {
        self.current_state = state;
        self.frame_index = 0;
        self.loop_count = 0;
        self.frame_count = 0;
        self.fps.transient = fps.filter(|f| *f > 0);
        self.queued = None;
    }

    pub(crate) fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            state: self.current_state.clone(),
            frame_index: self.frame_index,
            loop_count: self.loop_count,
            frame_count: self.frame_count,
            fps: self.effective_fps(),
            queued: self.queued.as_ref().map(|q| q.state.clone()),
            running: self.is_running(),
        }
    }
}

/// Consistent view of the controller taken under one lock
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerSnapshot {
    /// Current state
    pub state: String,
    /// Position within the state's frames
    pub frame_index: usize,
    /// Completed loops in this state
    pub loop_count: usize,
    /// Ticks since the state was entered
    pub frame_count: usize,
    /// Effective frame rate
    pub fps: u32,
    /// Target of the pending transition, if any
    pub queued: Option<String>,
    /// Whether the internal ticker is active
    pub running: bool,
}
