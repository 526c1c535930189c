//! Animation State Controller
//!
//! Owns the current state, frame position, loop and frame counters, frame
//! rates, alias resolution, the queued transition and the overlay settings
//! for one character.
//!
//! # Design
//!
//! - One `parking_lot::RwLock` guards the whole session. Queries take the
//!   read side, everything that mutates takes the write side.
//! - Every operation after construction is total. Unknown names degrade to
//!   the idle state, missing frames degrade to the base frame.
//! - The internal ticker is optional; callers may drive [`StateController::tick`]
//!   from their own render loop instead.
//! - Callbacks run on a dispatcher thread, in order, never under the lock.
//!   A callback that needs the controller should capture a
//!   [`WeakController`]; a strong clone keeps the controller, its ticker
//!   and its dispatcher alive for as long as the callback is registered.
//!
//! # Example
//!
//! ```
//! use animator_core::character::{CharacterDefinition, CharacterRegistry, Frame};
//! use animator_core::controller::StateController;
//! use animator_core::queue::after_loops;
//!
//! let registry = CharacterRegistry::new();
//! registry
//!     .register(
//!         CharacterDefinition::new("blob", 2, 1)
//!             .with_state("resting", vec![Frame::new(["▗▖"]), Frame::new(["▝▘"])])
//!             .with_state("write", vec![Frame::new(["▐▌"])]),
//!     )
//!     .unwrap();
//!
//! let controller = StateController::new(&registry, "blob").unwrap();
//! assert_eq!(controller.state(), "resting");
//!
//! controller.set_state("editing"); // alias for "write"
//! controller.queue_state("resting", after_loops(2));
//! controller.tick();
//! controller.tick();
//! assert_eq!(controller.state(), "resting");
//! ```

mod events;
mod session;
mod ticker;

pub use events::{LoopCompleteCallback, StateChangeCallback, EVENT_QUEUE_CAPACITY};
pub use session::{ControllerSnapshot, FpsConfig, DEFAULT_FPS};

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use thiserror::Error;

use crate::alias::{AliasResolver, RECOMMENDED_STATE_FPS};
use crate::character::{
    CharacterDefinition, CharacterError, CharacterKind, CharacterProvider, FrameCache,
};
use crate::config::AnimatorConfig;
use crate::overlay::{default_micro_noise, render_overlay, NoiseConfig, NoiseSlots};
use crate::queue::{QueueCondition, QueuedTransition};

use events::{Callbacks, ControllerEvent};
use session::ControllerSession;

/// Errors from constructing a controller
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The provider could not supply the character
    #[error("failed to load {kind} {name:?}: {source}")]
    Load {
        /// Requested character name
        name: String,
        /// Requested namespace
        kind: CharacterKind,
        /// Provider failure
        #[source]
        source: CharacterError,
    },
}

/// Concurrency-safe animation controller for one character
///
/// Cloning is cheap and every clone drives the same session.
#[derive(Clone)]
pub struct StateController {
    shared: Arc<Shared>,
}

/// Non-owning handle to a [`StateController`]
///
/// Capture this in callbacks that call back into the controller.
#[derive(Clone, Debug)]
pub struct WeakController {
    shared: Weak<Shared>,
}

impl WeakController {
    /// The controller, if any strong handle is still alive
    #[must_use]
    pub fn upgrade(&self) -> Option<StateController> {
        self.shared.upgrade().map(|shared| StateController { shared })
    }
}

struct Shared {
    cache: FrameCache,
    session: RwLock<ControllerSession>,
    callbacks: Arc<RwLock<Callbacks>>,
    this: Weak<Shared>,
}

// =============================================================================
// Construction
// =============================================================================

impl StateController {
    /// Controller for a regular character with default settings
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Load`] if the provider does not know `name`.
    pub fn new(provider: &dyn CharacterProvider, name: &str) -> Result<Self, ControllerError> {
        Self::with_config(
            provider,
            name,
            CharacterKind::Regular,
            &AnimatorConfig::default(),
        )
    }

    /// Controller for a micro character, with the default overlay table
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Load`] if the provider does not know `name`.
    pub fn new_micro(provider: &dyn CharacterProvider, name: &str) -> Result<Self, ControllerError> {
        Self::with_config(
            provider,
            name,
            CharacterKind::Micro,
            &AnimatorConfig::default(),
        )
    }

    /// Controller with explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Load`] if the provider does not know `name`.
    pub fn with_config(
        provider: &dyn CharacterProvider,
        name: &str,
        kind: CharacterKind,
        config: &AnimatorConfig,
    ) -> Result<Self, ControllerError> {
        let definition = provider
            .load(name, kind)
            .map_err(|source| ControllerError::Load {
                name: name.to_string(),
                kind,
                source,
            })?;
        Ok(Self::from_definition(&definition, kind, config))
    }

    /// Controller over an already loaded definition
    #[must_use]
    pub fn from_definition(
        definition: &CharacterDefinition,
        kind: CharacterKind,
        config: &AnimatorConfig,
    ) -> Self {
        let cache = FrameCache::new(definition);

        let mut aliases = AliasResolver::new(config.idle_state.clone());
        for (from, to) in &config.aliases {
            aliases.set_alias(from.clone(), to.clone());
        }

        let mut fps = FpsConfig::new(config.default_fps);
        if config.recommended_fps {
            install_recommended(&mut fps, &cache);
        }
        for (state, rate) in &config.state_fps {
            let key = fps_key(&aliases, state, &cache);
            if *rate == 0 {
                fps.state_fps.remove(&key);
            } else {
                fps.state_fps.insert(key, *rate);
            }
        }

        let mut noise = match kind {
            CharacterKind::Micro => default_micro_noise(),
            CharacterKind::Regular => HashMap::new(),
        };
        noise.extend(config.noise.iter().map(|(state, cfg)| (state.clone(), *cfg)));

        let initial = aliases.idle_state().to_string();
        tracing::debug!(
            character = %cache.character_name(),
            %kind,
            states = cache.state_count(),
            idle = %initial,
            "Controller created"
        );

        let mut session = ControllerSession::new(initial, fps, aliases, noise);
        session.noise_slots = select_slots(&session, &cache);
        let shared = Arc::new_cyclic(|this| Shared {
            cache,
            session: RwLock::new(session),
            callbacks: Arc::default(),
            this: this.clone(),
        });
        Self { shared }
    }
}

// =============================================================================
// Transitions
// =============================================================================

impl StateController {
    /// Switch to `name` (resolved through aliases) immediately
    ///
    /// Always resets the counters, clears the transient FPS and the queue,
    /// even when the resolved state is already current.
    pub fn set_state(&self, name: &str) {
        self.set_state_with_fps(name, 0);
    }

    /// Switch immediately and run the new state at `fps` until the next
    /// transition (`0` means no override)
    pub fn set_state_with_fps(&self, name: &str, fps: u32) {
        let mut session = self.shared.session.write();
        let target = session.aliases.resolve(name, &self.shared.cache);
        self.shared.transition(&mut session, target, Some(fps));
    }

    /// Switch to `name` once `condition` holds, replacing any pending queue
    pub fn queue_state<C>(&self, name: &str, condition: C)
    where
        C: QueueCondition + 'static,
    {
        self.queue_state_with_fps(name, condition, 0);
    }

    /// Like [`queue_state`](Self::queue_state), applying `fps` on activation
    pub fn queue_state_with_fps<C>(&self, name: &str, condition: C, fps: u32)
    where
        C: QueueCondition + 'static,
    {
        let mut session = self.shared.session.write();
        let state = session.aliases.resolve(name, &self.shared.cache);
        tracing::debug!(
            character = %self.shared.cache.character_name(),
            requested = %name,
            state = %state,
            ?condition,
            "Transition queued"
        );
        session.queued = Some(QueuedTransition {
            state,
            condition: Arc::new(condition),
            fps: (fps > 0).then_some(fps),
        });
    }

    /// Drop the pending transition, if any
    pub fn clear_queue(&self) {
        self.shared.session.write().queued = None;
    }

    /// Whether a transition is pending
    #[must_use]
    pub fn has_queued_state(&self) -> bool {
        self.shared.session.read().queued.is_some()
    }

    /// Advance one frame and evaluate the queue
    pub fn tick(&self) {
        let mut session = self.shared.session.write();
        self.shared.advance(&mut session);
    }
}

// =============================================================================
// Frame Rate
// =============================================================================

impl StateController {
    /// Set the fallback rate (`0` is treated as 1)
    pub fn set_default_fps(&self, fps: u32) {
        let mut session = self.shared.session.write();
        session.fps.default_fps = fps.max(1);
        self.shared.refresh_ticker(&mut session);
    }

    /// Set the rate for one state (`0` removes the override)
    pub fn set_state_fps(&self, state: &str, fps: u32) {
        let mut session = self.shared.session.write();
        let key = fps_key(&session.aliases, state, &self.shared.cache);
        if fps == 0 {
            session.fps.state_fps.remove(&key);
        } else {
            session.fps.state_fps.insert(key.clone(), fps);
        }
        if key == session.current_state {
            self.shared.refresh_ticker(&mut session);
        }
    }

    /// Override the rate until the next transition (`0` clears it)
    pub fn set_fps(&self, fps: u32) {
        let mut session = self.shared.session.write();
        session.fps.transient = (fps > 0).then_some(fps);
        self.shared.refresh_ticker(&mut session);
    }

    /// Effective rate for the current state
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.shared.session.read().effective_fps()
    }

    /// Install [`RECOMMENDED_STATE_FPS`] for the states this character has
    pub fn apply_recommended_fps(&self) {
        let mut session = self.shared.session.write();
        install_recommended(&mut session.fps, &self.shared.cache);
        self.shared.refresh_ticker(&mut session);
    }
}

// =============================================================================
// Aliases and Overlay Settings
// =============================================================================

impl StateController {
    /// Map `from` to `to`, taking precedence over the default table
    pub fn set_alias(&self, from: &str, to: &str) {
        self.shared.session.write().aliases.set_alias(from, to);
    }

    /// Remove a custom alias, returning its target
    pub fn remove_alias(&self, from: &str) -> Option<String> {
        self.shared.session.write().aliases.remove_alias(from)
    }

    /// Name of the fallback state
    #[must_use]
    pub fn idle_state(&self) -> String {
        self.shared.session.read().aliases.idle_state().to_string()
    }

    /// Enable the overlay for `state`
    pub fn set_noise_config(&self, state: &str, config: NoiseConfig) {
        let mut session = self.shared.session.write();
        session.noise.insert(state.to_string(), config);
        if session.current_state == state {
            session.noise_slots = select_slots(&session, &self.shared.cache);
        }
    }

    /// Disable the overlay for `state`
    pub fn remove_noise_config(&self, state: &str) -> Option<NoiseConfig> {
        let mut session = self.shared.session.write();
        let removed = session.noise.remove(state);
        if session.current_state == state {
            session.noise_slots = NoiseSlots::default();
        }
        removed
    }

    /// Overlay settings for `state`
    #[must_use]
    pub fn noise_config(&self, state: &str) -> Option<NoiseConfig> {
        self.shared.session.read().noise.get(state).copied()
    }

    /// Overlay cells picked when the current state was entered
    #[must_use]
    pub fn noise_slots(&self) -> NoiseSlots {
        self.shared.session.read().noise_slots.clone()
    }
}

// =============================================================================
// Frames
// =============================================================================

impl StateController {
    /// Lines for the current frame, with color markup
    ///
    /// States with overlay settings are recolored once awake; states
    /// without frames show the base frame.
    #[must_use]
    pub fn frame(&self) -> Vec<String> {
        let session = self.shared.session.read();
        let cache = &self.shared.cache;

        let frames = cache.get_state_frames(&session.current_state);
        if frames.is_empty() {
            return cache.get_base_frame().lines.clone();
        }
        let index = session.frame_index % frames.len();

        if let Some(config) = session.noise.get(&session.current_state) {
            let raw = cache.get_state_frames_raw(&session.current_state).get(index);
            if let Some(raw) = raw {
                if let Some(overlaid) = render_overlay(
                    raw,
                    config,
                    session.frame_count,
                    cache.rgb(),
                    &session.noise_slots,
                ) {
                    return overlaid.lines;
                }
            }
        }

        frames[index].lines.clone()
    }

    /// Lines for the current frame without any markup
    #[must_use]
    pub fn frame_raw(&self) -> Vec<String> {
        let session = self.shared.session.read();
        let cache = &self.shared.cache;

        let frames = cache.get_state_frames_raw(&session.current_state);
        if frames.is_empty() {
            return cache.get_base_frame_raw().lines.clone();
        }
        frames[session.frame_index % frames.len()].lines.clone()
    }
}

// =============================================================================
// Ticker and Callbacks
// =============================================================================

impl StateController {
    /// Start the internal ticker; no-op if already running
    ///
    /// Uses the current tokio runtime when called from inside one,
    /// otherwise a dedicated thread. A ticker whose runtime has shut down
    /// no longer counts as running and is replaced.
    pub fn start(&self) {
        let mut session = self.shared.session.write();
        if session.is_running() {
            return;
        }
        session.running = true;
        self.shared.start_ticker(&mut session);
    }

    /// Stop the internal ticker; no-op if not running
    pub fn stop(&self) {
        let mut session = self.shared.session.write();
        if !session.running {
            return;
        }
        session.running = false;
        session.ticker = None;
        tracing::debug!(character = %self.shared.cache.character_name(), "Ticker stop requested");
    }

    /// Whether the internal ticker is active
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.session.read().is_running()
    }

    /// Handle that does not keep the controller alive
    #[must_use]
    pub fn downgrade(&self) -> WeakController {
        WeakController {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Register the state-change callback, replacing any previous one
    ///
    /// Called with `(from, to)` on the dispatcher thread, in transition order.
    /// Capture a [`WeakController`] rather than a clone to call back in.
    pub fn on_state_change<F>(&self, callback: F)
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        let mut session = self.shared.session.write();
        self.shared.callbacks.write().on_state_change = Some(Arc::new(callback));
        self.shared.ensure_dispatcher(&mut session);
    }

    /// Register the loop-complete callback, replacing any previous one
    ///
    /// Called with `(state, loop_number)` on the dispatcher thread.
    pub fn on_loop_complete<F>(&self, callback: F)
    where
        F: Fn(&str, usize) + Send + Sync + 'static,
    {
        let mut session = self.shared.session.write();
        self.shared.callbacks.write().on_loop_complete = Some(Arc::new(callback));
        self.shared.ensure_dispatcher(&mut session);
    }
}

// =============================================================================
// Queries
// =============================================================================

impl StateController {
    /// Current (resolved) state name
    #[must_use]
    pub fn state(&self) -> String {
        self.shared.session.read().current_state.clone()
    }

    /// Completed loops since the state was entered
    #[must_use]
    pub fn loop_count(&self) -> usize {
        self.shared.session.read().loop_count
    }

    /// Position within the current state's frames
    #[must_use]
    pub fn frame_index(&self) -> usize {
        self.shared.session.read().frame_index
    }

    /// Ticks since the state was entered
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.shared.session.read().frame_count
    }

    /// Every state, sorted
    #[must_use]
    pub fn list_states(&self) -> Vec<String> {
        self.shared.cache.list_states()
    }

    /// Whether `name` is a state or an alias that resolves to one
    #[must_use]
    pub fn has_state(&self, name: &str) -> bool {
        self.shared
            .session
            .read()
            .aliases
            .is_known(name, &self.shared.cache)
    }

    /// Hex color as declared by the character
    #[must_use]
    pub fn color(&self) -> &str {
        self.shared.cache.color()
    }

    /// `(width, height)`
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        self.shared.cache.dimensions()
    }

    /// Character name
    #[must_use]
    pub fn character_name(&self) -> &str {
        self.shared.cache.character_name()
    }

    /// Read-only frame data
    #[must_use]
    pub fn frame_cache(&self) -> &FrameCache {
        &self.shared.cache
    }

    /// Every counter at once, from a single lock acquisition
    #[must_use]
    pub fn snapshot(&self) -> ControllerSnapshot {
        self.shared.session.read().snapshot()
    }
}

impl std::fmt::Debug for StateController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateController")
            .field("character", &self.shared.cache.character_name())
            .field("session", &self.snapshot())
            .finish()
    }
}

// =============================================================================
// Internals (all called with the write lock held)
// =============================================================================

impl Shared {
    fn transition(&self, session: &mut ControllerSession, target: String, fps: Option<u32>) {
        if session.current_state != target {
            tracing::debug!(
                character = %self.cache.character_name(),
                from = %session.current_state,
                to = %target,
                "State transition"
            );
            if let Some(events) = &session.events {
                events.emit(ControllerEvent::StateChanged {
                    from: session.current_state.clone(),
                    to: target.clone(),
                });
            }
        }

        session.enter(target, fps);
        session.noise_slots = select_slots(session, &self.cache);
        self.refresh_ticker(session);
    }

    fn advance(&self, session: &mut ControllerSession) {
        session.frame_count = session.frame_count.saturating_add(1);

        let len = self.cache.frame_count(&session.current_state);
        if len > 0 {
            session.frame_index = (session.frame_index + 1) % len;
            if session.frame_index == 0 {
                session.loop_count = session.loop_count.saturating_add(1);
                if let Some(events) = &session.events {
                    events.emit(ControllerEvent::LoopCompleted {
                        state: session.current_state.clone(),
                        loop_number: session.loop_count,
                    });
                }
            }
        }

        tracing::trace!(
            state = %session.current_state,
            frame_index = session.frame_index,
            loop_count = session.loop_count,
            frame_count = session.frame_count,
            "Tick"
        );

        let ready = session
            .queued
            .as_ref()
            .is_some_and(|q| q.is_ready(session.loop_count, session.frame_count));
        if ready {
            if let Some(queued) = session.queued.take() {
                tracing::debug!(
                    character = %self.cache.character_name(),
                    state = %queued.state,
                    "Queued transition activated"
                );
                self.transition(session, queued.state, queued.fps);
            }
        }
    }

    /// Restart the ticker at the current effective rate if it is running
    fn refresh_ticker(&self, session: &mut ControllerSession) {
        if !session.running {
            return;
        }
        let fps = session.effective_fps();
        if let Some(ticker) = session.ticker.as_ref().filter(|t| t.is_alive()) {
            tracing::trace!(
                from_ms = ticker.period().as_millis(),
                fps,
                "Restarting ticker"
            );
            ticker.restart(fps);
            return;
        }
        tracing::debug!("Ticker task gone, spawning a new one");
        self.start_ticker(session);
    }

    fn start_ticker(&self, session: &mut ControllerSession) {
        session.ticker_generation = session.ticker_generation.wrapping_add(1);
        let generation = session.ticker_generation;
        let target = self.this.clone();

        session.ticker = ticker::spawn(session.effective_fps(), move || {
            target
                .upgrade()
                .is_some_and(|shared| shared.tick_from_ticker(generation))
        });

        if session.ticker.is_none() {
            session.running = false;
        }
    }

    /// One tick from the ticker of `generation`; `false` retires that ticker
    fn tick_from_ticker(&self, generation: u64) -> bool {
        let mut session = self.session.write();
        if !session.running || session.ticker_generation != generation {
            return false;
        }
        self.advance(&mut session);
        true
    }

    fn ensure_dispatcher(&self, session: &mut ControllerSession) {
        if session.events.is_none() {
            session.events = events::spawn_dispatcher(Arc::clone(&self.callbacks));
        }
    }
}

/// Fresh overlay cells for the current state, empty without overlay settings
fn select_slots(session: &ControllerSession, cache: &FrameCache) -> NoiseSlots {
    match session.noise.get(&session.current_state) {
        Some(config) => {
            let (width, height) = cache.dimensions();
            NoiseSlots::select(width, height, config.count, &mut rand::thread_rng())
        }
        None => NoiseSlots::default(),
    }
}

fn install_recommended(fps: &mut FpsConfig, cache: &FrameCache) {
    for (state, rate) in RECOMMENDED_STATE_FPS {
        if cache.has_state(state) {
            fps.state_fps.insert((*state).to_string(), *rate);
        }
    }
}

/// Key for a per-state rate: the resolved state for known names, the
/// literal name otherwise (never the idle fallback)
fn fps_key(aliases: &AliasResolver, state: &str, cache: &FrameCache) -> String {
    if aliases.is_known(state, cache) {
        aliases.resolve(state, cache)
    } else {
        state.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
