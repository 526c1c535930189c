//! Animator Core - Animation State Controller for Block-Glyph Characters
//!
//! This crate drives small animated terminal characters whose behavior
//! follows external events ("thinking", "writing", "done"). It owns the
//! timing and state logic only; drawing the lines it hands out is the
//! caller's job.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    Caller / Renderer                       │
//! │        set_state("editing")            frame() -> lines    │
//! └───────────────┬───────────────────────────────▲───────────┘
//!                 │                               │
//! ┌───────────────▼───────────────────────────────┴───────────┐
//! │                     StateController                        │
//! │  ┌──────────────┐ ┌──────────┐ ┌────────┐ ┌────────────┐  │
//! │  │AliasResolver │ │ FpsConfig│ │ Queue  │ │  Overlay   │  │
//! │  └──────────────┘ └──────────┘ └────────┘ └────────────┘  │
//! │          ticker (tokio)        callbacks (dispatcher)      │
//! └───────────────┬───────────────────────────────────────────┘
//!                 │ load(name, kind)
//! ┌───────────────▼───────────────────────────────────────────┐
//! │      CharacterProvider (CharacterRegistry) -> FrameCache   │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Overview
//!
//! - [`character`]: Definitions, the provider trait, registry, frame cache
//! - [`alias`]: External name to state resolution
//! - [`queue`]: Deferred transitions and their conditions
//! - [`overlay`]: Activity curve and shifting gradient
//! - [`controller`]: The state machine and scheduler
//! - [`color`]: Hex colors and terminal markup
//! - [`config`]: TOML/environment configuration
//! - [`expressions`]: Idle filler phrase rotation
//!
//! # No Terminal Dependencies
//!
//! Nothing here touches the terminal. Frames are plain strings with
//! optional 24-bit color escape sequences.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alias;
pub mod character;
pub mod color;
pub mod config;
pub mod controller;
pub mod expressions;
pub mod overlay;
pub mod queue;

// Re-exports for convenience
pub use alias::{AliasResolver, DEFAULT_ALIASES, DEFAULT_IDLE_STATE, RECOMMENDED_STATE_FPS};
pub use character::{
    CharacterDefinition, CharacterError, CharacterKind, CharacterProvider, CharacterRegistry,
    Frame, FrameCache,
};
pub use color::{ColorError, Rgb};
pub use controller::{
    ControllerError, ControllerSnapshot, FpsConfig, StateController, WeakController,
    DEFAULT_FPS,
};
pub use expressions::{ExpressionCycler, DEFAULT_IDLE_EXPRESSIONS, EXPRESSION_CHANGE_INTERVAL};
pub use overlay::{apply_shifting_gradient, calculate_noise_count, NoiseConfig, NoiseSlots};
pub use queue::{after_frames, after_loops, immediate, QueueCondition};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, AnimatorConfig, AnimatorToml,
    ConfigError, ConfigOverrides, ConfigSource,
};
