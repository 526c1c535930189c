//! Precomputed frame cache
//!
//! Every frame of a character is colorized once at construction so that
//! lookups during rendering are plain slice reads. The cache is immutable
//! after [`FrameCache::new`], which makes it safe to share across threads
//! without locking.

use std::collections::BTreeMap;

use crate::color::{colorize, Rgb};

use super::{CharacterDefinition, Frame};

/// Colored and raw variants of one state's frames
#[derive(Clone, Debug, Default)]
struct StateFrames {
    colored: Vec<Frame>,
    raw: Vec<Frame>,
}

/// Read-only, display-ready frames for one character
///
/// # Example
///
/// ```
/// use animator_core::character::{CharacterDefinition, Frame, FrameCache};
///
/// let def = CharacterDefinition::new("dot", 1, 1)
///     .with_state("resting", vec![Frame::new(["•"])]);
/// let cache = FrameCache::new(&def);
///
/// assert!(cache.has_state("resting"));
/// assert!(cache.get_state_frames("nope").is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct FrameCache {
    name: String,
    width: usize,
    height: usize,
    color: String,
    rgb: Option<Rgb>,
    base: Frame,
    base_raw: Frame,
    states: BTreeMap<String, StateFrames>,
}

impl FrameCache {
    /// Precompute every frame of `definition`
    ///
    /// An unparseable color is logged and treated as "no color"; providers
    /// that validate (like the registry) never hand one over.
    #[must_use]
    pub fn new(definition: &CharacterDefinition) -> Self {
        let rgb = match Rgb::parse_optional(&definition.color) {
            Ok(rgb) => rgb,
            Err(e) => {
                tracing::warn!(
                    character = %definition.name,
                    error = %e,
                    "Ignoring invalid character color"
                );
                None
            }
        };

        let paint = |frame: &Frame| Frame {
            lines: frame.lines.iter().map(|l| colorize(l, rgb)).collect(),
        };

        let states = definition
            .states
            .iter()
            .map(|(name, frames)| {
                let entry = StateFrames {
                    colored: frames.iter().map(paint).collect(),
                    raw: frames.clone(),
                };
                (name.clone(), entry)
            })
            .collect();

        Self {
            name: definition.name.clone(),
            width: definition.width,
            height: definition.height,
            color: definition.color.clone(),
            rgb,
            base: paint(&definition.base_frame),
            base_raw: definition.base_frame.clone(),
            states,
        }
    }

    /// The base frame, colored
    #[must_use]
    pub fn get_base_frame(&self) -> &Frame {
        &self.base
    }

    /// The base frame without markup
    #[must_use]
    pub fn get_base_frame_raw(&self) -> &Frame {
        &self.base_raw
    }

    /// Colored frames for a state; empty if the state is unknown
    #[must_use]
    pub fn get_state_frames(&self, state: &str) -> &[Frame] {
        self.states.get(state).map(|s| s.colored.as_slice()).unwrap_or(&[])
    }

    /// Raw frames for a state; empty if the state is unknown
    #[must_use]
    pub fn get_state_frames_raw(&self, state: &str) -> &[Frame] {
        self.states.get(state).map(|s| s.raw.as_slice()).unwrap_or(&[])
    }

    /// Whether the state exists
    #[must_use]
    pub fn has_state(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    /// All state names, sorted
    #[must_use]
    pub fn list_states(&self) -> Vec<String> {
        self.states.keys().cloned().collect()
    }

    /// Number of frames in a state (0 if unknown)
    #[must_use]
    pub fn frame_count(&self, state: &str) -> usize {
        self.states.get(state).map_or(0, |s| s.raw.len())
    }

    /// Number of states
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Character name
    #[must_use]
    pub fn character_name(&self) -> &str {
        &self.name
    }

    /// Hex color as declared by the character
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Parsed color, if any
    #[must_use]
    pub fn rgb(&self) -> Option<Rgb> {
        self.rgb
    }

    /// `(width, height)`
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}
