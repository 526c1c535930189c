//! Character Data - Definitions, Providers, and the Frame Cache
//!
//! A character is a fixed-size block-glyph sprite with a set of named
//! states, each an ordered list of frames. Characters come from a
//! [`CharacterProvider`]; the controller never mutates them.
//!
//! # Design
//!
//! - [`CharacterDefinition`]: validated, read-only input data
//! - [`CharacterRegistry`]: explicit registry object (no global tables)
//! - [`FrameCache`]: precomputed, display-ready lines per state

pub mod cache;
pub mod registry;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{ColorError, Rgb};

pub use cache::FrameCache;
pub use registry::CharacterRegistry;

/// Which namespace a character lives in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CharacterKind {
    /// Full-size character
    #[default]
    Regular,
    /// Compact character; gets the liveliness overlay by default
    Micro,
}

impl std::fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "character"),
            Self::Micro => write!(f, "micro character"),
        }
    }
}

/// Errors from loading or validating character data
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CharacterError {
    /// No character with this name in the requested namespace
    #[error("unknown {kind} {name:?}")]
    NotFound {
        /// Requested name
        name: String,
        /// Requested namespace
        kind: CharacterKind,
    },

    /// Character name is empty
    #[error("character name must not be empty")]
    EmptyName,

    /// Width or height is zero
    #[error("character {name:?} has invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Character name
        name: String,
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
    },

    /// A frame does not match the declared dimensions
    #[error("character {name:?} state {state:?} frame {frame}: {reason}")]
    MalformedFrame {
        /// Character name
        name: String,
        /// State name (`base` for the base frame)
        state: String,
        /// Frame index within the state
        frame: usize,
        /// What is wrong with it
        reason: String,
    },

    /// The declared color cannot be parsed
    #[error("character {name:?} has an invalid color: {source}")]
    InvalidColor {
        /// Character name
        name: String,
        /// Parse failure
        #[source]
        source: ColorError,
    },
}

/// One static snapshot of a character: fixed-width display lines
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Rows, top to bottom
    pub lines: Vec<String>,
}

impl Frame {
    /// Create a frame from any iterable of lines
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of rows
    #[must_use]
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Whether the frame has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn check(&self, width: usize, height: usize) -> Result<(), String> {
        if self.lines.len() != height {
            return Err(format!(
                "expected {height} lines, got {}",
                self.lines.len()
            ));
        }
        for (row, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(format!("line {row} is {len} wide, expected {width}"));
            }
        }
        Ok(())
    }
}

/// Read-only character data handed over by a provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDefinition {
    /// Character name
    pub name: String,
    /// Width in glyphs
    pub width: usize,
    /// Height in lines
    pub height: usize,
    /// Hex color (`#RRGGBB`), empty for uncolored
    pub color: String,
    /// Frame shown when no state frame is available
    pub base_frame: Frame,
    /// State name to ordered frames
    pub states: BTreeMap<String, Vec<Frame>>,
}

impl CharacterDefinition {
    /// Start a definition with a blank base frame
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            color: String::new(),
            base_frame: Frame::new(std::iter::repeat(" ".repeat(width)).take(height)),
            states: BTreeMap::new(),
        }
    }

    /// Set the hex color
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the base frame
    #[must_use]
    pub fn with_base_frame(mut self, frame: Frame) -> Self {
        self.base_frame = frame;
        self
    }

    /// Add (or replace) a state
    #[must_use]
    pub fn with_state(mut self, name: impl Into<String>, frames: Vec<Frame>) -> Self {
        self.states.insert(name.into(), frames);
        self
    }

    /// Check dimensions, frame shapes, and color
    ///
    /// # Errors
    ///
    /// Returns the first [`CharacterError`] found.
    pub fn validate(&self) -> Result<(), CharacterError> {
        if self.name.trim().is_empty() {
            return Err(CharacterError::EmptyName);
        }
        if self.width == 0 || self.height == 0 {
            return Err(CharacterError::InvalidDimensions {
                name: self.name.clone(),
                width: self.width,
                height: self.height,
            });
        }

        self.base_frame
            .check(self.width, self.height)
            .map_err(|reason| self.malformed("base", 0, reason))?;

        for (state, frames) in &self.states {
            for (index, frame) in frames.iter().enumerate() {
                frame
                    .check(self.width, self.height)
                    .map_err(|reason| self.malformed(state, index, reason))?;
            }
        }

        Rgb::parse_optional(&self.color).map_err(|source| CharacterError::InvalidColor {
            name: self.name.clone(),
            source,
        })?;

        Ok(())
    }

    fn malformed(&self, state: &str, frame: usize, reason: String) -> CharacterError {
        CharacterError::MalformedFrame {
            name: self.name.clone(),
            state: state.to_string(),
            frame,
            reason,
        }
    }
}

/// Source of character data
///
/// Implemented by [`CharacterRegistry`]; callers with their own storage
/// can implement it directly.
pub trait CharacterProvider: Send + Sync {
    /// Look up a character by name in the given namespace
    ///
    /// # Errors
    ///
    /// Returns [`CharacterError::NotFound`] if the name is unknown.
    fn load(&self, name: &str, kind: CharacterKind) -> Result<CharacterDefinition, CharacterError>;
}
