//! Character colors and 24-bit terminal markup
//!
//! Frames are handed to callers as ready-to-print lines. Color is encoded
//! with the truecolor SGR sequence `ESC[38;2;R;G;Bm ... ESC[0m`, either once
//! per line (cached frames) or once per glyph (gradient overlay).

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Escape sequence that resets all attributes
pub const RESET: &str = "\x1b[0m";

/// Errors from parsing a hex color
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    /// Wrong number of hex digits
    #[error("hex color {input:?} must have 6 digits (optionally prefixed with '#')")]
    InvalidLength {
        /// The rejected input
        input: String,
    },

    /// Non-hex characters present
    #[error("hex color {input:?} contains non-hex characters")]
    InvalidDigit {
        /// The rejected input
        input: String,
    },
}

/// An opaque RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl Rgb {
    /// Pure white, used when a character has no color of its own
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from components
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    ///
    /// # Examples
    ///
    /// ```
    /// use animator_core::color::Rgb;
    ///
    /// let silver = Rgb::parse("#C0C0C0").unwrap();
    /// assert_eq!(silver, Rgb::new(192, 192, 192));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] if the input is not six hex digits.
    pub fn parse(hex: &str) -> Result<Self, ColorError> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 {
            return Err(ColorError::InvalidLength {
                input: hex.to_string(),
            });
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit {
                input: hex.to_string(),
            });
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| ColorError::InvalidDigit {
            input: hex.to_string(),
        })?;

        let [_, r, g, b] = value.to_be_bytes();
        Ok(Self { r, g, b })
    }

    /// Parse a hex color, treating an empty string as "no color"
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] for non-empty input that is not a valid color.
    pub fn parse_optional(hex: &str) -> Result<Option<Self>, ColorError> {
        if hex.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(hex).map(Some)
    }

    /// Format as `#RRGGBB`
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Multiply every channel by `factor`, clamping to 0..=255
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        let channel = |c: u8| -> u8 {
            let scaled = (f64::from(c) * factor).clamp(0.0, 255.0);
            // Truncation matches integer conversion of the scaled value
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let out = scaled as u8;
            out
        };
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
        }
    }

    /// The opening SGR sequence for this foreground color
    #[must_use]
    pub fn fg_sequence(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Wrap a whole line in color markup
///
/// With no color the text is returned unchanged.
#[must_use]
pub fn colorize(text: &str, color: Option<Rgb>) -> String {
    match color {
        Some(c) => {
            let mut out = String::with_capacity(text.len() + 24);
            out.push_str(&c.fg_sequence());
            out.push_str(text);
            out.push_str(RESET);
            out
        }
        None => text.to_string(),
    }
}

/// Append a single glyph wrapped in its own color markup
pub fn push_colored_char(out: &mut String, ch: char, color: Rgb) {
    // Writing to a String cannot fail
    let _ = write!(out, "\x1b[38;2;{};{};{}m{}{}", color.r, color.g, color.b, ch, RESET);
}

/// Remove every `ESC ... m` sequence from a line
#[must_use]
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_escape = false;
    for ch in text.chars() {
        if ch == '\x1b' {
            in_escape = true;
            continue;
        }
        if in_escape {
            if ch == 'm' {
                in_escape = false;
            }
            continue;
        }
        out.push(ch);
    }
    out
}
