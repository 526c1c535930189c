//! Shifting brightness gradient
//!
//! Each column gets a brightness level from [`BRIGHTNESS_LEVELS`]; column
//! `c` at step `f` uses level `(c + f) % N`. Advancing `f` by one moves the
//! whole pattern by one column, giving a marquee sweep that is independent
//! of the sprite's own animation.

use crate::character::Frame;
use crate::color::{push_colored_char, Rgb};

/// Brightness multipliers, darkest to brightest
pub const BRIGHTNESS_LEVELS: [f64; 8] = [0.25, 0.40, 0.55, 0.70, 0.85, 1.00, 1.15, 1.30];

/// Recolor a raw frame with the gradient at `frame_counter`
///
/// `frame` must not contain markup. Spaces pass through uncolored.
///
/// # Examples
///
/// ```
/// use animator_core::character::Frame;
/// use animator_core::color::Rgb;
/// use animator_core::overlay::{apply_shifting_gradient, BRIGHTNESS_LEVELS};
///
/// let frame = Frame::new(["▐▛█▜▌"]);
/// let base = Rgb::new(200, 100, 50);
/// let n = BRIGHTNESS_LEVELS.len();
/// assert_eq!(
///     apply_shifting_gradient(&frame, 3, base),
///     apply_shifting_gradient(&frame, 3 + n, base),
/// );
/// ```
#[must_use]
pub fn apply_shifting_gradient(frame: &Frame, frame_counter: usize, base: Rgb) -> Frame {
    recolor(frame, frame_counter, base, |_, _| true)
}

/// Like [`apply_shifting_gradient`], but only for the `(row, col)` cells in
/// `cells`; every other glyph keeps the base color
#[must_use]
pub fn apply_shifting_gradient_at(
    frame: &Frame,
    frame_counter: usize,
    base: Rgb,
    cells: &[(usize, usize)],
) -> Frame {
    recolor(frame, frame_counter, base, |row, col| {
        cells.contains(&(row, col))
    })
}

fn recolor<F>(frame: &Frame, frame_counter: usize, base: Rgb, lit: F) -> Frame
where
    F: Fn(usize, usize) -> bool,
{
    let n = BRIGHTNESS_LEVELS.len();
    let shift = frame_counter % n;

    let lines = frame
        .lines
        .iter()
        .enumerate()
        .map(|(row, line)| {
            let mut out = String::with_capacity(line.len() * 20);
            for (col, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    out.push(ch);
                    continue;
                }
                let color = if lit(row, col) {
                    base.scale(BRIGHTNESS_LEVELS[(col % n + shift) % n])
                } else {
                    base
                };
                push_colored_char(&mut out, ch, color);
            }
            out
        })
        .collect();

    Frame { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::strip_markup;

    const BASE: Rgb = Rgb::new(200, 100, 40);

    fn colors_of(line: &str) -> Vec<String> {
        line.split("\x1b[0m")
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_period_equals_table_length() {
        let frame = Frame::new(["▐▛███▜▌ ▗▖", "▝▘ ▀▀▀ ▝▘ "]);
        let n = BRIGHTNESS_LEVELS.len();
        for f in 0..20 {
            assert_eq!(
                apply_shifting_gradient(&frame, f, BASE),
                apply_shifting_gradient(&frame, f + n, BASE),
                "f = {f}"
            );
        }
    }

    #[test]
    fn test_glyphs_survive() {
        let frame = Frame::new(["▐▛ ▜▌"]);
        let out = apply_shifting_gradient(&frame, 5, BASE);
        assert_eq!(strip_markup(&out.lines[0]), "▐▛ ▜▌");
    }

    #[test]
    fn test_column_levels() {
        let frame = Frame::new(["ab"]);
        let out = apply_shifting_gradient(&frame, 0, BASE);
        let parts = colors_of(&out.lines[0]);
        // column 0 -> 0.25, column 1 -> 0.40
        assert_eq!(parts[0], "\x1b[38;2;50;25;10ma");
        assert_eq!(parts[1], "\x1b[38;2;80;40;16mb");
    }

    #[test]
    fn test_pattern_moves_one_column_per_step() {
        let frame = Frame::new(["abcdefgh"]);
        let at0 = colors_of(&apply_shifting_gradient(&frame, 0, BASE).lines[0]);
        let at1 = colors_of(&apply_shifting_gradient(&frame, 1, BASE).lines[0]);
        // column c at step 1 has the color column c + 1 had at step 0
        for c in 0..7 {
            let color0 = at0[c + 1].trim_end_matches(|ch: char| ch.is_alphabetic());
            let color1 = at1[c].trim_end_matches(|ch: char| ch.is_alphabetic());
            assert_eq!(color0, color1, "column {c}");
        }
    }

    #[test]
    fn test_brightest_level_clamps() {
        let frame = Frame::new(["abcdefgh"]);
        let out = apply_shifting_gradient(&frame, 0, Rgb::new(250, 250, 250));
        let parts = colors_of(&out.lines[0]);
        // column 7 -> 1.30 -> clamped
        assert_eq!(parts[7], "\x1b[38;2;255;255;255mh");
    }

    #[test]
    fn test_unlit_cells_keep_base_color() {
        let frame = Frame::new(["abc", "def"]);
        let out = apply_shifting_gradient_at(&frame, 0, BASE, &[(1, 2)]);
        let full = apply_shifting_gradient(&frame, 0, BASE);

        let base_a = colors_of(&crate::color::colorize("a", Some(BASE)))[0].clone();
        assert_eq!(colors_of(&out.lines[0])[0], base_a);
        assert_eq!(colors_of(&out.lines[1])[2], colors_of(&full.lines[1])[2]);
        assert_eq!(strip_markup(&out.lines[1]), "def");
    }

    #[test]
    fn test_spaces_stay_plain() {
        let frame = Frame::new(["  "]);
        let out = apply_shifting_gradient(&frame, 2, BASE);
        assert_eq!(out.lines[0], "  ");
    }
}
