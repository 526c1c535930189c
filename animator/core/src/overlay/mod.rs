//! Procedural liveliness overlay
//!
//! Two pure functions layered over cached frames without touching the
//! cache:
//!
//! - [`calculate_noise_count`]: phased activity curve (recognition,
//!   awakening, breathing) driven by ticks-in-state
//! - [`apply_shifting_gradient`]: per-column brightness pattern that
//!   sweeps across the glyphs one column per step
//!
//! [`render_overlay`] combines them the way the controller uses them: the
//! activity count says how many of the state's [`NoiseSlots`] are lit, and
//! only those cells get the gradient.

mod gradient;
mod noise;
mod slots;

pub use gradient::{apply_shifting_gradient, apply_shifting_gradient_at, BRIGHTNESS_LEVELS};
pub use noise::{
    calculate_noise_count, default_micro_noise, NoiseConfig, AWAKENING_END, AWAKENING_RAMP,
    BREATHING_FREQUENCY, DEFAULT_MICRO_NOISE_STATES, RECOGNITION_END,
};
pub use slots::NoiseSlots;

use crate::character::Frame;
use crate::color::Rgb;

/// Overlay a frame for a state with overlay settings
///
/// Lights the first `calculate_noise_count(..)` of `slots`. Returns `None`
/// while nothing is lit, meaning the cached colored frame should be shown
/// as is.
#[must_use]
pub fn render_overlay(
    raw: &Frame,
    config: &NoiseConfig,
    frame_count: usize,
    color: Option<Rgb>,
    slots: &NoiseSlots,
) -> Option<Frame> {
    let lit = slots.active(calculate_noise_count(config.count, frame_count));
    if lit.is_empty() {
        return None;
    }
    let step = frame_count / config.step_interval();
    Some(apply_shifting_gradient_at(
        raw,
        step,
        color.unwrap_or(Rgb::WHITE),
        lit,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: Rgb = Rgb::new(100, 100, 100);

    fn all_cells(width: usize) -> NoiseSlots {
        NoiseSlots::from_cells((0..width).map(|c| (0, c)).collect())
    }

    fn segments(line: &str) -> Vec<&str> {
        line.split("\x1b[0m").filter(|s| !s.is_empty()).collect()
    }

    #[test]
    fn test_overlay_off_during_recognition() {
        let frame = Frame::new(["ab"]);
        let out = render_overlay(&frame, &NoiseConfig::default(), 3, None, &all_cells(2));
        assert!(out.is_none());
    }

    #[test]
    fn test_overlay_on_when_awake() {
        let frame = Frame::new(["ab"]);
        let out = render_overlay(&frame, &NoiseConfig::default(), 60, Some(GRAY), &all_cells(2))
            .unwrap();
        assert_eq!(out.lines.len(), 1);
        assert!(out.lines[0].contains("\x1b[38;2;"));
    }

    #[test]
    fn test_zero_count_never_overlays() {
        let frame = Frame::new(["ab"]);
        let cfg = NoiseConfig::new(0, 1);
        for f in 0..200 {
            assert!(render_overlay(&frame, &cfg, f, None, &all_cells(2)).is_none());
        }
    }

    #[test]
    fn test_no_slots_never_overlays() {
        let frame = Frame::new(["ab"]);
        for f in 0..200 {
            let none = NoiseSlots::default();
            assert!(render_overlay(&frame, &NoiseConfig::default(), f, None, &none).is_none());
        }
    }

    #[test]
    fn test_intensity_slows_the_sweep() {
        let frame = Frame::new(["abcd"]);
        let cfg = NoiseConfig::new(8, 4);
        let a = render_overlay(&frame, &cfg, 48, None, &all_cells(4)).unwrap();
        let b = render_overlay(&frame, &cfg, 49, None, &all_cells(4)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_recolored_glyphs_follow_activity() {
        // step stays 0, so column 5 sits at brightness 1.00 and is left out
        let frame = Frame::new(["abcdefgh"]);
        let slots = NoiseSlots::from_cells(vec![
            (0, 3),
            (0, 0),
            (0, 7),
            (0, 1),
            (0, 6),
            (0, 2),
            (0, 4),
        ]);
        let cfg = NoiseConfig::new(7, 1000);
        let base = crate::color::colorize("x", Some(GRAY));
        let base_seq = base.trim_end_matches("\x1b[0m").trim_end_matches('x');

        let mut seen = std::collections::BTreeSet::new();
        for f in 0..300 {
            let activity = calculate_noise_count(7, f);
            match render_overlay(&frame, &cfg, f, Some(GRAY), &slots) {
                None => assert_eq!(activity, 0, "frame {f}"),
                Some(out) => {
                    let recolored = segments(&out.lines[0])
                        .iter()
                        .filter(|s| !s.starts_with(base_seq))
                        .count();
                    assert_eq!(recolored, activity, "frame {f}");
                    seen.insert(activity);
                }
            }
        }
        // the ramp and the breathing both show up as different amounts
        assert!(seen.contains(&1) && seen.contains(&3) && seen.contains(&7));
    }
}
