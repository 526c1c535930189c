//! Three-phase activity curve
//!
//! Maps "ticks since the state was entered" to an activity count in
//! `0..=max_count`:
//!
//! ```text
//! count
//!   ^                         ___           ___
//!   |                       _/   \_       _/
//!   |              ___--''''       \_   _/
//!   |        __--''                  '-'
//!   |______-'
//!   +------|--------|--------------------------> frame
//!          15       40
//!   recognition  awakening      breathing
//! ```
//!
//! The function is pure in both arguments, so tests need no clock.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Last frame of the recognition phase (overlay off)
pub const RECOGNITION_END: usize = 15;

/// Last frame of the awakening ramp
pub const AWAKENING_END: usize = 40;

/// Frames per ramp step during awakening
pub const RAMP_STEP_FRAMES: usize = 3;

/// Ramp values walked through during awakening
pub const AWAKENING_RAMP: [usize; 8] = [0, 1, 1, 2, 3, 5, 8, 13];

/// Angular frequency of the breathing oscillation, radians per frame
pub const BREATHING_FREQUENCY: f64 = 0.15;

/// Breathing amplitude and baseline as a fraction of `max_count`
pub const BREATHING_FRACTION: f64 = 0.5;

/// Per-state overlay settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Maximum activity count
    pub count: usize,
    /// Ticks per gradient step (values below 1 act as 1)
    pub intensity: usize,
}

impl NoiseConfig {
    /// Create a config
    #[must_use]
    pub const fn new(count: usize, intensity: usize) -> Self {
        Self { count, intensity }
    }

    /// Intensity clamped to at least 1
    #[must_use]
    pub fn step_interval(&self) -> usize {
        self.intensity.max(1)
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self::new(8, 1)
    }
}

/// States that get the overlay on micro characters by default
pub const DEFAULT_MICRO_NOISE_STATES: &[&str] = &[
    "think",
    "read",
    "write",
    "search",
    "websearch",
    "webfetch",
    "arise",
    "approval",
];

/// Default per-state overlay table for micro characters
#[must_use]
pub fn default_micro_noise() -> HashMap<String, NoiseConfig> {
    DEFAULT_MICRO_NOISE_STATES
        .iter()
        .map(|s| ((*s).to_string(), NoiseConfig::default()))
        .collect()
}

/// Activity count for `frame_counter` ticks into a state
///
/// # Examples
///
/// ```
/// use animator_core::overlay::calculate_noise_count;
///
/// assert_eq!(calculate_noise_count(8, 10), 0); // still recognizing
/// assert_eq!(calculate_noise_count(8, 31), 5); // ramping up
/// assert!(calculate_noise_count(8, 100) <= 8); // breathing
/// ```
#[must_use]
pub fn calculate_noise_count(max_count: usize, frame_counter: usize) -> usize {
    if frame_counter <= RECOGNITION_END {
        return 0;
    }

    if frame_counter <= AWAKENING_END {
        let step = (frame_counter - RECOGNITION_END - 1) / RAMP_STEP_FRAMES;
        let value = AWAKENING_RAMP[step.min(AWAKENING_RAMP.len() - 1)];
        return value.min(max_count);
    }

    #[allow(clippy::cast_precision_loss)]
    let max = max_count as f64;
    #[allow(clippy::cast_precision_loss)]
    let t = (frame_counter - AWAKENING_END) as f64;

    let base = max * BREATHING_FRACTION;
    let amplitude = max * BREATHING_FRACTION;
    let value = (base + amplitude * (t * BREATHING_FREQUENCY).sin()).clamp(0.0, max);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = value.round() as usize;
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognition_phase_is_silent() {
        for f in 0..=RECOGNITION_END {
            assert_eq!(calculate_noise_count(13, f), 0, "frame {f}");
        }
    }

    #[test]
    fn test_awakening_steps_every_three_frames() {
        let got: Vec<usize> = (16..=40).map(|f| calculate_noise_count(13, f)).collect();
        let expected: Vec<usize> = vec![
            0, 0, 0, // 16-18
            1, 1, 1, // 19-21
            1, 1, 1, // 22-24
            2, 2, 2, // 25-27
            3, 3, 3, // 28-30
            5, 5, 5, // 31-33
            8, 8, 8, // 34-36
            13, 13, 13, // 37-39
            13, // 40
        ];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_awakening_capped_at_max() {
        assert_eq!(calculate_noise_count(4, 35), 4);
        assert_eq!(calculate_noise_count(0, 35), 0);
        for f in 16..=40 {
            let v = calculate_noise_count(100, f);
            assert!(AWAKENING_RAMP.contains(&v), "frame {f} gave {v}");
        }
    }

    #[test]
    fn test_breathing_stays_in_range() {
        for f in 41..2000 {
            let v = calculate_noise_count(8, f);
            assert!(v <= 8, "frame {f} gave {v}");
        }
    }

    #[test]
    fn test_breathing_peaks_and_troughs() {
        // t = 1 -> 4 + 4 * sin(0.15) ~= 4.6
        assert_eq!(calculate_noise_count(8, 41), 5);
        // sin reaches 1 near t = pi / 0.15 / 2 ~= 10.47
        assert_eq!(calculate_noise_count(8, 50), 8);
        // trough near t ~= 31.4
        assert_eq!(calculate_noise_count(8, 71), 0);
    }

    #[test]
    fn test_deterministic() {
        for f in [0, 16, 39, 41, 97, 1234] {
            assert_eq!(calculate_noise_count(6, f), calculate_noise_count(6, f));
        }
    }

    #[test]
    fn test_default_micro_table() {
        let table = default_micro_noise();
        assert_eq!(table.len(), DEFAULT_MICRO_NOISE_STATES.len());
        assert!(table.contains_key("write"));
        assert!(!table.contains_key("resting"));
        assert_eq!(NoiseConfig::new(3, 0).step_interval(), 1);
    }
}
