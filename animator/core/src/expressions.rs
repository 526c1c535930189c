//! Idle filler phrases
//!
//! While an agent has nothing to report, the caller can show a short
//! filler phrase next to the character. [`ExpressionCycler`] rotates
//! through a phrase list at a fixed pace. Time is passed in explicitly so
//! the rotation is testable without a clock.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Built-in filler phrases
pub const DEFAULT_IDLE_EXPRESSIONS: &[&str] = &[
    "hmm...",
    "uhh...",
    "well...",
    "let me think...",
    "pondering...",
    "...",
    "ah...",
    "okay...",
    "right...",
    "so...",
    "um...",
    "erm...",
    "hm.",
    "thinking...",
    "processing...",
    "considering...",
    "wait...",
    "one moment...",
    "let's see...",
    "now then...",
    "alright...",
    "mhm...",
    "indeed...",
    "interesting...",
    "curious...",
];

/// How long one phrase stays up
pub const EXPRESSION_CHANGE_INTERVAL: Duration = Duration::from_secs(2);

/// Random phrase rotation with a minimum dwell time
#[derive(Debug)]
pub struct ExpressionCycler {
    phrases: Vec<String>,
    interval: Duration,
    rng: StdRng,
    current: usize,
    changed_at: Option<Instant>,
}

impl ExpressionCycler {
    /// Cycler over [`DEFAULT_IDLE_EXPRESSIONS`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_phrases(DEFAULT_IDLE_EXPRESSIONS.iter().copied())
    }

    /// Cycler over a custom phrase list
    pub fn with_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
            interval: EXPRESSION_CHANGE_INTERVAL,
            rng: StdRng::from_entropy(),
            current: 0,
            changed_at: None,
        }
    }

    /// Use a deterministic random sequence
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Change the dwell time
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Phrase to show at `now`
    ///
    /// The first call picks a phrase; later calls switch to a different one
    /// once the interval has elapsed. Returns `""` for an empty list.
    pub fn current_at(&mut self, now: Instant) -> &str {
        if self.phrases.is_empty() {
            return "";
        }

        match self.changed_at {
            None => {
                self.current = self.rng.gen_range(0..self.phrases.len());
                self.changed_at = Some(now);
            }
            Some(at) if now.saturating_duration_since(at) >= self.interval => {
                self.current = self.next_index();
                self.changed_at = Some(now);
            }
            Some(_) => {}
        }

        &self.phrases[self.current]
    }

    /// Phrase to show right now
    pub fn current(&mut self) -> &str {
        self.current_at(Instant::now())
    }

    /// Forget the current phrase so the next call picks afresh
    pub fn reset(&mut self) {
        self.changed_at = None;
    }

    fn next_index(&mut self) -> usize {
        let len = self.phrases.len();
        if len < 2 {
            return 0;
        }
        let next = self.rng.gen_range(0..len - 1);
        if next >= self.current {
            next + 1
        } else {
            next
        }
    }
}

impl Default for ExpressionCycler {
    fn default() -> Self {
        Self::new()
    }
}
