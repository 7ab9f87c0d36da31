//! Injectable randomness
//!
//! Every probabilistic branch of the night goes through `RandomSource`,
//! so a test can force a roll to succeed or fail.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

pub trait RandomSource {
    /// Uniform value in `[0, range)`
    fn roll(&mut self, range: f32) -> f32;

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.roll(1.0) < p
    }
}

/// Deterministic source seeded from a u64
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn roll(&mut self, range: f32) -> f32 {
        self.rng.gen::<f32>() * range
    }
}

/// Replays queued unit fractions, then repeats a fallback
///
/// A fraction of `0.0` makes every gated roll succeed; `0.999` makes
/// every gated roll fail.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    queue: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedRandom {
    pub fn always(fraction: f32) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback: fraction.clamp(0.0, 0.999),
        }
    }

    pub fn sequence(fractions: impl IntoIterator<Item = f32>, fallback: f32) -> Self {
        Self {
            queue: fractions
                .into_iter()
                .map(|f| f.clamp(0.0, 0.999))
                .collect(),
            fallback: fallback.clamp(0.0, 0.999),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn roll(&mut self, range: f32) -> f32 {
        self.queue.pop_front().unwrap_or(self.fallback) * range
    }
}
