//! Noise sources for the randomized prediction fields.
//!
//! `failure_probability`, `predicted_utilization` and `late_return_probability`
//! each add a uniform perturbation. Threading the source explicitly keeps the
//! scoring functions pure: feed a [`FixedNoise`] or a seeded [`RandomNoise`]
//! and the output is reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait NoiseSource: Send {
    /// Draw a value in `[low, high]`.
    fn sample(&mut self, low: f64, high: f64) -> f64;
}

/// Uniform noise from a standard PRNG.
pub struct RandomNoise {
    rng: StdRng,
}

impl RandomNoise {
    /// Entropy-seeded: repeated calls with identical input give different output.
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl NoiseSource for RandomNoise {
    fn sample(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Always returns the same value, clamped into the requested range.
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn sample(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.0.clamp(low, high)
    }
}
