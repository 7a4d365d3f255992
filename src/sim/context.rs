//! Per-simulator mutable context
//!
//! Random source and time accumulator live here rather than in process-wide
//! state, so each effect instance can be reproduced from its seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::TICK_MS;

#[derive(Debug, Clone)]
pub struct SimContext {
    rng: Pcg32,
    /// Wave phase accumulator; monotonically increasing
    pub time: f64,
    /// Ticks simulated so far
    pub ticks: u64,
}

impl SimContext {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            ticks: 0,
        }
    }

    /// Simulation time in milliseconds
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.ticks as f64 * TICK_MS
    }

    /// Uniform in [0, 1)
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform in [min, max); `min` when the range is empty
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    /// Uniform index in [0, len)
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    /// Bernoulli trial
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0) as f64)
    }
}
