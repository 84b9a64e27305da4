//! Seeded coherent-noise sampling used for smooth height synthesis.

use noise::{NoiseFn, Perlin};

/// Wraps a seeded Perlin sampler with a configurable frequency so callers can
/// pass raw cell coordinates. Coherent samples keep neighboring cells close
/// in height, unlike per-cell independent randomness.
#[derive(Clone, Copy, Debug)]
pub struct NoiseField {
    perlin: Perlin,
    frequency: f64,
}

impl NoiseField {
    pub fn new(seed: u64, frequency: f64) -> Self {
        Self { perlin: Perlin::new(seed as u32), frequency }
    }

    /// Sample in `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x * self.frequency, y * self.frequency]).clamp(-1.0, 1.0)
    }

    /// Sample remapped to `[0, 1]`.
    pub fn sample01(&self, x: f64, y: f64) -> f64 {
        self.sample(x, y) * 0.5 + 0.5
    }

    /// Base octave blended with a 4x-frequency detail octave, in `[0, 1]`.
    pub fn blended01(&self, x: f64, y: f64) -> f64 {
        let base = self.sample01(x, y);
        let detail = self
            .perlin
            .get([x * self.frequency * 4.0, y * self.frequency * 4.0])
            .clamp(-1.0, 1.0)
            * 0.5
            + 0.5;
        (base * 0.7 + detail * 0.3).clamp(0.0, 1.0)
    }
}
