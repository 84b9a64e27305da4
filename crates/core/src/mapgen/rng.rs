//! Seeded pseudo-random stream consumed by a single generation run.

use std::f64::consts::TAU;

const MODULUS: u64 = 1 << 31;
const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;

/// Linear-congruential sequence. Same seed, same sequence, same map; every
/// component of a generation run draws from exactly one of these.
#[derive(Clone, Debug)]
pub struct RandomStream {
    state: u64,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self { state: seed % MODULUS }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (MULTIPLIER * self.state + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform integer in the inclusive range `[min, max]`.
    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        debug_assert!(min <= max);
        min + (self.next_f64() * (max - min + 1) as f64) as usize
    }

    /// Uniform integer in the inclusive range `[min, max]`.
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        min + (self.next_f64() * (max - min + 1) as f64) as i32
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    pub fn angle(&mut self) -> f64 {
        self.next_f64() * TAU
    }

    /// Uniform pick from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.range_usize(0, items.len() - 1)]
    }
}
