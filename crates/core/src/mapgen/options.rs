//! Tuning knobs accepted by `generateMap`.

use serde::{Deserialize, Serialize};

use crate::types::Difficulty;

/// All densities are per-candidate-cell probabilities before difficulty and
/// per-map-type multipliers apply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub tile_size: u32,
    pub noise_scale: f64,
    pub room_min_size: usize,
    pub room_max_size: usize,
    pub room_count: usize,
    pub enemy_density: f64,
    pub chest_density: f64,
    pub obstacle_density: f64,
    pub wall_density: f64,
    pub npc_density: f64,
    pub difficulty: Difficulty,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            seed: 0,
            tile_size: 32,
            noise_scale: 0.1,
            room_min_size: 4,
            room_max_size: 8,
            room_count: 8,
            enemy_density: 0.02,
            chest_density: 0.01,
            obstacle_density: 0.02,
            wall_density: 0.01,
            npc_density: 0.01,
            difficulty: Difficulty::Normal,
        }
    }
}

impl MapOptions {
    /// Degenerate inputs degrade instead of failing: tiny grids are clamped
    /// and inverted room size bounds are swapped.
    pub(super) fn normalized(&self) -> Self {
        let mut options = self.clone();
        options.width = options.width.max(8);
        options.height = options.height.max(8);
        if options.room_min_size > options.room_max_size {
            std::mem::swap(&mut options.room_min_size, &mut options.room_max_size);
        }
        options.room_min_size = options.room_min_size.max(2);
        options.room_max_size = options.room_max_size.max(2);
        options
    }
}
