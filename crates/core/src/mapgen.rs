//! Procedural map generation: dungeons, open fields, boss arenas, and
//! walled towns, all deterministic per seed.

pub mod model;
pub mod options;

mod arena;
mod difficulty;
mod entities;
mod generator;
mod grid;
mod noise_field;
mod npcs;
mod objects;
mod rng;
mod rooms;
mod terrain;
mod town;

pub use generator::MapGenerator;
pub use grid::Grid;
pub use model::{EnemySpawn, MapModel, NpcSpawn, Room, ShopItem, WALKABLE_HEIGHT_MIN};
pub use noise_field::NoiseField;
pub use options::MapOptions;
pub use rng::RandomStream;

use crate::types::MapType;

/// One-call convenience over [`MapGenerator`].
pub fn generate_map(map_type: MapType, options: &MapOptions) -> MapModel {
    MapGenerator::new(options.clone()).generate(map_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_matches_the_generator_it_wraps() {
        let options = MapOptions { seed: 777, ..MapOptions::default() };
        let from_helper = generate_map(MapType::Dungeon, &options);
        let from_generator = MapGenerator::new(options).generate(MapType::Dungeon);
        assert_eq!(from_helper, from_generator);
    }
}
