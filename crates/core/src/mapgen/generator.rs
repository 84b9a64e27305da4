//! The generation pipeline: terrain shape, then objects, then enemies, then
//! NPCs, all fed from one seeded stream so a seed fully determines the map.

use crate::types::{CellKind, MapType};

use super::arena;
use super::entities::{self, EnemyContext};
use super::grid::Grid;
use super::model::MapModel;
use super::noise_field::NoiseField;
use super::npcs;
use super::objects;
use super::options::MapOptions;
use super::rng::RandomStream;
use super::rooms;
use super::terrain;
use super::town;

pub struct MapGenerator {
    options: MapOptions,
}

impl MapGenerator {
    pub fn new(options: MapOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Builds a complete map of the requested type. Infallible: degenerate
    /// options are normalized and placement that cannot be satisfied
    /// degrades to fewer features.
    pub fn generate(&self, map_type: MapType) -> MapModel {
        let options = self.options.normalized();
        let mut rng = RandomStream::new(options.seed);
        let noise = NoiseField::new(options.seed, options.noise_scale);

        let base = match map_type {
            MapType::Dungeon | MapType::Arena => CellKind::Wall,
            MapType::Field | MapType::Town => CellKind::Floor,
        };
        let mut heights = Grid::new(options.width, options.height, 0.0);
        let mut cells = Grid::new(options.width, options.height, base);

        let rooms = match map_type {
            MapType::Dungeon => {
                rooms::generate_dungeon(&mut heights, &mut cells, &mut rng, &noise, &options)
            }
            MapType::Field => {
                terrain::generate_field(&mut heights, &mut cells, &mut rng, &noise, &options);
                Vec::new()
            }
            MapType::Arena => {
                arena::generate_arena(&mut heights, &mut cells, &mut rng, &options);
                Vec::new()
            }
            MapType::Town => {
                town::generate_town(&mut heights, &mut cells, &mut rng, &noise, &options)
            }
        };

        objects::place_objects(&heights, &mut cells, &mut rng, map_type, &options, &rooms);

        let enemy_spawns = {
            let context =
                EnemyContext { cells: &cells, heights: &heights, map_type, options: &options };
            entities::place_enemies(&context, &mut rng)
        };

        let npc_spawns = if map_type == MapType::Town {
            npcs::place_npcs(&cells, &heights, &mut rng, &rooms, &options)
        } else {
            Vec::new()
        };

        MapModel {
            width: options.width,
            height: options.height,
            tile_size: options.tile_size,
            height_map: heights,
            placement: cells,
            rooms,
            enemy_spawns,
            npc_spawns,
            map_type,
            difficulty: options.difficulty,
        }
    }
}
