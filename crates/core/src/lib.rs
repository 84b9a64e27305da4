//! Deterministic map generation and pathfinding for a tile-based RPG.
//!
//! The same seed and options always produce byte-identical maps, so a
//! map never needs to be serialized: shipping the seed is enough.

pub mod mapgen;
pub mod pathfinding;
pub mod types;

pub use mapgen::{
    generate_map, MapGenerator, MapModel, MapOptions, RandomStream, WALKABLE_HEIGHT_MIN,
};
pub use pathfinding::PathfindingGrid;
pub use types::{CellKind, Difficulty, EnemyKind, EnemyTier, MapType, NpcKind, Pos, ShopKind};
