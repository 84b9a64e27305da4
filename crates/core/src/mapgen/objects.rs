//! Chest and obstacle placement over the finished terrain.

use crate::types::{CellKind, MapType, Pos};

use super::difficulty;
use super::grid::Grid;
use super::model::{Room, WALKABLE_HEIGHT_MIN};
use super::options::MapOptions;
use super::rng::RandomStream;

/// Converts a density and its multipliers into an exact count over the
/// eligible cells, then draws that many positions without replacement.
/// Chests are drawn first so obstacle placement cannot displace them.
pub(super) fn place_objects(
    heights: &Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    map_type: MapType,
    options: &MapOptions,
    rooms: &[Room],
) {
    let mut pool = eligible_cells(heights, cells, map_type, rooms);
    let eligible = pool.len();

    let chest_target = scaled_count(
        eligible,
        options.chest_density * chest_map_multiplier(map_type),
        difficulty::chest_multiplier(options.difficulty),
    );
    for _ in 0..chest_target.min(pool.len()) {
        let pos = draw(&mut pool, rng);
        cells.set(pos.x, pos.y, CellKind::Chest);
    }

    let obstacle_target = scaled_count(
        eligible,
        options.obstacle_density * obstacle_map_multiplier(map_type),
        difficulty::obstacle_multiplier(options.difficulty),
    );
    for _ in 0..obstacle_target.min(pool.len()) {
        let pos = draw(&mut pool, rng);
        cells.set(pos.x, pos.y, CellKind::Obstacle);
    }
}

/// Row-major scan of walkable floor cells, narrowed per map type. In
/// dungeons only interior room cells off the door's row and column qualify,
/// so corridors, doorways, and the lane from each door to its room's edge
/// ring never get blocked; in arenas the boss cell at the exact center
/// stays clear; in towns building footprints are off limits so shopkeepers
/// and doorways stay reachable.
fn eligible_cells(
    heights: &Grid<f64>,
    cells: &Grid<CellKind>,
    map_type: MapType,
    rooms: &[Room],
) -> Vec<Pos> {
    let center = Pos { x: cells.width() as i32 / 2, y: cells.height() as i32 / 2 };
    let mut eligible = Vec::new();
    for y in 0..cells.height() as i32 {
        for x in 0..cells.width() as i32 {
            let pos = Pos { x, y };
            if cells.at(x, y) != Some(CellKind::Floor) {
                continue;
            }
            if heights.at(x, y).is_none_or(|height| height < WALKABLE_HEIGHT_MIN) {
                continue;
            }
            let allowed = match map_type {
                MapType::Dungeon => rooms.iter().any(|room| room.blockable_interior(pos)),
                MapType::Arena => pos != center,
                MapType::Town => !rooms.iter().any(|room| room.contains(pos)),
                MapType::Field => true,
            };
            if allowed {
                eligible.push(pos);
            }
        }
    }
    eligible
}

fn scaled_count(eligible: usize, density: f64, difficulty_multiplier: f64) -> usize {
    (eligible as f64 * density * difficulty_multiplier) as usize
}

fn draw(pool: &mut Vec<Pos>, rng: &mut RandomStream) -> Pos {
    let index = rng.range_usize(0, pool.len() - 1);
    pool.swap_remove(index)
}

fn chest_map_multiplier(map_type: MapType) -> f64 {
    match map_type {
        MapType::Dungeon => 1.5,
        MapType::Field => 1.0,
        MapType::Arena => 0.5,
        MapType::Town => 0.1,
    }
}

fn obstacle_map_multiplier(map_type: MapType) -> f64 {
    match map_type {
        MapType::Dungeon => 0.7,
        MapType::Field => 1.3,
        MapType::Arena => 0.5,
        MapType::Town => 0.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;

    fn flat_field(width: usize, height: usize) -> (Grid<f64>, Grid<CellKind>) {
        (Grid::new(width, height, 0.5), Grid::new(width, height, CellKind::Floor))
    }

    #[test]
    fn realized_counts_match_the_density_formula() {
        let (heights, mut cells) = flat_field(40, 40);
        let options = MapOptions {
            chest_density: 0.02,
            obstacle_density: 0.03,
            difficulty: Difficulty::Normal,
            ..MapOptions::default()
        };
        let mut rng = RandomStream::new(99);
        place_objects(&heights, &mut cells, &mut rng, MapType::Field, &options, &[]);

        let chests = cells.cells().iter().filter(|&&kind| kind == CellKind::Chest).count();
        let obstacles = cells.cells().iter().filter(|&&kind| kind == CellKind::Obstacle).count();
        assert_eq!(chests, (1600.0 * 0.02) as usize);
        assert_eq!(obstacles, (1600.0 * 0.03 * 1.3) as usize);
    }

    #[test]
    fn hell_difficulty_places_more_of_both() {
        let count_for = |difficulty| {
            let (heights, mut cells) = flat_field(40, 40);
            let options = MapOptions { difficulty, ..MapOptions::default() };
            let mut rng = RandomStream::new(7);
            place_objects(&heights, &mut cells, &mut rng, MapType::Field, &options, &[]);
            cells
                .cells()
                .iter()
                .filter(|&&kind| kind == CellKind::Chest || kind == CellKind::Obstacle)
                .count()
        };
        assert!(count_for(Difficulty::Hell) > count_for(Difficulty::Normal));
    }

    #[test]
    fn dungeon_objects_land_only_inside_rooms() {
        let (heights, mut cells) = flat_field(30, 30);
        let room = Room {
            x: 5,
            y: 5,
            width: 10,
            height: 10,
            door: Pos { x: 10, y: 10 },
            is_shop: false,
        };
        let options = MapOptions { chest_density: 0.05, obstacle_density: 0.05, ..MapOptions::default() };
        let mut rng = RandomStream::new(3);
        place_objects(&heights, &mut cells, &mut rng, MapType::Dungeon, &options, &[room]);

        for y in 0..30 {
            for x in 0..30 {
                let kind = cells.at(x, y).unwrap();
                if kind == CellKind::Chest || kind == CellKind::Obstacle {
                    assert!(
                        room.blockable_interior(Pos { x, y }),
                        "object on a protected cell at {x},{y}"
                    );
                }
            }
        }
    }

    #[test]
    fn arena_center_stays_clear() {
        let (heights, mut cells) = flat_field(21, 21);
        let options = MapOptions {
            chest_density: 0.2,
            obstacle_density: 0.2,
            ..MapOptions::default()
        };
        let mut rng = RandomStream::new(11);
        place_objects(&heights, &mut cells, &mut rng, MapType::Arena, &options, &[]);
        assert_eq!(cells.at(10, 10), Some(CellKind::Floor));
    }
}
