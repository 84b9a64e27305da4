//! Dungeon layout: room placement, corridor carving, and wall inference.

use crate::types::{CellKind, Pos};

use super::grid::Grid;
use super::model::Room;
use super::noise_field::NoiseField;
use super::options::MapOptions;
use super::rng::RandomStream;

/// Carves rooms and corridors into an all-wall grid, then derives heights
/// from the resulting cell kinds. Placement attempts are bounded at
/// `roomCount * 10`; running out of attempts yields fewer rooms, never an
/// error.
pub(super) fn generate_dungeon(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    noise: &NoiseField,
    options: &MapOptions,
) -> Vec<Room> {
    let rooms = place_rooms(cells, rng, options);

    for room in &rooms {
        carve_room(cells, room);
    }
    for pair in rooms.windows(2) {
        carve_l_corridor(cells, rng, pair[0].center(), pair[1].center());
    }

    // loop connections keep the topology from being a pure tree
    let loop_count = (options.room_count as f64 * 0.3) as usize;
    if rooms.len() >= 2 {
        for _ in 0..loop_count {
            let a = rng.range_usize(0, rooms.len() - 1);
            let b = rng.range_usize(0, rooms.len() - 1);
            if a != b {
                carve_l_corridor(cells, rng, rooms[a].center(), rooms[b].center());
            }
        }
    }

    mark_boundary_walls(cells);
    assign_heights(heights, cells, noise);
    rooms
}

fn place_rooms(cells: &Grid<CellKind>, rng: &mut RandomStream, options: &MapOptions) -> Vec<Room> {
    let width = cells.width();
    let height = cells.height();
    let mut rooms: Vec<Room> = Vec::with_capacity(options.room_count);

    for _ in 0..options.room_count * 10 {
        if rooms.len() >= options.room_count {
            break;
        }
        let room_width = rng.range_usize(options.room_min_size, options.room_max_size);
        let room_height = rng.range_usize(options.room_min_size, options.room_max_size);
        if room_width + 2 >= width || room_height + 2 >= height {
            continue;
        }

        let x = rng.range_usize(1, width - room_width - 1);
        let y = rng.range_usize(1, height - room_height - 1);
        let mut candidate =
            Room { x, y, width: room_width, height: room_height, door: Pos { x: 0, y: 0 }, is_shop: false };
        candidate.door = candidate.center();
        if rooms.iter().any(|existing| existing.intersects_padded(&candidate, 1)) {
            continue;
        }
        rooms.push(candidate);
    }

    rooms
}

fn carve_room(cells: &mut Grid<CellKind>, room: &Room) {
    for y in room.y..=room.bottom() {
        for x in room.x..=room.right() {
            cells.set(x as i32, y as i32, CellKind::Floor);
        }
    }
}

/// Horizontal-then-vertical or the reverse, chosen at random.
pub(super) fn carve_l_corridor(
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    start: Pos,
    end: Pos,
) {
    if rng.chance(0.5) {
        carve_horizontal(cells, start.y, start.x, end.x);
        carve_vertical(cells, end.x, start.y, end.y);
    } else {
        carve_vertical(cells, start.x, start.y, end.y);
        carve_horizontal(cells, end.y, start.x, end.x);
    }
}

fn carve_horizontal(cells: &mut Grid<CellKind>, y: i32, from_x: i32, to_x: i32) {
    for x in from_x.min(to_x)..=from_x.max(to_x) {
        cells.set(x, y, CellKind::Floor);
        flank_with_wall(cells, x, y - 1);
        flank_with_wall(cells, x, y + 1);
    }
}

fn carve_vertical(cells: &mut Grid<CellKind>, x: i32, from_y: i32, to_y: i32) {
    for y in from_y.min(to_y)..=from_y.max(to_y) {
        cells.set(x, y, CellKind::Floor);
        flank_with_wall(cells, x - 1, y);
        flank_with_wall(cells, x + 1, y);
    }
}

fn flank_with_wall(cells: &mut Grid<CellKind>, x: i32, y: i32) {
    if cells.at(x, y).is_some_and(|kind| kind != CellKind::Floor) {
        cells.set(x, y, CellKind::Wall);
    }
}

/// Every non-floor cell 8-adjacent to a floor cell becomes a wall.
fn mark_boundary_walls(cells: &mut Grid<CellKind>) {
    for y in 0..cells.height() as i32 {
        for x in 0..cells.width() as i32 {
            if cells.at(x, y) == Some(CellKind::Floor) {
                continue;
            }
            let touches_floor = (-1..=1).any(|dy| {
                (-1..=1).any(|dx| {
                    (dx != 0 || dy != 0) && cells.at(x + dx, y + dy) == Some(CellKind::Floor)
                })
            });
            if touches_floor {
                cells.set(x, y, CellKind::Wall);
            }
        }
    }
}

/// Floor and corridor cells sit near 0.4, walls near 0.8, both jittered by
/// coherent noise so adjacent cells stay visually smooth.
fn assign_heights(heights: &mut Grid<f64>, cells: &Grid<CellKind>, noise: &NoiseField) {
    for y in 0..cells.height() as i32 {
        for x in 0..cells.width() as i32 {
            let jitter = noise.sample(x as f64, y as f64);
            let height = match cells.at(x, y) {
                Some(CellKind::Floor) => 0.4 + jitter * 0.1,
                _ => 0.8 + jitter * 0.2,
            };
            heights.set(x, y, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dungeon_fixture(seed: u64) -> (Grid<f64>, Grid<CellKind>, Vec<Room>) {
        let options =
            MapOptions { width: 40, height: 30, seed, room_count: 6, ..MapOptions::default() };
        let mut heights = Grid::new(options.width, options.height, 0.0);
        let mut cells = Grid::new(options.width, options.height, CellKind::Wall);
        let mut rng = RandomStream::new(seed);
        let noise = NoiseField::new(seed, options.noise_scale);
        let rooms = generate_dungeon(&mut heights, &mut cells, &mut rng, &noise, &options);
        (heights, cells, rooms)
    }

    #[test]
    fn rooms_never_overlap_even_with_padding() {
        for seed in [1_u64, 7, 42, 999, 31_337] {
            let (_, _, rooms) = dungeon_fixture(seed);
            assert!(rooms.len() >= 2, "expected multiple rooms for seed {seed}");
            for left in 0..rooms.len() {
                for right in (left + 1)..rooms.len() {
                    assert!(
                        !rooms[left].intersects_padded(&rooms[right], 1),
                        "rooms must not overlap or touch: {:?} vs {:?}",
                        rooms[left],
                        rooms[right]
                    );
                }
            }
        }
    }

    #[test]
    fn floor_heights_stay_walkable_and_wall_heights_stay_high() {
        let (heights, cells, _) = dungeon_fixture(42);
        for y in 0..cells.height() as i32 {
            for x in 0..cells.width() as i32 {
                let height = heights.at(x, y).unwrap();
                match cells.at(x, y).unwrap() {
                    CellKind::Floor => {
                        assert!((0.3..=0.5).contains(&height), "floor height {height} at {x},{y}")
                    }
                    _ => assert!((0.6..=1.0).contains(&height), "wall height {height} at {x},{y}"),
                }
            }
        }
    }

    #[test]
    fn every_room_center_is_carved_floor() {
        let (_, cells, rooms) = dungeon_fixture(7);
        for room in &rooms {
            let center = room.center();
            assert_eq!(cells.at(center.x, center.y), Some(CellKind::Floor));
        }
    }

    #[test]
    fn non_floor_cells_next_to_floor_are_walls() {
        let (_, cells, _) = dungeon_fixture(42);
        for y in 0..cells.height() as i32 {
            for x in 0..cells.width() as i32 {
                if cells.at(x, y) != Some(CellKind::Floor) {
                    continue;
                }
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if let Some(kind) = cells.at(x + dx, y + dy) {
                            assert!(kind == CellKind::Floor || kind == CellKind::Wall);
                        }
                    }
                }
            }
        }
    }
}
