//! Walled settlement: ring wall with gates, central plaza, buildings with
//! doors, and roads tying every door to the plaza.

use crate::types::{CellKind, Pos};

use super::grid::Grid;
use super::model::Room;
use super::noise_field::NoiseField;
use super::options::MapOptions;
use super::rng::RandomStream;

const FURNITURE_CHANCE: f64 = 0.05;
const GROUND_HEIGHT: f64 = 0.45;
const ROAD_HEIGHT: f64 = 0.4;
const BUILDING_WALL_HEIGHT: f64 = 0.85;
const RING_WALL_HEIGHT: f64 = 0.9;

pub(super) fn generate_town(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    noise: &NoiseField,
    options: &MapOptions,
) -> Vec<Room> {
    let width = cells.width() as i32;
    let height = cells.height() as i32;
    let center = Pos { x: width / 2, y: height / 2 };
    let wall_radius = 0.45 * width.min(height) as f64;
    let plaza_radius = 4.0_f64.max(width.min(height) as f64 * 0.08);

    lay_ground(heights, cells, noise);

    let buildings = place_buildings(cells, rng, options, center, wall_radius, plaza_radius);
    for building in &buildings {
        carve_building(heights, cells, rng, building);
    }

    carve_plaza(heights, cells, center, plaza_radius);
    carve_roads(heights, cells, rng, &buildings, center);
    raise_ring_wall(heights, cells, center, wall_radius);
    place_fountain(cells, center, &buildings);
    scatter_clutter(cells, rng, &buildings);

    buildings
}

fn lay_ground(heights: &mut Grid<f64>, cells: &mut Grid<CellKind>, noise: &NoiseField) {
    for y in 0..cells.height() as i32 {
        for x in 0..cells.width() as i32 {
            cells.set(x, y, CellKind::Floor);
            heights.set(x, y, GROUND_HEIGHT + noise.sample(x as f64, y as f64) * 0.05);
        }
    }
}

/// Buildings sit between the plaza and the ring wall at random polar
/// positions. The first three accepted become shops.
fn place_buildings(
    cells: &Grid<CellKind>,
    rng: &mut RandomStream,
    options: &MapOptions,
    center: Pos,
    wall_radius: f64,
    plaza_radius: f64,
) -> Vec<Room> {
    let width = cells.width() as i32;
    let height = cells.height() as i32;
    let target = rng.range_usize(5, 14);
    let mut buildings: Vec<Room> = Vec::with_capacity(target);

    for _ in 0..target * 10 {
        if buildings.len() >= target {
            break;
        }
        let building_width = rng.range_usize(options.room_min_size, options.room_max_size);
        let building_height = rng.range_usize(options.room_min_size, options.room_max_size);
        let footprint = building_width.max(building_height) as f64;
        let max_distance = wall_radius - footprint - 2.0;
        if max_distance <= plaza_radius + 2.0 {
            continue;
        }

        let angle = rng.angle();
        let distance = rng.range_f64(plaza_radius + 2.0, max_distance);
        let x = center.x + (angle.cos() * distance).round() as i32 - building_width as i32 / 2;
        let y = center.y + (angle.sin() * distance).round() as i32 - building_height as i32 / 2;
        if x < 1
            || y < 1
            || x + building_width as i32 >= width - 1
            || y + building_height as i32 >= height - 1
        {
            continue;
        }

        let mut candidate = Room {
            x: x as usize,
            y: y as usize,
            width: building_width,
            height: building_height,
            door: Pos { x: 0, y: 0 },
            is_shop: buildings.len() < 3,
        };
        candidate.door = pick_door(rng, &candidate);
        if buildings.iter().any(|existing| existing.intersects_padded(&candidate, 1)) {
            continue;
        }
        buildings.push(candidate);
    }

    buildings
}

/// A door sits on a random side at a non-corner position. Degenerate
/// buildings too small for a non-corner door fall back to the center.
fn pick_door(rng: &mut RandomStream, building: &Room) -> Pos {
    if building.width < 3 || building.height < 3 {
        return building.center();
    }
    let side = rng.range_usize(0, 3);
    let along_x = rng.range_usize(building.x + 1, building.right() - 1) as i32;
    let along_y = rng.range_usize(building.y + 1, building.bottom() - 1) as i32;
    match side {
        0 => Pos { x: along_x, y: building.y as i32 },
        1 => Pos { x: building.right() as i32, y: along_y },
        2 => Pos { x: along_x, y: building.bottom() as i32 },
        _ => Pos { x: building.x as i32, y: along_y },
    }
}

fn carve_building(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    building: &Room,
) {
    let center = building.center();
    for y in building.y..=building.bottom() {
        for x in building.x..=building.right() {
            let on_edge = x == building.x
                || x == building.right()
                || y == building.y
                || y == building.bottom();
            if on_edge {
                cells.set(x as i32, y as i32, CellKind::Wall);
                heights.set(x as i32, y as i32, BUILDING_WALL_HEIGHT);
            } else {
                let pos = Pos { x: x as i32, y: y as i32 };
                // the center stays clear for a shopkeeper or resident
                let furniture = pos != center && rng.chance(FURNITURE_CHANCE);
                let kind = if furniture { CellKind::Obstacle } else { CellKind::Floor };
                cells.set(pos.x, pos.y, kind);
                heights.set(pos.x, pos.y, GROUND_HEIGHT);
            }
        }
    }
    cells.set(building.door.x, building.door.y, CellKind::Floor);
    heights.set(building.door.x, building.door.y, GROUND_HEIGHT);
}

fn carve_plaza(heights: &mut Grid<f64>, cells: &mut Grid<CellKind>, center: Pos, radius: f64) {
    let reach = radius.ceil() as i32;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let pos = Pos { x: center.x + dx, y: center.y + dy };
            if pos.euclidean(center) <= radius && cells.in_bounds(pos.x, pos.y) {
                cells.set(pos.x, pos.y, CellKind::Floor);
                heights.set(pos.x, pos.y, GROUND_HEIGHT);
            }
        }
    }
}

/// One road per building from its doorstep to the plaza, plus a few random
/// door-to-door connections. Roads never cut through building walls.
fn carve_roads(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    buildings: &[Room],
    center: Pos,
) {
    for building in buildings {
        carve_road(heights, cells, rng, doorstep(building), center);
    }
    if buildings.len() >= 2 {
        for _ in 0..buildings.len() / 2 {
            let a = rng.range_usize(0, buildings.len() - 1);
            let b = rng.range_usize(0, buildings.len() - 1);
            if a != b {
                carve_road(heights, cells, rng, doorstep(&buildings[a]), doorstep(&buildings[b]));
            }
        }
    }
}

/// The cell one step outward from the door, past the building wall.
fn doorstep(building: &Room) -> Pos {
    let door = building.door;
    if door.y == building.y as i32 {
        Pos { x: door.x, y: door.y - 1 }
    } else if door.y == building.bottom() as i32 {
        Pos { x: door.x, y: door.y + 1 }
    } else if door.x == building.x as i32 {
        Pos { x: door.x - 1, y: door.y }
    } else {
        Pos { x: door.x + 1, y: door.y }
    }
}

/// L-shaped road, 1-2 cells wide, horizontal-first or vertical-first at
/// random.
fn carve_road(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    start: Pos,
    end: Pos,
) {
    let road_width = rng.range_i32(1, 2);
    if rng.chance(0.5) {
        pave_horizontal(heights, cells, start.y, start.x, end.x, road_width);
        pave_vertical(heights, cells, end.x, start.y, end.y, road_width);
    } else {
        pave_vertical(heights, cells, start.x, start.y, end.y, road_width);
        pave_horizontal(heights, cells, end.y, start.x, end.x, road_width);
    }
}

fn pave_horizontal(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    y: i32,
    from_x: i32,
    to_x: i32,
    road_width: i32,
) {
    for x in from_x.min(to_x)..=from_x.max(to_x) {
        for offset in 0..road_width {
            pave_cell(heights, cells, x, y + offset);
        }
    }
}

fn pave_vertical(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    x: i32,
    from_y: i32,
    to_y: i32,
    road_width: i32,
) {
    for y in from_y.min(to_y)..=from_y.max(to_y) {
        for offset in 0..road_width {
            pave_cell(heights, cells, x + offset, y);
        }
    }
}

fn pave_cell(heights: &mut Grid<f64>, cells: &mut Grid<CellKind>, x: i32, y: i32) {
    if cells.at(x, y).is_some_and(|kind| kind != CellKind::Wall) {
        cells.set(x, y, CellKind::Floor);
        heights.set(x, y, ROAD_HEIGHT);
    }
}

/// Ring wall with four cardinal gates.
fn raise_ring_wall(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    center: Pos,
    wall_radius: f64,
) {
    for y in 0..cells.height() as i32 {
        for x in 0..cells.width() as i32 {
            let distance = Pos { x, y }.euclidean(center);
            if (distance - wall_radius).abs() >= 0.75 {
                continue;
            }
            let on_gate = (x - center.x).abs() <= 1 || (y - center.y).abs() <= 1;
            if !on_gate {
                cells.set(x, y, CellKind::Wall);
                heights.set(x, y, RING_WALL_HEIGHT);
            }
        }
    }
}

fn place_fountain(cells: &mut Grid<CellKind>, center: Pos, buildings: &[Room]) {
    for dy in -2..=2_i32 {
        for dx in -2..=2_i32 {
            if dx * dx + dy * dy > 4 {
                continue;
            }
            let pos = Pos { x: center.x + dx, y: center.y + dy };
            // a building crowding the plaza keeps its cells, doors included
            if buildings.iter().any(|building| building.contains(pos)) {
                continue;
            }
            if cells.at(pos.x, pos.y) == Some(CellKind::Floor) {
                cells.set(pos.x, pos.y, CellKind::Obstacle);
            }
        }
    }
}

/// Crates, carts, and barrels strewn around the streets.
fn scatter_clutter(cells: &mut Grid<CellKind>, rng: &mut RandomStream, buildings: &[Room]) {
    let target = rng.range_usize(10, 25);
    let mut placed = 0;
    for _ in 0..target * 10 {
        if placed >= target {
            break;
        }
        let x = rng.range_i32(0, cells.width() as i32 - 1);
        let y = rng.range_i32(0, cells.height() as i32 - 1);
        let pos = Pos { x, y };
        if cells.at(x, y) != Some(CellKind::Floor) {
            continue;
        }
        if buildings.iter().any(|building| building.contains(pos)) {
            continue;
        }
        cells.set(x, y, CellKind::Obstacle);
        placed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn town_fixture(seed: u64) -> (Grid<f64>, Grid<CellKind>, Vec<Room>) {
        let options = MapOptions { width: 50, height: 50, seed, ..MapOptions::default() };
        let mut heights = Grid::new(options.width, options.height, 0.0);
        let mut cells = Grid::new(options.width, options.height, CellKind::Floor);
        let mut rng = RandomStream::new(seed);
        let noise = NoiseField::new(seed, options.noise_scale);
        let buildings = generate_town(&mut heights, &mut cells, &mut rng, &noise, &options);
        (heights, cells, buildings)
    }

    #[test]
    fn buildings_never_overlap_and_stay_within_bounds() {
        for seed in [2_u64, 42, 4_096] {
            let (_, cells, buildings) = town_fixture(seed);
            assert!(!buildings.is_empty());
            assert!(buildings.len() <= 14);
            for left in 0..buildings.len() {
                assert!(buildings[left].right() < cells.width());
                assert!(buildings[left].bottom() < cells.height());
                for right in (left + 1)..buildings.len() {
                    assert!(!buildings[left].intersects_padded(&buildings[right], 1));
                }
            }
        }
    }

    #[test]
    fn first_three_buildings_are_shops() {
        let (_, _, buildings) = town_fixture(42);
        let shops = buildings.iter().filter(|building| building.is_shop).count();
        assert_eq!(shops, buildings.len().min(3));
        for (index, building) in buildings.iter().enumerate() {
            assert_eq!(building.is_shop, index < 3);
        }
    }

    #[test]
    fn doors_are_carved_open() {
        for seed in [5_u64, 42, 900] {
            let (heights, cells, buildings) = town_fixture(seed);
            for building in &buildings {
                assert_eq!(cells.at(building.door.x, building.door.y), Some(CellKind::Floor));
                assert!(heights.at(building.door.x, building.door.y).unwrap() >= 0.3);
            }
        }
    }

    #[test]
    fn ground_heights_stay_walkable() {
        let (heights, cells, _) = town_fixture(42);
        for y in 0..cells.height() as i32 {
            for x in 0..cells.width() as i32 {
                if cells.at(x, y) == Some(CellKind::Floor) {
                    assert!(heights.at(x, y).unwrap() >= 0.3);
                }
            }
        }
    }
}
