//! Circular boss arena: carved disc, pillar cover, altar, one entrance.

use crate::types::{CellKind, Pos};

use super::grid::Grid;
use super::options::MapOptions;
use super::rng::RandomStream;
use super::terrain::bresenham_line;

const RING_DEPTH: f64 = 5.0;
const ENTRANCE_LENGTH: i32 = 10;
const FLOOR_HEIGHT: f64 = 0.4;
const RING_EDGE_HEIGHT: f64 = 0.45;
const WALL_HEIGHT: f64 = 0.8;

pub(super) fn generate_arena(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    _options: &MapOptions,
) {
    let width = cells.width() as i32;
    let height = cells.height() as i32;
    let center = Pos { x: width / 2, y: height / 2 };
    let radius = 0.4 * width.min(height) as f64;
    let altar_radius = (0.15 * radius).max(1.0);

    carve_disc_and_ring(heights, cells, center, radius);
    place_pillars(heights, cells, rng, center, radius, altar_radius);
    raise_altar(heights, cells, center, altar_radius);
    carve_entrance(heights, cells, rng, center, radius);
}

/// Central disc plus a buffer ring whose height blends linearly back toward
/// wall height.
fn carve_disc_and_ring(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    center: Pos,
    radius: f64,
) {
    for y in 0..cells.height() as i32 {
        for x in 0..cells.width() as i32 {
            let distance = Pos { x, y }.euclidean(center);
            if distance <= radius {
                cells.set(x, y, CellKind::Floor);
                heights.set(x, y, FLOOR_HEIGHT + 0.05 * (distance / radius));
            } else if distance <= radius + RING_DEPTH {
                let blend = (distance - radius) / RING_DEPTH;
                cells.set(x, y, CellKind::Floor);
                heights.set(x, y, RING_EDGE_HEIGHT + blend * (WALL_HEIGHT - RING_EDGE_HEIGHT));
            } else {
                heights.set(x, y, WALL_HEIGHT);
            }
        }
    }
}

/// Tactical cover at random polar positions within 30-80% of the arena
/// radius. Pillars never intrude on the altar so the boss cell stays clear.
fn place_pillars(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    center: Pos,
    radius: f64,
    altar_radius: f64,
) {
    let pillar_count = rng.range_usize(4, 11);
    for _ in 0..pillar_count {
        let angle = rng.angle();
        let distance = radius * rng.range_f64(0.3, 0.8);
        let pillar_x = center.x + (angle.cos() * distance).round() as i32;
        let pillar_y = center.y + (angle.sin() * distance).round() as i32;
        let pillar_radius = rng.range_i32(1, 2);
        let kind = if rng.chance(0.25) { CellKind::Obstacle } else { CellKind::Wall };

        for dy in -pillar_radius..=pillar_radius {
            for dx in -pillar_radius..=pillar_radius {
                if dx * dx + dy * dy > pillar_radius * pillar_radius {
                    continue;
                }
                let pos = Pos { x: pillar_x + dx, y: pillar_y + dy };
                if pos.euclidean(center) <= altar_radius {
                    continue;
                }
                if cells.at(pos.x, pos.y) == Some(CellKind::Floor) {
                    cells.set(pos.x, pos.y, kind);
                    heights.set(pos.x, pos.y, WALL_HEIGHT);
                }
            }
        }
    }
}

/// Height bump at the arena center; the altar stays walkable.
fn raise_altar(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    center: Pos,
    altar_radius: f64,
) {
    let reach = altar_radius.ceil() as i32;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let pos = Pos { x: center.x + dx, y: center.y + dy };
            if pos.euclidean(center) > altar_radius {
                continue;
            }
            if cells.at(pos.x, pos.y) == Some(CellKind::Floor) {
                if let Some(height) = heights.at(pos.x, pos.y) {
                    heights.set(pos.x, pos.y, height + 0.05);
                }
            }
        }
    }
}

/// Exactly one way in: a straight corridor at a random angle, flanked by
/// walls, running outward from the buffer ring.
fn carve_entrance(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    center: Pos,
    radius: f64,
) {
    let angle = rng.angle();
    let (dir_x, dir_y) = (angle.cos(), angle.sin());
    let inner = RING_DEPTH - 1.0;
    let start = Pos {
        x: center.x + (dir_x * (radius + inner)).round() as i32,
        y: center.y + (dir_y * (radius + inner)).round() as i32,
    };
    let end = Pos {
        x: center.x + (dir_x * (radius + inner + ENTRANCE_LENGTH as f64)).round() as i32,
        y: center.y + (dir_y * (radius + inner + ENTRANCE_LENGTH as f64)).round() as i32,
    };

    let mut previous: Option<Pos> = None;
    for point in bresenham_line(start, end) {
        // keep the corridor 4-connected across diagonal steps
        if let Some(last) = previous {
            if point.x != last.x && point.y != last.y {
                carve_corridor_cell(heights, cells, Pos { x: last.x, y: point.y });
            }
        }
        carve_corridor_cell(heights, cells, point);
        flank_corridor(heights, cells, point, dir_x, dir_y);
        previous = Some(point);
    }
}

fn carve_corridor_cell(heights: &mut Grid<f64>, cells: &mut Grid<CellKind>, pos: Pos) {
    if cells.in_bounds(pos.x, pos.y) {
        cells.set(pos.x, pos.y, CellKind::Floor);
        heights.set(pos.x, pos.y, RING_EDGE_HEIGHT);
    }
}

fn flank_corridor(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    pos: Pos,
    dir_x: f64,
    dir_y: f64,
) {
    for side in [-1.0, 1.0] {
        let x = pos.x + (-dir_y * side).round() as i32;
        let y = pos.y + (dir_x * side).round() as i32;
        if cells.at(x, y).is_some_and(|kind| kind != CellKind::Floor) {
            cells.set(x, y, CellKind::Wall);
            heights.set(x, y, WALL_HEIGHT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_fixture(seed: u64, size: usize) -> (Grid<f64>, Grid<CellKind>) {
        let options = MapOptions { width: size, height: size, seed, ..MapOptions::default() };
        let mut heights = Grid::new(size, size, 0.0);
        let mut cells = Grid::new(size, size, CellKind::Wall);
        let mut rng = RandomStream::new(seed);
        generate_arena(&mut heights, &mut cells, &mut rng, &options);
        (heights, cells)
    }

    #[test]
    fn arena_center_is_walkable_floor() {
        for seed in [1_u64, 42, 500] {
            let (heights, cells) = arena_fixture(seed, 60);
            let center = Pos { x: 30, y: 30 };
            assert_eq!(cells.at(center.x, center.y), Some(CellKind::Floor));
            assert!(heights.at(center.x, center.y).unwrap() >= 0.3);
        }
    }

    #[test]
    fn disc_interior_is_floor_and_far_corners_are_wall() {
        let (_, cells) = arena_fixture(42, 60);
        let center = Pos { x: 30, y: 30 };
        let radius = 0.4 * 60.0;
        let mut interior_floor = 0_usize;
        let mut interior_total = 0_usize;
        for y in 0..60 {
            for x in 0..60 {
                let pos = Pos { x, y };
                if pos.euclidean(center) <= radius {
                    interior_total += 1;
                    if cells.at(x, y) == Some(CellKind::Floor) {
                        interior_floor += 1;
                    }
                }
            }
        }
        // pillars occupy a little of the disc, never the bulk of it
        assert!(interior_floor * 10 >= interior_total * 8);
        assert_eq!(cells.at(0, 0), Some(CellKind::Wall));
        assert_eq!(cells.at(59, 59), Some(CellKind::Wall));
    }

    #[test]
    fn entrance_corridor_reaches_past_the_buffer_ring() {
        // large enough that the corridor fits in bounds at any angle
        for seed in [9_u64, 42, 12_345] {
            let (_, cells) = arena_fixture(seed, 160);
            let center = Pos { x: 80, y: 80 };
            let outer = 0.4 * 160.0 + RING_DEPTH;
            let mut outside_floor = 0_usize;
            for y in 0..160 {
                for x in 0..160 {
                    let pos = Pos { x, y };
                    if cells.at(x, y) == Some(CellKind::Floor) && pos.euclidean(center) > outer {
                        outside_floor += 1;
                    }
                }
            }
            assert!(outside_floor > 0, "no entrance floor found for seed {seed}");
        }
    }

    #[test]
    fn altar_cells_are_raised_but_walkable() {
        let (heights, cells) = arena_fixture(7, 60);
        let center = Pos { x: 30, y: 30 };
        let altar_radius = (0.15_f64 * 0.4 * 60.0).max(1.0);
        for dy in -4..=4 {
            for dx in -4..=4 {
                let pos = Pos { x: center.x + dx, y: center.y + dy };
                if pos.euclidean(center) <= altar_radius {
                    assert_eq!(cells.at(pos.x, pos.y), Some(CellKind::Floor));
                    let height = heights.at(pos.x, pos.y).unwrap();
                    assert!((0.3..=0.55).contains(&height));
                }
            }
        }
    }
}
