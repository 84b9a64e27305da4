//! Open-field terrain: layered noise heights plus forest, lake, and path
//! feature carving.

use crate::types::{CellKind, Pos};

use super::grid::Grid;
use super::noise_field::NoiseField;
use super::options::MapOptions;
use super::rng::RandomStream;

const WATER_LEVEL: f64 = 0.3;
const ELEVATION_LIMIT: f64 = 0.75;
const TREE_DENSITY: f64 = 0.6;
const PATH_HEIGHT: f64 = 0.35;

pub(super) fn generate_field(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    noise: &NoiseField,
    options: &MapOptions,
) {
    synthesize_base(heights, cells, noise);
    scatter_rocks(heights, cells, rng, options.wall_density);

    let forest_count = rng.range_usize(3, 8);
    for _ in 0..forest_count {
        plant_forest(heights, cells, rng);
    }

    let lake_count = rng.range_usize(1, 4);
    for _ in 0..lake_count {
        carve_lake(heights, cells, rng);
    }

    // paths go last so they can cut through forests and lakes
    let path_count = rng.range_usize(2, 6);
    for _ in 0..path_count {
        carve_path(heights, cells, rng);
    }
}

/// Base octave plus a 4x-frequency detail octave; below the water level is
/// blocked water, above the elevation limit is blocked high ground.
fn synthesize_base(heights: &mut Grid<f64>, cells: &mut Grid<CellKind>, noise: &NoiseField) {
    for y in 0..cells.height() as i32 {
        for x in 0..cells.width() as i32 {
            let height = noise.blended01(x as f64, y as f64);
            heights.set(x, y, height);
            let kind = if height < WATER_LEVEL {
                CellKind::Water
            } else if height > ELEVATION_LIMIT {
                CellKind::Wall
            } else {
                CellKind::Floor
            };
            cells.set(x, y, kind);
        }
    }
}

fn scatter_rocks(
    heights: &mut Grid<f64>,
    cells: &mut Grid<CellKind>,
    rng: &mut RandomStream,
    wall_density: f64,
) {
    for y in 0..cells.height() as i32 {
        for x in 0..cells.width() as i32 {
            if cells.at(x, y) == Some(CellKind::Floor) && rng.chance(wall_density) {
                cells.set(x, y, CellKind::Wall);
                heights.set(x, y, 0.8);
            }
        }
    }
}

/// Circular probabilistic fill: a tree lands at distance `d` from the center
/// with probability `density * (1 - d / radius)`.
fn plant_forest(heights: &mut Grid<f64>, cells: &mut Grid<CellKind>, rng: &mut RandomStream) {
    let center_x = rng.range_i32(0, cells.width() as i32 - 1);
    let center_y = rng.range_i32(0, cells.height() as i32 - 1);
    let radius = rng.range_i32(4, 8);

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let x = center_x + dx;
            let y = center_y + dy;
            if cells.at(x, y) != Some(CellKind::Floor) {
                continue;
            }
            let distance = ((dx * dx + dy * dy) as f64).sqrt();
            if distance > radius as f64 {
                continue;
            }
            if rng.chance(TREE_DENSITY * (1.0 - distance / radius as f64)) {
                cells.set(x, y, CellKind::Wall);
                heights.set(x, y, 0.7);
            } else {
                heights.set(x, y, rng.range_f64(0.4, 0.5));
            }
        }
    }
}

/// Elliptical footprint with depth increasing toward the center; everything
/// covered becomes water.
fn carve_lake(heights: &mut Grid<f64>, cells: &mut Grid<CellKind>, rng: &mut RandomStream) {
    let center_x = rng.range_i32(0, cells.width() as i32 - 1);
    let center_y = rng.range_i32(0, cells.height() as i32 - 1);
    let radius_x = rng.range_i32(3, 7);
    let radius_y = rng.range_i32(3, 7);

    for dy in -radius_y..=radius_y {
        for dx in -radius_x..=radius_x {
            let x = center_x + dx;
            let y = center_y + dy;
            if !cells.in_bounds(x, y) {
                continue;
            }
            let nx = dx as f64 / radius_x as f64;
            let ny = dy as f64 / radius_y as f64;
            let normalized = (nx * nx + ny * ny).sqrt();
            if normalized <= 1.0 {
                cells.set(x, y, CellKind::Water);
                heights.set(x, y, 0.05 + 0.2 * normalized);
            }
        }
    }
}

/// Bresenham line between two random points, 1-2 cells wide, force-carved to
/// floor with a slightly lowered (but still walkable) height.
fn carve_path(heights: &mut Grid<f64>, cells: &mut Grid<CellKind>, rng: &mut RandomStream) {
    let width = cells.width() as i32;
    let height = cells.height() as i32;
    let start = Pos { x: rng.range_i32(0, width - 1), y: rng.range_i32(0, height - 1) };
    let end = Pos { x: rng.range_i32(0, width - 1), y: rng.range_i32(0, height - 1) };
    let path_width = rng.range_i32(1, 2);

    for point in bresenham_line(start, end) {
        for dy in 0..path_width {
            for dx in 0..path_width {
                let x = point.x + dx;
                let y = point.y + dy;
                if cells.in_bounds(x, y) {
                    cells.set(x, y, CellKind::Floor);
                    heights.set(x, y, PATH_HEIGHT);
                }
            }
        }
    }
}

pub(super) fn bresenham_line(start: Pos, end: Pos) -> Vec<Pos> {
    let mut points = Vec::new();
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let step_x = if start.x < end.x { 1 } else { -1 };
    let step_y = if start.y < end.y { 1 } else { -1 };
    let mut error = dx + dy;
    let mut x = start.x;
    let mut y = start.y;

    loop {
        points.push(Pos { x, y });
        if x == end.x && y == end.y {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += step_x;
        }
        if doubled <= dx {
            error += dx;
            y += step_y;
        }
    }
    points
}
