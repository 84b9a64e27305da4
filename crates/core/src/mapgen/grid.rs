//! Dense row-major 2D grid shared by the height map and cell classification.
//! Coordinates are `(x = column, y = row)`; the flat index is `y * width + x`.

use serde::Serialize;

use crate::types::CellKind;

use super::model::WALKABLE_HEIGHT_MIN;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self { width, height, cells: vec![fill; width * height] }
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) { Some(&self.cells[self.index(x, y)]) } else { None }
    }

    /// Out-of-bounds writes are ignored; carving near an edge degrades
    /// instead of failing.
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        if self.in_bounds(x, y) {
            let index = self.index(x, y);
            self.cells[index] = value;
        }
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y as usize) * self.width + (x as usize)
    }
}

impl<T: Copy> Grid<T> {
    pub fn at(&self, x: i32, y: i32) -> Option<T> {
        self.get(x, y).copied()
    }
}

pub(super) fn is_walkable(cells: &Grid<CellKind>, heights: &Grid<f64>, x: i32, y: i32) -> bool {
    cells.at(x, y) == Some(CellKind::Floor)
        && heights.at(x, y).is_some_and(|height| height >= WALKABLE_HEIGHT_MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_set_respect_bounds() {
        let mut grid = Grid::new(4, 3, 0_u8);
        grid.set(3, 2, 7);
        assert_eq!(grid.at(3, 2), Some(7));
        assert_eq!(grid.at(4, 2), None);
        assert_eq!(grid.at(-1, 0), None);
        grid.set(10, 10, 9);
        assert_eq!(grid.cells().iter().filter(|&&value| value == 9).count(), 0);
    }

    #[test]
    fn index_is_row_major_with_x_as_column() {
        let mut grid = Grid::new(5, 2, 0_u8);
        grid.set(2, 1, 1);
        assert_eq!(grid.cells()[1 * 5 + 2], 1);
    }

    #[test]
    fn walkability_needs_floor_kind_and_minimum_height() {
        let mut cells = Grid::new(2, 1, CellKind::Floor);
        let mut heights = Grid::new(2, 1, 0.5);
        assert!(is_walkable(&cells, &heights, 0, 0));
        heights.set(0, 0, 0.2);
        assert!(!is_walkable(&cells, &heights, 0, 0));
        cells.set(1, 0, CellKind::Chest);
        assert!(!is_walkable(&cells, &heights, 1, 0));
        assert!(!is_walkable(&cells, &heights, 5, 0));
    }
}
