//! Grid pathfinding over generated maps: 4-directional A* with Manhattan
//! heuristic and FIFO tie-breaking.

use crate::mapgen::{MapModel, WALKABLE_HEIGHT_MIN};
use crate::types::{CellKind, Pos};

/// Flat walkability mask derived from a map, or built standalone for
/// ad-hoc grids. Cells toggled with [`PathfindingGrid::set_blocked`] let
/// callers account for dynamic occupants without regenerating the map.
#[derive(Clone, Debug)]
pub struct PathfindingGrid {
    width: usize,
    height: usize,
    blocked: Vec<bool>,
}

struct OpenNode {
    pos: Pos,
    g: u32,
    f: u32,
}

impl PathfindingGrid {
    /// All cells start unblocked.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, blocked: vec![false; width * height] }
    }

    pub fn from_model(model: &MapModel) -> Self {
        let mut blocked = Vec::with_capacity(model.width * model.height);
        for (kind, height) in model.placement.cells().iter().zip(model.height_map.cells()) {
            blocked.push(*kind != CellKind::Floor || *height < WALKABLE_HEIGHT_MIN);
        }
        Self { width: model.width, height: model.height, blocked }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-bounds counts as blocked.
    pub fn is_blocked(&self, pos: Pos) -> bool {
        match self.index(pos) {
            Some(index) => self.blocked[index],
            None => true,
        }
    }

    pub fn set_blocked(&mut self, pos: Pos, blocked: bool) {
        if let Some(index) = self.index(pos) {
            self.blocked[index] = blocked;
        }
    }

    /// Shortest 4-connected path from `start` to `goal`, inclusive of both
    /// endpoints. Returns `None` when the goal is blocked or unreachable. A
    /// blocked start is allowed so an occupant standing on a temporarily
    /// blocked cell can still path out of it.
    pub fn find_path(&self, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
        let start_index = self.index(start)?;
        let goal_index = self.index(goal)?;
        if self.blocked[goal_index] {
            return None;
        }
        if start == goal {
            return Some(vec![start]);
        }

        let cell_count = self.width * self.height;
        let mut closed = vec![false; cell_count];
        let mut g_score = vec![u32::MAX; cell_count];
        let mut came_from: Vec<Option<Pos>> = vec![None; cell_count];

        g_score[start_index] = 0;
        let mut open =
            vec![OpenNode { pos: start, g: 0, f: start.manhattan(goal) }];

        while !open.is_empty() {
            // stable sort keeps insertion order among equal f, so ties pop
            // oldest-first
            open.sort_by_key(|node| node.f);
            let current = open.remove(0);
            let current_index = self.index(current.pos)?;
            if closed[current_index] {
                continue;
            }
            closed[current_index] = true;

            if current.pos == goal {
                return Some(self.reconstruct(&came_from, start, goal));
            }

            for neighbor in neighbors(current.pos) {
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };
                if self.blocked[neighbor_index] || closed[neighbor_index] {
                    continue;
                }
                let tentative = current.g + 1;
                if tentative < g_score[neighbor_index] {
                    g_score[neighbor_index] = tentative;
                    came_from[neighbor_index] = Some(current.pos);
                    open.push(OpenNode {
                        pos: neighbor,
                        g: tentative,
                        f: tentative + neighbor.manhattan(goal),
                    });
                }
            }
        }

        None
    }

    fn reconstruct(&self, came_from: &[Option<Pos>], start: Pos, goal: Pos) -> Vec<Pos> {
        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            match self.index(current).and_then(|index| came_from[index]) {
                Some(previous) => {
                    path.push(previous);
                    current = previous;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
        {
            Some((pos.y as usize) * self.width + (pos.x as usize))
        } else {
            None
        }
    }
}

/// Expansion order is up, right, down, left.
fn neighbors(pos: Pos) -> [Pos; 4] {
    [
        Pos { x: pos.x, y: pos.y - 1 },
        Pos { x: pos.x + 1, y: pos.y },
        Pos { x: pos.x, y: pos.y + 1 },
        Pos { x: pos.x - 1, y: pos.y },
    ]
}
