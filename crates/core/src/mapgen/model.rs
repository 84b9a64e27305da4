//! Public data model for generated maps and their spawn lists.

use serde::Serialize;

use crate::types::{CellKind, Difficulty, EnemyKind, EnemyTier, MapType, NpcKind, Pos, ShopKind};

use super::grid::Grid;
use super::rng::RandomStream;

/// Cells below this height are too low to stand on, independent of kind.
pub const WALKABLE_HEIGHT_MIN: f64 = 0.3;

/// Rectangular carved region with one door. Dungeon rooms use their center
/// as the door; town buildings punch a door through one wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub door: Pos,
    pub is_shop: bool,
}

impl Room {
    pub(super) fn right(&self) -> usize {
        self.x + self.width - 1
    }

    pub(super) fn bottom(&self) -> usize {
        self.y + self.height - 1
    }

    pub fn center(&self) -> Pos {
        Pos { x: (self.x + self.width / 2) as i32, y: (self.y + self.height / 2) as i32 }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) >= self.x
            && (pos.x as usize) <= self.right()
            && (pos.y as usize) >= self.y
            && (pos.y as usize) <= self.bottom()
    }

    /// True when the bounds, grown by `margin` cells on every side, overlap.
    pub(super) fn intersects_padded(&self, other: &Room, margin: usize) -> bool {
        let ax0 = self.x.saturating_sub(margin);
        let ay0 = self.y.saturating_sub(margin);
        let ax1 = self.right() + margin;
        let ay1 = self.bottom() + margin;
        let bx0 = other.x.saturating_sub(margin);
        let by0 = other.y.saturating_sub(margin);
        let bx1 = other.right() + margin;
        let by1 = other.bottom() + margin;
        ax0 <= bx1 && ax1 >= bx0 && ay0 <= by1 && ay1 >= by0
    }

    /// Interior cells excluding the outermost floor ring and the door.
    pub(super) fn strictly_interior(&self, pos: Pos) -> bool {
        pos.x > self.x as i32
            && (pos.x as usize) < self.right()
            && pos.y > self.y as i32
            && (pos.y as usize) < self.bottom()
            && pos != self.door
    }

    /// Interior cells that may hold a blocking object. The door's row and
    /// column stay clear, so an open lane always runs from the door to the
    /// room's edge ring no matter how many objects land inside.
    pub(super) fn blockable_interior(&self, pos: Pos) -> bool {
        self.strictly_interior(pos) && pos.x != self.door.x && pos.y != self.door.y
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EnemySpawn {
    pub pos: Pos,
    pub kind: EnemyKind,
    pub tier: EnemyTier,
    pub level: u32,
    pub group_id: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ShopItem {
    pub name: &'static str,
    pub price: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NpcSpawn {
    pub pos: Pos,
    pub kind: NpcKind,
    pub is_shop: bool,
    pub shop_kind: Option<ShopKind>,
    pub shop_items: Vec<ShopItem>,
    pub dialogue_lines: Vec<&'static str>,
}

/// The finished map. Immutable once returned: collaborators read it, and a
/// new floor always means a brand-new model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapModel {
    pub width: usize,
    pub height: usize,
    pub tile_size: u32,
    pub height_map: Grid<f64>,
    pub placement: Grid<CellKind>,
    pub rooms: Vec<Room>,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub npc_spawns: Vec<NpcSpawn>,
    pub map_type: MapType,
    pub difficulty: Difficulty,
}

impl MapModel {
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.placement.at(x, y) == Some(CellKind::Floor)
            && self.height_map.at(x, y).is_some_and(|height| height >= WALKABLE_HEIGHT_MIN)
    }

    /// Probes up to 100 random cells, then falls back to the walkable cell
    /// nearest the map center. Returns the center itself only when the map
    /// has no walkable cell at all.
    pub fn random_walkable_position(&self, rng: &mut RandomStream) -> Pos {
        if self.width > 0 && self.height > 0 {
            for _ in 0..100 {
                let x = rng.range_i32(0, self.width as i32 - 1);
                let y = rng.range_i32(0, self.height as i32 - 1);
                if self.is_walkable(x, y) {
                    return Pos { x, y };
                }
            }
        }
        self.nearest_walkable_to_center()
    }

    fn nearest_walkable_to_center(&self) -> Pos {
        let center = Pos { x: (self.width / 2) as i32, y: (self.height / 2) as i32 };
        let mut best = center;
        let mut best_distance = u32::MAX;
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if !self.is_walkable(x, y) {
                    continue;
                }
                let pos = Pos { x, y };
                let distance = pos.manhattan(center);
                if distance < best_distance
                    || (distance == best_distance && (pos.y, pos.x) < (best.y, best.x))
                {
                    best = pos;
                    best_distance = distance;
                }
            }
        }
        best
    }

    /// Stable byte encoding covering everything generation decides; used for
    /// determinism fingerprints.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.tile_size.to_le_bytes());
        bytes.push(self.map_type as u8);
        bytes.push(self.difficulty as u8);
        for &height in self.height_map.cells() {
            bytes.extend(height.to_le_bytes());
        }
        for &kind in self.placement.cells() {
            bytes.push(kind as u8);
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend((room.x as u32).to_le_bytes());
            bytes.extend((room.y as u32).to_le_bytes());
            bytes.extend((room.width as u32).to_le_bytes());
            bytes.extend((room.height as u32).to_le_bytes());
            bytes.extend(room.door.x.to_le_bytes());
            bytes.extend(room.door.y.to_le_bytes());
            bytes.push(u8::from(room.is_shop));
        }

        bytes.extend((self.enemy_spawns.len() as u32).to_le_bytes());
        for spawn in &self.enemy_spawns {
            bytes.extend(spawn.pos.x.to_le_bytes());
            bytes.extend(spawn.pos.y.to_le_bytes());
            bytes.push(spawn.kind as u8);
            bytes.push(spawn.tier as u8);
            bytes.extend(spawn.level.to_le_bytes());
            bytes.extend(spawn.group_id.unwrap_or(u32::MAX).to_le_bytes());
        }

        bytes.extend((self.npc_spawns.len() as u32).to_le_bytes());
        for spawn in &self.npc_spawns {
            bytes.extend(spawn.pos.x.to_le_bytes());
            bytes.extend(spawn.pos.y.to_le_bytes());
            bytes.push(spawn.kind as u8);
            bytes.push(u8::from(spawn.is_shop));
            bytes.extend((spawn.shop_items.len() as u32).to_le_bytes());
            bytes.extend((spawn.dialogue_lines.len() as u32).to_le_bytes());
        }

        bytes
    }
}
