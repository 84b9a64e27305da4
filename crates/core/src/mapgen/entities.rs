//! Enemy spawn placement: lone spawns, clustered packs, and the arena boss
//! encounter.

use std::collections::BTreeSet;

use crate::types::{CellKind, EnemyKind, EnemyTier, MapType, Pos};

use super::difficulty;
use super::grid::{self, Grid};
use super::model::EnemySpawn;
use super::options::MapOptions;
use super::rng::RandomStream;

const DUNGEON_KINDS: &[EnemyKind] = &[
    EnemyKind::Skeleton,
    EnemyKind::Zombie,
    EnemyKind::Ghost,
    EnemyKind::Spider,
    EnemyKind::Slime,
];
const FIELD_KINDS: &[EnemyKind] = &[
    EnemyKind::Wolf,
    EnemyKind::Bandit,
    EnemyKind::Goblin,
    EnemyKind::Troll,
    EnemyKind::Ogre,
];
const TOWN_KINDS: &[EnemyKind] =
    &[EnemyKind::Thief, EnemyKind::Drunkard, EnemyKind::Rat, EnemyKind::StrayDog];

pub(super) struct EnemyContext<'a> {
    pub cells: &'a Grid<CellKind>,
    pub heights: &'a Grid<f64>,
    pub map_type: MapType,
    pub options: &'a MapOptions,
}

pub(super) fn place_enemies(context: &EnemyContext<'_>, rng: &mut RandomStream) -> Vec<EnemySpawn> {
    let mut occupied: BTreeSet<(i32, i32)> = BTreeSet::new();
    let mut spawns = Vec::new();

    match context.map_type {
        MapType::Arena => place_boss_encounter(context, rng, &mut occupied, &mut spawns),
        _ => {
            place_standard(context, rng, &mut occupied, &mut spawns);
            place_groups(context, rng, &mut occupied, &mut spawns);
        }
    }

    spawns.sort_by_key(|spawn| (spawn.pos.y, spawn.pos.x));
    spawns
}

/// Lone spawns drawn without replacement from the walkable cells, count
/// driven by density times the difficulty multiplier.
fn place_standard(
    context: &EnemyContext<'_>,
    rng: &mut RandomStream,
    occupied: &mut BTreeSet<(i32, i32)>,
    spawns: &mut Vec<EnemySpawn>,
) {
    let mut pool = walkable_cells(context);
    let target = (pool.len() as f64
        * context.options.enemy_density
        * difficulty::enemy_multiplier(context.options.difficulty)) as usize;

    for _ in 0..target.min(pool.len()) {
        let index = rng.range_usize(0, pool.len() - 1);
        let pos = pool.swap_remove(index);
        if !occupied.insert((pos.x, pos.y)) {
            continue;
        }
        let tier = if rng.chance(difficulty::elite_chance(context.options.difficulty)) {
            EnemyTier::Elite
        } else {
            EnemyTier::Normal
        };
        spawns.push(EnemySpawn {
            pos,
            kind: *rng.pick(kind_pool(context.map_type)),
            tier,
            level: roll_level(rng, context.options, tier),
            group_id: None,
        });
    }
}

/// Packs of a shared kind clustered around an anchor. Member placement is
/// attempt-bounded so dense maps just produce smaller packs.
fn place_groups(
    context: &EnemyContext<'_>,
    rng: &mut RandomStream,
    occupied: &mut BTreeSet<(i32, i32)>,
    spawns: &mut Vec<EnemySpawn>,
) {
    let candidates = walkable_cells(context);
    if candidates.is_empty() {
        return;
    }

    let group_count = rng.range_usize(3, 7);
    for group_id in 0..group_count as u32 {
        let anchor = candidates[rng.range_usize(0, candidates.len() - 1)];
        let kind = *rng.pick(kind_pool(context.map_type));
        let radius = rng.range_i32(1, 3);
        let size = rng.range_usize(3, 6);

        let mut placed = 0;
        for _ in 0..size * 4 {
            if placed >= size {
                break;
            }
            let pos = Pos {
                x: anchor.x + rng.range_i32(-radius, radius),
                y: anchor.y + rng.range_i32(-radius, radius),
            };
            if pos.euclidean(anchor) > radius as f64 {
                continue;
            }
            if !grid::is_walkable(context.cells, context.heights, pos.x, pos.y) {
                continue;
            }
            if !occupied.insert((pos.x, pos.y)) {
                continue;
            }
            spawns.push(EnemySpawn {
                pos,
                kind,
                tier: EnemyTier::Normal,
                level: roll_level(rng, context.options, EnemyTier::Normal),
                group_id: Some(group_id),
            });
            placed += 1;
        }
    }
}

/// One boss at the exact arena center plus a retinue of elites on the
/// surrounding ring.
fn place_boss_encounter(
    context: &EnemyContext<'_>,
    rng: &mut RandomStream,
    occupied: &mut BTreeSet<(i32, i32)>,
    spawns: &mut Vec<EnemySpawn>,
) {
    let center = Pos {
        x: context.cells.width() as i32 / 2,
        y: context.cells.height() as i32 / 2,
    };
    occupied.insert((center.x, center.y));
    spawns.push(EnemySpawn {
        pos: center,
        kind: *rng.pick(kind_pool(context.map_type)),
        tier: EnemyTier::Boss,
        level: roll_level(rng, context.options, EnemyTier::Boss),
        group_id: None,
    });

    let mut ring: Vec<Pos> = walkable_cells(context)
        .into_iter()
        .filter(|pos| {
            let distance = pos.euclidean(center);
            (5.0..=10.0).contains(&distance)
        })
        .collect();

    let elite_count = rng.range_usize(4, 7).min(ring.len());
    for _ in 0..elite_count {
        let index = rng.range_usize(0, ring.len() - 1);
        let pos = ring.swap_remove(index);
        if !occupied.insert((pos.x, pos.y)) {
            continue;
        }
        spawns.push(EnemySpawn {
            pos,
            kind: *rng.pick(kind_pool(context.map_type)),
            tier: EnemyTier::Elite,
            level: roll_level(rng, context.options, EnemyTier::Elite),
            group_id: None,
        });
    }
}

fn roll_level(rng: &mut RandomStream, options: &MapOptions, tier: EnemyTier) -> u32 {
    let (min, max) = difficulty::level_range(options.difficulty, tier);
    rng.range_usize(min as usize, max as usize) as u32
}

fn walkable_cells(context: &EnemyContext<'_>) -> Vec<Pos> {
    let mut cells = Vec::new();
    for y in 0..context.cells.height() as i32 {
        for x in 0..context.cells.width() as i32 {
            if grid::is_walkable(context.cells, context.heights, x, y) {
                cells.push(Pos { x, y });
            }
        }
    }
    cells
}

fn kind_pool(map_type: MapType) -> &'static [EnemyKind] {
    match map_type {
        MapType::Dungeon | MapType::Arena => DUNGEON_KINDS,
        MapType::Field => FIELD_KINDS,
        MapType::Town => TOWN_KINDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;

    fn field_context<'a>(
        cells: &'a Grid<CellKind>,
        heights: &'a Grid<f64>,
        options: &'a MapOptions,
    ) -> EnemyContext<'a> {
        EnemyContext { cells, heights, map_type: MapType::Field, options }
    }

    #[test]
    fn spawns_land_on_walkable_cells_at_unique_positions() {
        let cells = Grid::new(40, 40, CellKind::Floor);
        let heights = Grid::new(40, 40, 0.5);
        let options = MapOptions { enemy_density: 0.05, ..MapOptions::default() };
        let mut rng = RandomStream::new(21);
        let spawns = place_enemies(&field_context(&cells, &heights, &options), &mut rng);

        assert!(!spawns.is_empty());
        let lone = spawns.iter().filter(|spawn| spawn.group_id.is_none()).count();
        assert_eq!(lone, (1600.0 * 0.05) as usize);
        let mut seen = BTreeSet::new();
        for spawn in &spawns {
            assert!(grid::is_walkable(&cells, &heights, spawn.pos.x, spawn.pos.y));
            assert!(seen.insert((spawn.pos.x, spawn.pos.y)), "duplicate at {:?}", spawn.pos);
        }
    }

    #[test]
    fn packs_share_a_kind_and_cluster_near_each_other() {
        let cells = Grid::new(40, 40, CellKind::Floor);
        let heights = Grid::new(40, 40, 0.5);
        let options = MapOptions::default();
        let mut rng = RandomStream::new(5);
        let spawns = place_enemies(&field_context(&cells, &heights, &options), &mut rng);

        let mut group_ids = BTreeSet::new();
        for spawn in spawns.iter().filter(|spawn| spawn.group_id.is_some()) {
            group_ids.insert(spawn.group_id);
        }
        assert!(!group_ids.is_empty());
        for group_id in group_ids {
            let members: Vec<_> =
                spawns.iter().filter(|spawn| spawn.group_id == group_id).collect();
            let kind = members[0].kind;
            assert!(members.iter().all(|member| member.kind == kind));
            for a in &members {
                for b in &members {
                    assert!(a.pos.euclidean(b.pos) <= 6.0);
                }
            }
        }
    }

    #[test]
    fn levels_stay_inside_the_difficulty_band() {
        let cells = Grid::new(30, 30, CellKind::Floor);
        let heights = Grid::new(30, 30, 0.5);
        let options = MapOptions {
            enemy_density: 0.1,
            difficulty: Difficulty::Nightmare,
            ..MapOptions::default()
        };
        let mut rng = RandomStream::new(77);
        let spawns = place_enemies(&field_context(&cells, &heights, &options), &mut rng);

        for spawn in &spawns {
            let (min, max) = difficulty::level_range(options.difficulty, spawn.tier);
            assert!((min..=max).contains(&spawn.level), "level {} outside band", spawn.level);
        }
    }

    #[test]
    fn arena_gets_one_boss_at_the_center_and_elite_escorts() {
        let cells = Grid::new(60, 60, CellKind::Floor);
        let heights = Grid::new(60, 60, 0.5);
        let options = MapOptions { width: 60, height: 60, ..MapOptions::default() };
        let context =
            EnemyContext { cells: &cells, heights: &heights, map_type: MapType::Arena, options: &options };
        let mut rng = RandomStream::new(42);
        let spawns = place_enemies(&context, &mut rng);

        let bosses: Vec<_> =
            spawns.iter().filter(|spawn| spawn.tier == EnemyTier::Boss).collect();
        assert_eq!(bosses.len(), 1);
        assert_eq!(bosses[0].pos, Pos { x: 30, y: 30 });

        let elites: Vec<_> =
            spawns.iter().filter(|spawn| spawn.tier == EnemyTier::Elite).collect();
        assert!((4..=7).contains(&elites.len()));
        for elite in elites {
            let distance = elite.pos.euclidean(bosses[0].pos);
            assert!((5.0..=10.0).contains(&distance));
        }
    }
}
