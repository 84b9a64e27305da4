//! Town NPC placement: shopkeepers, residents, and free-roaming villagers.

use crate::types::{CellKind, NpcKind, Pos, ShopKind};

use super::grid::{self, Grid};
use super::model::{NpcSpawn, Room, ShopItem};
use super::options::MapOptions;
use super::rng::RandomStream;

const RESIDENT_CHANCE: f64 = 0.7;

const GREETING_LINES: &[&str] = &[
    "Welcome, traveler. Take a look around.",
    "Finest wares this side of the mountains.",
    "Back again? I kept the good stock for you.",
    "Everything is for sale, for the right price.",
    "Mind the shelves, some of it bites.",
    "Coin first, questions later.",
];

const FLAVOR_LINES: &[&str] = &[
    "Lovely weather for this time of year.",
    "Stay clear of the old dungeon after dark.",
    "The guards doubled their patrols last week.",
    "I heard wolves howling past the north gate.",
    "The fountain water tastes strange lately.",
    "My grandmother swore the arena was cursed.",
    "Traders from the coast bring the best salt.",
    "Keep your purse close in the market crowd.",
    "The elder remembers when the walls were new.",
    "Someone saw lights out in the fields again.",
];

const WEAPON_STOCK: &[(&str, u32)] =
    &[("Iron Sword", 120), ("Oak Bow", 95), ("Steel Dagger", 60), ("War Axe", 150)];
const ARMOR_STOCK: &[(&str, u32)] =
    &[("Leather Vest", 80), ("Chain Mail", 160), ("Iron Shield", 110), ("Traveler Boots", 45)];
const POTION_STOCK: &[(&str, u32)] =
    &[("Healing Draught", 30), ("Antidote", 25), ("Stamina Tonic", 40), ("Elixir of Focus", 75)];
const GENERAL_STOCK: &[(&str, u32)] =
    &[("Rope", 10), ("Torch", 5), ("Rations", 15), ("Lantern Oil", 12), ("Bedroll", 20)];

pub(super) fn place_npcs(
    cells: &Grid<CellKind>,
    heights: &Grid<f64>,
    rng: &mut RandomStream,
    buildings: &[Room],
    options: &MapOptions,
) -> Vec<NpcSpawn> {
    let mut npcs = Vec::new();
    let mut shop_index = 0;

    for building in buildings {
        if building.is_shop {
            npcs.push(shopkeeper(rng, building, shop_index));
            shop_index += 1;
        } else if rng.chance(RESIDENT_CHANCE) {
            let line_count = rng.range_usize(1, 3);
            npcs.push(NpcSpawn {
                pos: building.center(),
                kind: NpcKind::Villager,
                is_shop: false,
                shop_kind: None,
                shop_items: Vec::new(),
                dialogue_lines: draw_distinct(rng, FLAVOR_LINES, line_count),
            });
        }
    }

    place_roaming(cells, heights, rng, buildings, options, &mut npcs);
    npcs
}

fn shopkeeper(rng: &mut RandomStream, building: &Room, shop_index: usize) -> NpcSpawn {
    let shop_kind = match shop_index % 4 {
        0 => ShopKind::Weapons,
        1 => ShopKind::Armor,
        2 => ShopKind::Potions,
        _ => ShopKind::General,
    };
    NpcSpawn {
        pos: building.center(),
        kind: NpcKind::Merchant,
        is_shop: true,
        shop_kind: Some(shop_kind),
        shop_items: stock_for(rng, shop_kind),
        dialogue_lines: draw_distinct(rng, GREETING_LINES, 2),
    }
}

/// Base prices jittered per shop so two merchants never quote the same list.
fn stock_for(rng: &mut RandomStream, shop_kind: ShopKind) -> Vec<ShopItem> {
    let table = match shop_kind {
        ShopKind::Weapons => WEAPON_STOCK,
        ShopKind::Armor => ARMOR_STOCK,
        ShopKind::Potions => POTION_STOCK,
        ShopKind::General => GENERAL_STOCK,
    };
    table
        .iter()
        .map(|&(name, base)| {
            let jitter = rng.range_i32(-(base as i32 / 10), base as i32 / 10);
            ShopItem { name, price: (base as i32 + jitter).max(1) as u32 }
        })
        .collect()
}

/// Villagers, guards, elders, and children wandering the streets outside any
/// building footprint.
fn place_roaming(
    cells: &Grid<CellKind>,
    heights: &Grid<f64>,
    rng: &mut RandomStream,
    buildings: &[Room],
    options: &MapOptions,
    npcs: &mut Vec<NpcSpawn>,
) {
    const ROAMING_KINDS: [NpcKind; 4] =
        [NpcKind::Villager, NpcKind::Guard, NpcKind::Elder, NpcKind::Child];

    let mut pool: Vec<Pos> = Vec::new();
    for y in 0..cells.height() as i32 {
        for x in 0..cells.width() as i32 {
            let pos = Pos { x, y };
            if grid::is_walkable(cells, heights, x, y)
                && !buildings.iter().any(|building| building.contains(pos))
            {
                pool.push(pos);
            }
        }
    }

    let target = (pool.len() as f64 * options.npc_density) as usize;
    for _ in 0..target.min(pool.len()) {
        let index = rng.range_usize(0, pool.len() - 1);
        let pos = pool.swap_remove(index);
        let kind = *rng.pick(&ROAMING_KINDS);
        let line_count = rng.range_usize(1, 3);
        npcs.push(NpcSpawn {
            pos,
            kind,
            is_shop: false,
            shop_kind: None,
            shop_items: Vec::new(),
            dialogue_lines: draw_distinct(rng, FLAVOR_LINES, line_count),
        });
    }
}

/// Draws `count` distinct lines from the table, preserving no particular
/// order.
fn draw_distinct(
    rng: &mut RandomStream,
    table: &[&'static str],
    count: usize,
) -> Vec<&'static str> {
    let mut indices: Vec<usize> = (0..table.len()).collect();
    let mut lines = Vec::with_capacity(count.min(table.len()));
    for _ in 0..count.min(table.len()) {
        let pick = rng.range_usize(0, indices.len() - 1);
        lines.push(table[indices.swap_remove(pick)]);
    }
    lines
}
