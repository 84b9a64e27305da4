use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rpgmap_core::mapgen::{generate_map, MapOptions, RandomStream};
use rpgmap_core::pathfinding::PathfindingGrid;
use rpgmap_core::types::{CellKind, Difficulty, EnemyTier, MapType, Pos};
use std::fs;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map type to generate
    #[arg(short, long, value_enum, default_value_t = MapKindArg::Dungeon)]
    map: MapKindArg,
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = DifficultyArg::Normal)]
    difficulty: DifficultyArg,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    /// Path to a JSON file with full generation options; CLI flags override
    /// its seed, size, and difficulty
    #[arg(short, long)]
    options: Option<String>,
    /// Emit the spawn lists as JSON instead of the ASCII render
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum MapKindArg {
    Dungeon,
    Field,
    Arena,
    Town,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Normal,
    Nightmare,
    Hell,
}

impl From<MapKindArg> for MapType {
    fn from(value: MapKindArg) -> Self {
        match value {
            MapKindArg::Dungeon => MapType::Dungeon,
            MapKindArg::Field => MapType::Field,
            MapKindArg::Arena => MapType::Arena,
            MapKindArg::Town => MapType::Town,
        }
    }
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Nightmare => Difficulty::Nightmare,
            DifficultyArg::Hell => Difficulty::Hell,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut options = match &args.options {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file: {path}"))?;
            serde_json::from_str::<MapOptions>(&data)
                .with_context(|| "Failed to deserialize options JSON")?
        }
        None => MapOptions::default(),
    };
    options.seed = args.seed;
    options.difficulty = args.difficulty.into();
    if let Some(width) = args.width {
        options.width = width;
    }
    if let Some(height) = args.height {
        options.height = height;
    }

    let map = generate_map(args.map.into(), &options);

    if args.json {
        let dump = serde_json::json!({
            "map_type": map.map_type,
            "difficulty": map.difficulty,
            "width": map.width,
            "height": map.height,
            "rooms": map.rooms,
            "enemy_spawns": map.enemy_spawns,
            "npc_spawns": map.npc_spawns,
        });
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    render_ascii(&map);
    print_stats(&map);
    demo_path(&map);
    Ok(())
}

fn render_ascii(map: &rpgmap_core::MapModel) {
    for y in 0..map.height as i32 {
        let mut line = String::with_capacity(map.width);
        for x in 0..map.width as i32 {
            line.push(glyph(map, Pos { x, y }));
        }
        println!("{line}");
    }
}

fn glyph(map: &rpgmap_core::MapModel, pos: Pos) -> char {
    for spawn in &map.enemy_spawns {
        if spawn.pos == pos {
            return match spawn.tier {
                EnemyTier::Normal => 'e',
                EnemyTier::Elite => 'E',
                EnemyTier::Boss => 'B',
            };
        }
    }
    if map.npc_spawns.iter().any(|npc| npc.pos == pos) {
        return '@';
    }
    if map.rooms.iter().any(|room| room.door == pos) {
        return '+';
    }
    match map.placement.at(pos.x, pos.y) {
        Some(CellKind::Floor) => '.',
        Some(CellKind::Water) => '~',
        Some(CellKind::Chest) => '$',
        Some(CellKind::Obstacle) => '%',
        Some(CellKind::Wall) | None => '#',
    }
}

fn print_stats(map: &rpgmap_core::MapModel) {
    let walkable = (0..map.height as i32)
        .flat_map(|y| (0..map.width as i32).map(move |x| (x, y)))
        .filter(|&(x, y)| map.is_walkable(x, y))
        .count();
    println!();
    println!("{:?} {}x{} ({:?})", map.map_type, map.width, map.height, map.difficulty);
    println!("Walkable cells: {walkable}");
    println!("Rooms: {}", map.rooms.len());
    println!("Enemy spawns: {}", map.enemy_spawns.len());
    println!("NPC spawns: {}", map.npc_spawns.len());
}

/// Picks two random walkable cells and paths between them, as a quick sanity
/// readout on the generated layout.
fn demo_path(map: &rpgmap_core::MapModel) {
    let mut rng = RandomStream::new(map.width as u64 ^ map.height as u64);
    let start = map.random_walkable_position(&mut rng);
    let goal = map.random_walkable_position(&mut rng);
    let grid = PathfindingGrid::from_model(map);
    match grid.find_path(start, goal) {
        Some(path) => println!(
            "Sample path ({},{}) -> ({},{}): {} steps",
            start.x,
            start.y,
            goal.x,
            goal.y,
            path.len()
        ),
        None => println!(
            "Sample path ({},{}) -> ({},{}): unreachable",
            start.x, start.y, goal.x, goal.y
        ),
    }
}
