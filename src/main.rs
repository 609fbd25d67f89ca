//! Hollowvale - Entry Point
//!
//! Generates a dungeon floor, the town or a building interior from a seed and
//! prints it, lit from the player's start position.
//!
//! Usage: hollowvale [dungeon|town|building <category>] [seed] [--reveal]

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hollowvale::world::generation::{
    generate_dungeon_with, generate_interior_with, generate_town_with,
};
use hollowvale::world::update_visibility;
use hollowvale::{BuildingCategory, GenConfig, Grid, Position, Tile};

const CONFIG_PATH: &str = "assets/data/worldgen.ron";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Hollowvale v{}", env!("CARGO_PKG_VERSION"));

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let reveal = take_flag(&mut args, "--reveal");
    let mut args = args.into_iter();

    let mode = args.next().unwrap_or_else(|| "dungeon".to_string());
    let category = if mode == "building" {
        let name = args
            .next()
            .context("building needs a category: inn, shop, blacksmith, home or crypt")?;
        Some(parse_category(&name)?)
    } else {
        None
    };
    let seed = match args.next() {
        Some(s) => s.parse::<u64>().with_context(|| format!("invalid seed {:?}", s))?,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
    };

    let config = GenConfig::load_or_default(CONFIG_PATH);
    let mut rng = StdRng::seed_from_u64(seed);

    // Occupants drawn over the map besides the player
    let mut marks: Vec<(Position, char)> = Vec::new();

    let mut grid = match (mode.as_str(), category) {
        ("dungeon", _) => {
            let dungeon = generate_dungeon_with(&mut rng, &config.dungeon);
            let mut grid = dungeon.grid;
            // The game state drops a way home somewhere on every floor
            let portal = grid.find_random_floor_tile_with(&mut rng, config.floor_sample_tries)?;
            grid.set_tile(portal.x, portal.y, Tile::TownPortal);
            println!(
                "{} rooms, start {:?}, exit {:?}",
                dungeon.rooms.len(),
                dungeon.start,
                dungeon.exit
            );
            grid
        }
        ("town", _) => {
            let town = generate_town_with(&mut rng, &config.town);
            for lot in &town.lots {
                println!("{:<10} door {:?}", lot.category.name(), lot.door);
            }
            town.grid
        }
        ("building", Some(category)) => {
            let building = generate_interior_with(category, &mut rng, &config.building);
            if let Some(npc) = building.npc {
                println!("{} at {:?}: \"{}\"", npc.role.name(), npc.position, npc.role.greeting());
                marks.push((npc.position, npc.role.glyph()));
            }
            building.grid
        }
        (other, _) => bail!("unknown mode {:?}, expected dungeon, town or building", other),
    };

    let start = grid.start;
    let visible = update_visibility(&mut grid, start, config.fov_radius);
    println!("seed {}, {} cells visible from {:?}", seed, visible.len(), start);
    marks.push((start, '@'));
    print!("{}", render(&grid, &marks, reveal));

    Ok(())
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn parse_category(name: &str) -> Result<BuildingCategory> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "inn" => BuildingCategory::Inn,
        "shop" => BuildingCategory::Shop,
        "blacksmith" => BuildingCategory::Blacksmith,
        "home" => BuildingCategory::Home,
        "crypt" => BuildingCategory::Crypt,
        other => bail!("unknown building category {:?}", other),
    })
}

/// ASCII map with each mark drawn over its cell, later marks on top
fn render(grid: &Grid, marks: &[(Position, char)], reveal: bool) -> String {
    let mut lines: Vec<Vec<char>> = grid
        .to_ascii(!reveal)
        .lines()
        .map(|line| line.chars().collect())
        .collect();
    for &(pos, glyph) in marks {
        let visible = reveal || grid.is_visible_now(pos.x, pos.y);
        if !visible || pos.x < 0 || pos.y < 0 {
            continue;
        }
        if let Some(cell) = lines
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
        {
            *cell = glyph;
        }
    }
    lines
        .into_iter()
        .map(|row| row.into_iter().collect::<String>() + "\n")
        .collect()
}
