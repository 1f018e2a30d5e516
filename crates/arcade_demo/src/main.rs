//! Collision Demo
//!
//! Headless platformer level driven by the collision registry:
//! - A floor and two walls built from 32px tiles
//! - A one-way ledge the player can jump through from below
//! - Coins that remove themselves from the registry when touched
//!
//! Usage: `arcade_demo [config.toml|config.ron]`

mod entities;

use std::error::Error;

use arcade_collision::foundation::logging;
use arcade_collision::prelude::*;

use entities::{Coin, Player, Tile};

// Simulation settings
const TICK_RATE: f32 = 60.0;
const TICKS: usize = 300;
const JUMP_EVERY: usize = 75;

const TILE: f32 = 32.0;

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading collision config from {path}");
            CollisionConfig::load_from_file(&path)?
        }
        None => CollisionConfig::default(),
    };
    config.validate()?;

    let bounds = config.world_bounds;
    let mut scopes = CollisionScopes::new();
    let mut level = scopes.begin_scope_with(CollisionRegistry::with_config(bounds, config.quadtree));

    // Level geometry
    let mut tiles = Vec::new();
    let columns = (bounds.width / TILE) as usize;
    for column in 0..columns {
        let x = bounds.left() + column as f32 * TILE;
        tiles.push(Tile::solid(Aabb::new(x, bounds.bottom() - TILE, TILE, TILE)));
    }
    for row in 2..5 {
        let y = bounds.bottom() - row as f32 * TILE;
        tiles.push(Tile::solid(Aabb::new(bounds.left(), y, TILE, TILE)));
        tiles.push(Tile::solid(Aabb::new(bounds.right() - TILE, y, TILE, TILE)));
    }
    tiles.push(Tile::platform(Aabb::new(
        bounds.left() + 6.0 * TILE,
        bounds.bottom() - 4.0 * TILE,
        4.0 * TILE,
        8.0,
    )));
    for tile in &tiles {
        level.register_static(tile);
    }

    let coins: Vec<_> = (0..6)
        .map(|i| {
            Coin::new(Vec2::new(
                bounds.left() + (3.0 + 3.0 * i as f32) * TILE,
                bounds.bottom() - 1.5 * TILE,
            ))
        })
        .collect();
    for coin in &coins {
        level.register_static(coin);
    }

    let player = Player::new(Vec2::new(bounds.left() + 2.0 * TILE, bounds.bottom() - 4.0 * TILE));
    level.register_moving(&player);

    log::info!(
        "Level ready: {} tiles, {} coins, bounds {:?}",
        tiles.len(),
        coins.len(),
        bounds
    );

    let delta_time = 1.0 / TICK_RATE;
    let mut contacts = 0;
    for tick in 0..TICKS {
        player.borrow_mut().step(delta_time, tick % JUMP_EVERY == 0);

        let Some(report) = level.tick(delta_time) else {
            break;
        };
        contacts += report.collisions;
        if !report.removed.is_empty() {
            log::debug!("Tick {tick}: removed {:?}", report.removed);
        }
    }

    let player = player.borrow();
    let registry = level.current().ok_or("collision scope closed during the run")?;
    let node_count = registry
        .spatial_index()
        .as_any()
        .downcast_ref::<Quadtree>()
        .map_or(0, Quadtree::node_count);

    log::info!(
        "Finished {TICKS} ticks: {contacts} contacts, {} coins, grounded: {}, player at {:?}",
        player.coins,
        player.grounded,
        player.bounds().top_left()
    );
    log::info!(
        "{} objects still registered across {node_count} quadtree nodes",
        registry.object_count()
    );

    Ok(())
}
