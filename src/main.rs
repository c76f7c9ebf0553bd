use std::time::Duration;

use anyhow::{anyhow, Result};
use glam::Vec3;
use log::info;

use railcart::core::{Location, Side, SideFlags};
use railcart::game::events::CollideEvent;
use railcart::game::world::{BlockRegistry, WorldProvider};
use railcart::game::Game;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting railcart demo...");

    let mut registry = BlockRegistry::new();
    let stone = registry.register_block("core:stone", 10)?;
    let track = registry.register_track("rails:track", 5)?;
    let bare = registry
        .track_variant(track, SideFlags::empty())
        .ok_or_else(|| anyhow!("track family has no bare variant"))?;

    let mut game = Game::new(registry);

    // Lay a straight line in one bulk edit
    game.sim.begin_bulk_edit();
    for x in 0..16 {
        game.sim.set_block(Location::new(x, 0, 0), stone);
        game.sim.set_block(Location::new(x, 1, 0), bare);
    }
    game.sim.end_bulk_edit()?;

    let world = &game.sim.world;
    for x in [0, 1, 8, 15] {
        let location = Location::new(x, 1, 0);
        let block = world.block(location);
        let connections = world.registry().rail_connections(block)?;
        info!(
            "Rail at {} connects {:?}",
            location,
            connections.sides().collect::<Vec<Side>>()
        );
    }

    // Extend the line with an item, the new piece joins the end
    let item = game.sim.entities.spawn_block_item(track);
    let end = Location::new(16, 1, 0);
    game.sim.set_block(end.below(), stone);
    if game.use_item(item, Some(end.below()), end, Side::Top) {
        let block = game.sim.world.block(end);
        info!(
            "Placed {} at {}",
            game.sim.world.registry().rail_connections(block)?.identifier(),
            end
        );
    }

    // Two carts meeting head-on
    let a = game
        .sim
        .entities
        .spawn_cart(Vec3::new(3.0, 1.5, 0.0), Vec3::new(2.0, 0.0, 0.0), 10.0);
    let b = game
        .sim
        .entities
        .spawn_cart(Vec3::new(4.0, 1.5, 0.0), Vec3::new(-2.0, 0.0, 0.0), 10.0);
    game.collide(
        a,
        CollideEvent {
            other: b,
            normal: Vec3::X,
            penetration: 0.05,
        },
    );
    for cart in [a, b] {
        if let Some(vehicle) = game.sim.entities.rail_vehicle(cart) {
            info!("Cart {} velocity after impact: {}", cart, vehicle.velocity);
        }
    }

    // Knock out the support under one rail and let the damage settle
    game.destroy_block(Location::new(8, 0, 0));
    let ticks = game.advance(Duration::from_millis(100));
    info!(
        "Ran {} tick(s), rail above the hole is {}",
        ticks,
        if game.sim.world.is_rail_at(Location::new(8, 1, 0)) {
            "still there"
        } else {
            "gone"
        }
    );

    info!("Demo finished, {} non-air cells remain", game.sim.world.len());
    Ok(())
}
