// Rail families: choosing the track shape for a cell

use std::collections::HashMap;

use glam::Vec3;

use crate::core::{Location, Side, SideFlags};
use crate::game::world::{BlockId, WorldProvider};

/// Where and how a block is being placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementContext {
    pub location: Location,
    /// Side of the target the player approached from
    pub approach: Side,
    /// Hit point inside the cell
    pub offset: Vec3,
}

impl PlacementContext {
    pub fn new(location: Location, approach: Side, offset: Vec3) -> Self {
        Self {
            location,
            approach,
            offset,
        }
    }

    /// Context used when re-evaluating an existing piece
    pub fn neutral(location: Location) -> Self {
        Self::new(location, Side::Front, Vec3::ZERO)
    }
}

/// A group of rail variants that can pick its own shape
#[derive(Debug, Clone)]
pub enum RailFamily {
    /// Track that connects to up to two neighboring rails, sloping up to
    /// meet a rail one cell higher
    Track { variants: HashMap<SideFlags, BlockId> },

    /// Fixed four-way crossing
    Crossing { block: BlockId },
}

impl RailFamily {
    /// The variant this family wants at `context`, given the current neighbors
    pub fn evaluate<W: WorldProvider + ?Sized>(
        &self,
        context: &PlacementContext,
        world: &W,
    ) -> Option<BlockId> {
        match self {
            RailFamily::Track { variants } => {
                let connections = track_connections(context, world);
                variants.get(&connections).copied()
            }
            RailFamily::Crossing { block } => Some(*block),
        }
    }
}

fn track_connections<W: WorldProvider + ?Sized>(context: &PlacementContext, world: &W) -> SideFlags {
    // Scan starting from the approach side so it wins ties
    let start = Side::HORIZONTAL
        .iter()
        .position(|side| *side == context.approach)
        .unwrap_or(0);

    let mut connections = SideFlags::empty();
    let mut sloped = false;

    for i in 0..Side::HORIZONTAL.len() {
        if connections.horizontal_count() >= 2 {
            break;
        }
        let side = Side::HORIZONTAL[(start + i) % Side::HORIZONTAL.len()];
        let beside = context.location.offset(side);
        let toward = side.reverse();

        if accepts_connection(world, beside, toward) || accepts_connection(world, beside.below(), toward) {
            connections.insert(side.flag());
        } else if !sloped && accepts_connection(world, beside.above(), toward) {
            connections.insert(side.flag());
            sloped = true;
        }
    }

    if sloped {
        connections.insert(SideFlags::TOP);
    }
    connections
}

/// Whether the rail at `location` can take a connection on side `toward`
fn accepts_connection<W: WorldProvider + ?Sized>(world: &W, location: Location, toward: Side) -> bool {
    let registry = world.registry();
    let block = world.block(location);
    if !registry.is_rail(block) {
        return false;
    }
    match registry.rail_connections(block) {
        Ok(connections) => connections.horizontal_count() < 2 || connections.contains(toward.flag()),
        Err(_) => false,
    }
}
