// Rewrites rail pieces around a changed cell so they follow their neighbors

use log::{trace, warn};

use crate::core::{Location, Side};
use crate::game::world::{BlockId, WorldProvider};

use super::family::PlacementContext;
use super::RailError;

/// Vertical offsets scanned around a changed cell, covering slopes
const CHECK_ON_HEIGHT: [i32; 3] = [-1, 0, 1];

/// Re-evaluate the twelve rail candidates around `location`
///
/// Returns every cell that was rewritten, in write order. Callers treat each
/// returned cell as a fresh block change. A neighbor whose identifier does not
/// decode is skipped and the rest of the scan continues.
pub fn resolve<W: WorldProvider + ?Sized>(world: &mut W, location: Location) -> Vec<Location> {
    let mut written = Vec::new();

    for height in CHECK_ON_HEIGHT {
        for side in Side::HORIZONTAL {
            let neighbor = location.offset(side).raised(height);
            match rewrite_for(world, neighbor) {
                Ok(Some(block)) => {
                    trace!("Rewriting rail at {} to {:?}", neighbor, block);
                    world.set_block(neighbor, block);
                    written.push(neighbor);
                }
                Ok(None) => {}
                Err(err) => warn!("Skipping rail update at {}: {}", neighbor, err),
            }
        }
    }

    written
}

/// The block `location` should be rewritten to, if any
fn rewrite_for<W: WorldProvider + ?Sized>(world: &W, location: Location) -> Result<Option<BlockId>, RailError> {
    let current = world.block(location);
    let registry = world.registry();
    let Some(family) = registry.rail_family(current) else {
        return Ok(None);
    };

    let Some(updated) = family.evaluate(&PlacementContext::neutral(location), world) else {
        return Ok(None);
    };
    if updated == current {
        return Ok(None);
    }

    // Curves, crossings and hand-laid junctions keep their shape
    if registry.rail_connections(current)?.count() > 1 {
        return Ok(None);
    }
    Ok(Some(updated))
}
