// Batches block changes into rail propagation passes

use std::collections::HashSet;

use log::{debug, error};

use crate::core::Location;
use crate::game::events::{DamageType, EntityMessage};
use crate::game::settings::RailSettings;
use crate::game::world::WorldProvider;

use super::resolver;
use super::RailError;

/// Keeps the rail network consistent as blocks change
///
/// Changes reported while a bulk edit is open are collected and resolved
/// together when the outermost scope closes. Resolution itself runs inside
/// an extra scope, so the rewrites it makes are queued for the next pass of
/// the same worklist instead of recursing.
#[derive(Debug)]
pub struct RailUpdateSystem {
    settings: RailSettings,

    /// Open bulk-edit scopes, plus one while a flush runs
    depth: u32,

    /// Cells waiting to be resolved
    pending: HashSet<Location>,
}

impl RailUpdateSystem {
    pub fn new(settings: RailSettings) -> Self {
        Self {
            settings,
            depth: 0,
            pending: HashSet::new(),
        }
    }

    /// Number of open scopes
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, location: Location) -> bool {
        self.pending.contains(&location)
    }

    /// Start buffering change notifications
    pub fn begin_bulk_edit(&mut self) {
        self.depth += 1;
    }

    /// Close a bulk-edit scope, resolving everything buffered once the last one closes
    ///
    /// An unmatched call leaves the depth at zero and returns an error.
    pub fn end_bulk_edit<W: WorldProvider + ?Sized>(&mut self, world: &mut W) -> Result<(), RailError> {
        if self.depth == 0 {
            return Err(RailError::UnbalancedBulkEdit);
        }

        self.depth -= 1;
        if self.depth == 0 {
            self.flush(world);
        }
        Ok(())
    }

    /// A block at `location` changed
    pub fn notify_changed<W: WorldProvider + ?Sized>(&mut self, world: &mut W, location: Location) {
        if self.depth > 0 {
            self.pending.insert(location);
        } else {
            self.resolve_now(world, location);
        }
    }

    /// Called once at the top of every simulation tick
    pub fn on_tick<W: WorldProvider + ?Sized>(&mut self, world: &mut W) {
        if self.depth == 0 {
            return;
        }

        error!(
            "Unmatched bulk edit start: {} scope(s) never finished, resetting",
            self.depth
        );
        self.depth = 0;

        // Whatever the broken scope buffered still has to be resolved
        if !self.pending.is_empty() {
            self.flush(world);
        }
    }

    /// A block item just placed a block at `location`
    pub fn on_block_placed<W: WorldProvider + ?Sized>(&mut self, world: &mut W, location: Location) {
        if world.is_rail_at(location) {
            self.resolve_now(world, location);
        }
    }

    /// Whether using a block item on `target` must be refused
    ///
    /// Rails never stack in the same cell.
    pub fn rejects_placement<W: WorldProvider + ?Sized>(&self, world: &W, target: Location) -> bool {
        world.is_rail_at(target)
    }

    /// Damage for a rail left without support by destroying `location`
    pub fn on_block_destroyed<W: WorldProvider + ?Sized>(
        &self,
        world: &W,
        location: Location,
    ) -> Option<EntityMessage> {
        let above = location.above();
        if !world.is_rail_at(above) {
            return None;
        }

        let target = world.block_entity_at(above)?;
        debug!("Rail at {} lost its support", above);
        Some(EntityMessage::Damage {
            target,
            amount: self.settings.support_damage,
            damage_type: DamageType::Direct,
        })
    }

    /// Resolve one cell immediately, then settle whatever it rewrote
    fn resolve_now<W: WorldProvider + ?Sized>(&mut self, world: &mut W, location: Location) {
        self.depth += 1;
        for changed in resolver::resolve(world, location) {
            self.notify_changed(world, changed);
        }
        self.depth -= 1;

        if self.depth == 0 {
            self.flush(world);
        }
    }

    /// Resolve pending cells until no pass produces new changes
    fn flush<W: WorldProvider + ?Sized>(&mut self, world: &mut W) {
        self.depth += 1;

        let mut passes = 0;
        loop {
            let batch = std::mem::take(&mut self.pending);
            if batch.is_empty() {
                break;
            }
            passes += 1;

            for location in batch {
                for changed in resolver::resolve(world, location) {
                    self.notify_changed(world, changed);
                }
            }
        }

        self.depth -= 1;
        if passes > 0 {
            debug!("Rail propagation settled after {} pass(es)", passes);
        }
    }
}

impl Default for RailUpdateSystem {
    fn default() -> Self {
        Self::new(RailSettings::default())
    }
}
