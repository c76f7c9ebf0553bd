// In-memory voxel world

use std::collections::HashMap;

use crate::core::Location;
use crate::engine::EntityId;
use crate::game::rails::PlacementContext;

use super::registry::{BlockFamily, BlockId, BlockRegistry, FamilyId};

/// Block storage consumed by the rail systems
pub trait WorldProvider {
    /// Block currently at `location`, air when nothing was placed
    fn block(&self, location: Location) -> BlockId;

    /// Write a block, returning the one it replaced
    fn set_block(&mut self, location: Location, block: BlockId) -> BlockId;

    fn registry(&self) -> &BlockRegistry;

    /// Entity backing the block at `location`
    fn block_entity_at(&self, location: Location) -> Option<EntityId>;

    /// Whether the cell holds a rail piece
    fn is_rail_at(&self, location: Location) -> bool {
        self.registry().is_rail(self.block(location))
    }
}

/// Sparse block map plus the block entities attached to placed cells
#[derive(Debug, Clone)]
pub struct VoxelWorld {
    registry: BlockRegistry,
    blocks: HashMap<Location, BlockId>,
    block_entities: HashMap<Location, EntityId>,
}

impl VoxelWorld {
    pub fn new(registry: BlockRegistry) -> Self {
        Self {
            registry,
            blocks: HashMap::new(),
            block_entities: HashMap::new(),
        }
    }

    pub fn registry_mut(&mut self) -> &mut BlockRegistry {
        &mut self.registry
    }

    /// Attach or detach the entity backing a cell
    pub fn set_block_entity(&mut self, location: Location, entity: Option<EntityId>) {
        match entity {
            Some(entity) => {
                self.block_entities.insert(location, entity);
            }
            None => {
                self.block_entities.remove(&location);
            }
        }
    }

    /// Variant a family would place in the given context
    pub fn block_for_placement(&self, family: FamilyId, context: &PlacementContext) -> Option<BlockId> {
        match self.registry.family(family)? {
            BlockFamily::Single(block) => Some(*block),
            BlockFamily::Rail(rail) => rail.evaluate(context, self),
        }
    }

    /// Number of non-air cells
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl WorldProvider for VoxelWorld {
    fn block(&self, location: Location) -> BlockId {
        self.blocks.get(&location).copied().unwrap_or(BlockId::AIR)
    }

    fn set_block(&mut self, location: Location, block: BlockId) -> BlockId {
        let previous = if block.is_air() {
            self.blocks.remove(&location)
        } else {
            self.blocks.insert(location, block)
        };
        previous.unwrap_or(BlockId::AIR)
    }

    fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    fn block_entity_at(&self, location: Location) -> Option<EntityId> {
        self.block_entities.get(&location).copied()
    }
}
