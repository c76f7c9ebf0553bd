// Block type registry

use std::collections::HashMap;
use std::fmt;

use crate::core::{Side, SideFlags};
use crate::game::rails::{RailError, RailFamily};

/// Identifier of a registered block variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockId(pub(crate) u16);

impl BlockId {
    /// Empty cell, always registered first
    pub const AIR: BlockId = BlockId(0);

    pub fn is_air(&self) -> bool {
        *self == Self::AIR
    }
}

/// Identifier of a registered block family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FamilyId(pub(crate) u16);

/// `family:identifier` name of a block variant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockUri {
    family: String,
    identifier: String,
}

impl BlockUri {
    pub fn new(family: &str, identifier: &str) -> Self {
        Self {
            family: family.to_string(),
            identifier: identifier.to_string(),
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl fmt::Display for BlockUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family, self.identifier)
    }
}

/// Static properties of one block variant
#[derive(Debug, Clone)]
pub struct BlockDef {
    pub uri: BlockUri,
    pub family: FamilyId,
    /// Health given to the block entity when placed
    pub hardness: i32,
}

/// How a family picks the variant to place
#[derive(Debug, Clone)]
pub enum BlockFamily {
    /// Always places the same block
    Single(BlockId),
    Rail(RailFamily),
}

#[derive(Debug, Clone)]
struct FamilyEntry {
    name: String,
    family: BlockFamily,
}

/// All known block variants and the families they belong to
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    blocks: Vec<BlockDef>,
    families: Vec<FamilyEntry>,
    by_uri: HashMap<BlockUri, BlockId>,
}

impl BlockRegistry {
    /// Create a registry containing only air
    pub fn new() -> Self {
        let air = BlockUri::new("engine:air", "default");
        let family = FamilyId(0);
        Self {
            blocks: vec![BlockDef {
                uri: air.clone(),
                family,
                hardness: 0,
            }],
            families: vec![FamilyEntry {
                name: air.family().to_string(),
                family: BlockFamily::Single(BlockId::AIR),
            }],
            by_uri: HashMap::from([(air, BlockId::AIR)]),
        }
    }

    /// Register a plain block that forms its own family
    pub fn register_block(&mut self, name: &str, hardness: i32) -> Result<BlockId, RailError> {
        let family = self.next_family_id()?;
        let id = self.push_block(BlockUri::new(name, "default"), family, hardness)?;
        self.families.push(FamilyEntry {
            name: name.to_string(),
            family: BlockFamily::Single(id),
        });
        Ok(id)
    }

    /// Register an auto-connecting track family with one variant per connection mask
    pub fn register_track(&mut self, name: &str, hardness: i32) -> Result<FamilyId, RailError> {
        let family = self.next_family_id()?;
        self.reserve_blocks(usize::from(SideFlags::all().bits()) + 1)?;
        let mut variants = HashMap::new();
        for bits in 0..=SideFlags::all().bits() {
            if let Some(flags) = SideFlags::from_bits(bits) {
                let id =
                    self.push_block(BlockUri::new(name, &flags.identifier()), family, hardness)?;
                variants.insert(flags, id);
            }
        }
        self.families.push(FamilyEntry {
            name: name.to_string(),
            family: BlockFamily::Rail(RailFamily::Track { variants }),
        });
        Ok(family)
    }

    /// Register a fixed four-way crossing
    pub fn register_crossing(&mut self, name: &str, hardness: i32) -> Result<FamilyId, RailError> {
        let family = self.next_family_id()?;
        let flags = SideFlags::from_sides(Side::HORIZONTAL);
        let block = self.push_block(BlockUri::new(name, &flags.identifier()), family, hardness)?;
        self.families.push(FamilyEntry {
            name: name.to_string(),
            family: BlockFamily::Rail(RailFamily::Crossing { block }),
        });
        Ok(family)
    }

    /// Add an extra variant to an existing rail family
    ///
    /// The variant is never chosen by evaluation; it only exists when placed
    /// directly.
    pub fn register_rail_variant(
        &mut self,
        family: FamilyId,
        identifier: &str,
        hardness: i32,
    ) -> Result<BlockId, RailError> {
        let entry = self
            .families
            .get(family.0 as usize)
            .ok_or(RailError::UnknownFamily(family))?;
        if !matches!(entry.family, BlockFamily::Rail(_)) {
            return Err(RailError::NotARailFamily(entry.name.clone()));
        }
        let name = entry.name.clone();
        self.push_block(BlockUri::new(&name, identifier), family, hardness)
    }

    fn next_family_id(&self) -> Result<FamilyId, RailError> {
        u16::try_from(self.families.len())
            .map(FamilyId)
            .map_err(|_| RailError::RegistryFull)
    }

    /// Fail up front if `count` more blocks would run out of ids, so a family
    /// is never left half registered
    fn reserve_blocks(&self, count: usize) -> Result<(), RailError> {
        let last = self.blocks.len() + count - 1;
        if u16::try_from(last).is_err() {
            return Err(RailError::RegistryFull);
        }
        Ok(())
    }

    fn push_block(
        &mut self,
        uri: BlockUri,
        family: FamilyId,
        hardness: i32,
    ) -> Result<BlockId, RailError> {
        let id = u16::try_from(self.blocks.len())
            .map(BlockId)
            .map_err(|_| RailError::RegistryFull)?;
        self.by_uri.insert(uri.clone(), id);
        self.blocks.push(BlockDef {
            uri,
            family,
            hardness,
        });
        Ok(id)
    }

    pub fn get(&self, block: BlockId) -> Option<&BlockDef> {
        self.blocks.get(block.0 as usize)
    }

    /// Look up a variant by its `family:identifier` uri
    pub fn find(&self, family: &str, identifier: &str) -> Option<BlockId> {
        self.by_uri.get(&BlockUri::new(family, identifier)).copied()
    }

    pub fn family(&self, family: FamilyId) -> Option<&BlockFamily> {
        self.families.get(family.0 as usize).map(|entry| &entry.family)
    }

    pub fn family_of(&self, block: BlockId) -> Option<&BlockFamily> {
        self.get(block).and_then(|def| self.family(def.family))
    }

    /// The rail family of a block, if it is a rail
    pub fn rail_family(&self, block: BlockId) -> Option<&RailFamily> {
        match self.family_of(block) {
            Some(BlockFamily::Rail(rail)) => Some(rail),
            _ => None,
        }
    }

    pub fn is_rail(&self, block: BlockId) -> bool {
        self.rail_family(block).is_some()
    }

    /// Decode the connection mask carried in a rail block's identifier
    pub fn rail_connections(&self, block: BlockId) -> Result<SideFlags, RailError> {
        let def = self.get(block).ok_or(RailError::UnknownBlock(block))?;
        if !self.is_rail(block) {
            return Err(RailError::NotARail(def.uri.clone()));
        }
        SideFlags::parse(def.uri.identifier())
            .ok_or_else(|| RailError::InvalidConnectionEncoding(def.uri.clone()))
    }

    /// The track variant of `family` with exactly these connections
    pub fn track_variant(&self, family: FamilyId, connections: SideFlags) -> Option<BlockId> {
        match self.family(family) {
            Some(BlockFamily::Rail(RailFamily::Track { variants })) => {
                variants.get(&connections).copied()
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
