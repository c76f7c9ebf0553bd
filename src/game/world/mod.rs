// Voxel world state: block registry and block storage

mod registry;
mod voxel;

pub use registry::{BlockDef, BlockFamily, BlockId, BlockRegistry, BlockUri, FamilyId};
pub use voxel::{VoxelWorld, WorldProvider};
