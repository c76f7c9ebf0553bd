// Rail network maintenance
//
// - `family`: rail families and how they pick a shape for a cell
// - `resolver`: rewrites rail pieces around a changed cell
// - `update`: batches block changes into fixed-point propagation passes and
//   reacts to placement and destruction

pub mod family;
pub mod resolver;
pub mod update;

pub use family::{PlacementContext, RailFamily};
pub use update::RailUpdateSystem;

use crate::game::world::{BlockId, BlockUri, FamilyId};

/// Rail maintenance errors
#[derive(Debug, thiserror::Error)]
pub enum RailError {
    #[error("Bulk edit finished more times than it was started")]
    UnbalancedBulkEdit,

    #[error("Rail identifier does not decode to a connection mask: {0}")]
    InvalidConnectionEncoding(BlockUri),

    #[error("Block is not a rail: {0}")]
    NotARail(BlockUri),

    #[error("Family is not a rail family: {0}")]
    NotARailFamily(String),

    #[error("Unknown block id {0:?}")]
    UnknownBlock(BlockId),

    #[error("Unknown family id {0:?}")]
    UnknownFamily(FamilyId),

    #[error("Block registry has run out of ids")]
    RegistryFull,
}
