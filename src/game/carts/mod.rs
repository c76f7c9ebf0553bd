// Cart collision handling
//
// - `filter`: per-vehicle collision exclusions
// - `joints`: couplings between vehicles
// - `impulse`: contact impulses between vehicles and characters
// - `ridable`: riders mounted in carts

pub mod filter;
pub mod impulse;
pub mod joints;
pub mod ridable;

pub use filter::CollisionFilters;
pub use impulse::{CartImpulseSystem, CollisionResponse, ContactBody, Impulse};
pub use joints::{JointLink, JointLinks};
pub use ridable::RidableCarts;

use crate::engine::EntityId;

/// Cart management errors
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Cart {cart} already carries {rider}")]
    AlreadyRidden { cart: EntityId, rider: EntityId },

    #[error("{rider} is already riding cart {cart}")]
    AlreadyRiding { rider: EntityId, cart: EntityId },

    #[error("Entity {0} cannot ride itself")]
    SelfMount(EntityId),

    #[error("Entity {0} is not a rail vehicle")]
    NotAVehicle(EntityId),
}
