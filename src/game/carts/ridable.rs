// Riders sitting in carts

use std::collections::HashMap;

use log::info;

use super::filter::CollisionFilters;
use super::CartError;
use crate::engine::EntityId;

/// Which entity rides which cart
///
/// A rider is excluded from its cart's collision response for as long as it
/// is mounted.
#[derive(Debug, Default)]
pub struct RidableCarts {
    riders: HashMap<EntityId, EntityId>,
}

impl RidableCarts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(
        &mut self,
        filters: &mut CollisionFilters,
        cart: EntityId,
        rider: EntityId,
    ) -> Result<(), CartError> {
        if cart == rider {
            return Err(CartError::SelfMount(cart));
        }
        if let Some(&current) = self.riders.get(&cart) {
            return Err(CartError::AlreadyRidden { cart, rider: current });
        }
        if let Some(other) = self.cart_of(rider) {
            return Err(CartError::AlreadyRiding { rider, cart: other });
        }

        self.riders.insert(cart, rider);
        filters.add_exclusion(cart, rider);
        info!("{} mounted cart {}", rider, cart);
        Ok(())
    }

    /// Remove the rider of `cart`, returning who it was
    pub fn dismount(&mut self, filters: &mut CollisionFilters, cart: EntityId) -> Option<EntityId> {
        let rider = self.riders.remove(&cart)?;
        filters.remove_exclusion(cart, rider);
        info!("{} left cart {}", rider, cart);
        Some(rider)
    }

    pub fn rider(&self, cart: EntityId) -> Option<EntityId> {
        self.riders.get(&cart).copied()
    }

    pub fn cart_of(&self, rider: EntityId) -> Option<EntityId> {
        self.riders
            .iter()
            .find(|(_, &r)| r == rider)
            .map(|(&cart, _)| cart)
    }

    /// Drop any ride involving a destroyed entity
    pub fn forget(&mut self, filters: &mut CollisionFilters, entity: EntityId) {
        self.dismount(filters, entity);
        if let Some(cart) = self.cart_of(entity) {
            self.dismount(filters, cart);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (EntityId, EntityId, EntityId) {
        (
            EntityId::from_u64(1),
            EntityId::from_u64(2),
            EntityId::from_u64(3),
        )
    }

    #[test]
    fn test_mount_excludes_rider() {
        let (cart, rider, _) = ids();
        let mut filters = CollisionFilters::new();
        let mut carts = RidableCarts::new();

        carts.mount(&mut filters, cart, rider).unwrap();
        assert_eq!(carts.rider(cart), Some(rider));
        assert_eq!(carts.cart_of(rider), Some(cart));
        assert!(filters.is_excluded(cart, rider));
    }

    #[test]
    fn test_dismount_restores_collisions() {
        let (cart, rider, _) = ids();
        let mut filters = CollisionFilters::new();
        let mut carts = RidableCarts::new();

        carts.mount(&mut filters, cart, rider).unwrap();
        assert_eq!(carts.dismount(&mut filters, cart), Some(rider));
        assert!(!filters.is_excluded(cart, rider));
        assert_eq!(carts.dismount(&mut filters, cart), None);
    }

    #[test]
    fn test_one_rider_per_cart() {
        let (cart, rider, other) = ids();
        let mut filters = CollisionFilters::new();
        let mut carts = RidableCarts::new();

        carts.mount(&mut filters, cart, rider).unwrap();
        let err = carts.mount(&mut filters, cart, other).unwrap_err();
        assert!(matches!(err, CartError::AlreadyRidden { .. }));
        assert!(!filters.is_excluded(cart, other));
    }

    #[test]
    fn test_rider_in_one_cart() {
        let (cart, rider, second_cart) = ids();
        let mut filters = CollisionFilters::new();
        let mut carts = RidableCarts::new();

        carts.mount(&mut filters, cart, rider).unwrap();
        let err = carts.mount(&mut filters, second_cart, rider).unwrap_err();
        assert!(matches!(err, CartError::AlreadyRiding { .. }));
    }

    #[test]
    fn test_self_mount_rejected() {
        let (cart, _, _) = ids();
        let mut filters = CollisionFilters::new();
        let mut carts = RidableCarts::new();
        assert!(carts.mount(&mut filters, cart, cart).is_err());
    }

    #[test]
    fn test_forget_rider() {
        let (cart, rider, _) = ids();
        let mut filters = CollisionFilters::new();
        let mut carts = RidableCarts::new();

        carts.mount(&mut filters, cart, rider).unwrap();
        carts.forget(&mut filters, rider);
        assert_eq!(carts.rider(cart), None);
        assert!(!filters.is_excluded(cart, rider));
    }
}
