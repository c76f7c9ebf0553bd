// Entity identifiers and component masks used for handler filtering

/// Stable identifier of a game entity; never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

bitflags::bitflags! {
    /// Set of components an entity carries
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ComponentMask: u32 {
        /// World position
        const TRANSFORM = 1 << 0;

        /// Vehicle constrained to the rail network
        const RAIL_VEHICLE = 1 << 1;

        /// Mass for collision response
        const RIGID_BODY = 1 << 2;

        /// Player or NPC with its own movement state
        const CHARACTER = 1 << 3;

        /// Entity backing a placed block
        const BLOCK = 1 << 4;

        /// Inventory item that places blocks
        const BLOCK_ITEM = 1 << 5;

        /// Can take damage and be destroyed
        const HEALTH = 1 << 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_components() {
        let cart = ComponentMask::TRANSFORM | ComponentMask::RAIL_VEHICLE | ComponentMask::RIGID_BODY;
        let required = ComponentMask::RAIL_VEHICLE | ComponentMask::RIGID_BODY;
        assert!(cart.contains(required));
        assert!(cart.contains(ComponentMask::empty()));
        assert!(!required.contains(cart));
        assert!(!cart.contains(ComponentMask::CHARACTER));
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId::from_u64(42).to_string(), "entity#42");
    }
}
