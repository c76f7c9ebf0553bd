// Entity storage for the components the rail systems read and write

use std::collections::HashMap;

use glam::Vec3;

use crate::core::Location;
use crate::engine::{ComponentMask, ComponentQuery, EntityId};
use crate::game::world::FamilyId;

/// Velocity of a vehicle running on rails
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RailVehicle {
    pub velocity: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub mass: f32,
}

/// Movement state owned by the character controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharacterMovement {
    pub velocity: Vec3,
}

/// Item that places blocks of a family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockItem {
    pub family: FamilyId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

/// Sparse component tables keyed by entity id
#[derive(Debug, Default)]
pub struct EntityStore {
    next_id: u64,
    transforms: HashMap<EntityId, Vec3>,
    rail_vehicles: HashMap<EntityId, RailVehicle>,
    rigid_bodies: HashMap<EntityId, RigidBody>,
    characters: HashMap<EntityId, CharacterMovement>,
    blocks: HashMap<EntityId, Location>,
    block_items: HashMap<EntityId, BlockItem>,
    healths: HashMap<EntityId, Health>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity with no components
    pub fn spawn(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    /// Spawn a rail vehicle at `position`
    pub fn spawn_cart(&mut self, position: Vec3, velocity: Vec3, mass: f32) -> EntityId {
        let id = self.spawn();
        self.transforms.insert(id, position);
        self.rail_vehicles.insert(id, RailVehicle { velocity });
        self.rigid_bodies.insert(id, RigidBody { mass });
        id
    }

    pub fn spawn_character(&mut self, position: Vec3, velocity: Vec3) -> EntityId {
        let id = self.spawn();
        self.transforms.insert(id, position);
        self.characters.insert(id, CharacterMovement { velocity });
        id
    }

    pub fn spawn_block_item(&mut self, family: FamilyId) -> EntityId {
        let id = self.spawn();
        self.block_items.insert(id, BlockItem { family });
        id
    }

    /// Spawn the entity backing a placed block
    pub fn spawn_block(&mut self, location: Location, hardness: i32) -> EntityId {
        let id = self.spawn();
        self.blocks.insert(id, location);
        self.healths.insert(id, Health::new(hardness));
        id
    }

    /// Remove every component of `entity`
    pub fn despawn(&mut self, entity: EntityId) {
        self.transforms.remove(&entity);
        self.rail_vehicles.remove(&entity);
        self.rigid_bodies.remove(&entity);
        self.characters.remove(&entity);
        self.blocks.remove(&entity);
        self.block_items.remove(&entity);
        self.healths.remove(&entity);
    }

    pub fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.transforms.get(&entity).copied()
    }

    pub fn rail_vehicle(&self, entity: EntityId) -> Option<&RailVehicle> {
        self.rail_vehicles.get(&entity)
    }

    pub fn rail_vehicle_mut(&mut self, entity: EntityId) -> Option<&mut RailVehicle> {
        self.rail_vehicles.get_mut(&entity)
    }

    pub fn rigid_body(&self, entity: EntityId) -> Option<&RigidBody> {
        self.rigid_bodies.get(&entity)
    }

    pub fn character(&self, entity: EntityId) -> Option<&CharacterMovement> {
        self.characters.get(&entity)
    }

    pub fn character_mut(&mut self, entity: EntityId) -> Option<&mut CharacterMovement> {
        self.characters.get_mut(&entity)
    }

    pub fn block_position(&self, entity: EntityId) -> Option<Location> {
        self.blocks.get(&entity).copied()
    }

    pub fn block_item(&self, entity: EntityId) -> Option<&BlockItem> {
        self.block_items.get(&entity)
    }

    pub fn health(&self, entity: EntityId) -> Option<&Health> {
        self.healths.get(&entity)
    }

    pub fn health_mut(&mut self, entity: EntityId) -> Option<&mut Health> {
        self.healths.get_mut(&entity)
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        !self.components(entity).is_empty()
    }
}

impl ComponentQuery for EntityStore {
    fn components(&self, entity: EntityId) -> ComponentMask {
        let mut mask = ComponentMask::empty();
        if self.transforms.contains_key(&entity) {
            mask.insert(ComponentMask::TRANSFORM);
        }
        if self.rail_vehicles.contains_key(&entity) {
            mask.insert(ComponentMask::RAIL_VEHICLE);
        }
        if self.rigid_bodies.contains_key(&entity) {
            mask.insert(ComponentMask::RIGID_BODY);
        }
        if self.characters.contains_key(&entity) {
            mask.insert(ComponentMask::CHARACTER);
        }
        if self.blocks.contains_key(&entity) {
            mask.insert(ComponentMask::BLOCK);
        }
        if self.block_items.contains_key(&entity) {
            mask.insert(ComponentMask::BLOCK_ITEM);
        }
        if self.healths.contains_key(&entity) {
            mask.insert(ComponentMask::HEALTH);
        }
        mask
    }
}
