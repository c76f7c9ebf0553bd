// Simulation state and the event wiring between the rail and cart systems

use std::time::Duration;

use glam::Vec3;
use log::{debug, error, info, warn};

use crate::core::{Location, Side};
use crate::engine::{
    priority, ComponentMask, ComponentQuery, EntityId, EventBus, Outbox, TickClock,
};
use crate::game::carts::{CartError, CartImpulseSystem, RidableCarts};
use crate::game::entities::EntityStore;
use crate::game::events::{
    ActivateEvent, CollideEvent, DamageType, DoDestroy, EntityMessage, OnBlockItemPlaced,
};
use crate::game::rails::{PlacementContext, RailError, RailUpdateSystem};
use crate::game::settings::{ImpulseSettings, RailSettings};
use crate::game::world::{BlockId, BlockRegistry, VoxelWorld, WorldProvider};

/// Everything event handlers can read and write
pub struct Simulation {
    pub world: VoxelWorld,
    pub entities: EntityStore,
    pub rails: RailUpdateSystem,
    pub carts: CartImpulseSystem,
    pub riding: RidableCarts,
    pub outbox: Outbox<EntityMessage>,
    pub clock: TickClock,

    /// Placements made by the current activation, announced once it finishes
    placed: Vec<OnBlockItemPlaced>,
}

impl Simulation {
    pub fn new(registry: BlockRegistry, rails: RailSettings, impulse: ImpulseSettings) -> Self {
        Self {
            world: VoxelWorld::new(registry),
            entities: EntityStore::new(),
            rails: RailUpdateSystem::new(rails),
            carts: CartImpulseSystem::new(impulse),
            riding: RidableCarts::new(),
            outbox: Outbox::new(),
            clock: TickClock::new(),
            placed: Vec::new(),
        }
    }

    /// Write a block and report the change to the rail network
    ///
    /// Non-air cells get a block entity with the variant's hardness as
    /// health, air cells lose theirs.
    pub fn set_block(&mut self, location: Location, block: BlockId) {
        let previous = self.world.set_block(location, block);
        if previous == block {
            return;
        }

        if block.is_air() {
            if let Some(entity) = self.world.block_entity_at(location) {
                self.entities.despawn(entity);
                self.world.set_block_entity(location, None);
            }
        } else if self.world.block_entity_at(location).is_none() {
            let hardness = self.world.registry().get(block).map_or(1, |def| def.hardness);
            let entity = self.entities.spawn_block(location, hardness);
            self.world.set_block_entity(location, Some(entity));
        }

        self.rails.notify_changed(&mut self.world, location);
    }

    pub fn begin_bulk_edit(&mut self) {
        self.rails.begin_bulk_edit();
    }

    /// Close a bulk edit, reporting an unmatched close
    pub fn end_bulk_edit(&mut self) -> Result<(), RailError> {
        self.rails.end_bulk_edit(&mut self.world).map_err(|err| {
            error!("{}", err);
            err
        })
    }

    /// Seat `rider` in `cart`
    pub fn mount(&mut self, cart: EntityId, rider: EntityId) -> Result<(), CartError> {
        if self.entities.rail_vehicle(cart).is_none() {
            return Err(CartError::NotAVehicle(cart));
        }
        self.riding.mount(self.carts.filters_mut(), cart, rider)
    }

    pub fn dismount(&mut self, cart: EntityId) -> Option<EntityId> {
        self.riding.dismount(self.carts.filters_mut(), cart)
    }

    /// Remove a non-block entity and every side table entry about it
    pub fn despawn(&mut self, entity: EntityId) {
        self.riding.forget(self.carts.filters_mut(), entity);
        self.carts.forget(entity);
        self.entities.despawn(entity);
    }
}

impl ComponentQuery for Simulation {
    fn components(&self, entity: EntityId) -> ComponentMask {
        self.entities.components(entity)
    }
}

/// Refuse to place anything against a rail
fn guard_rail_stacking(sim: &mut Simulation, event: &mut ActivateEvent, _item: EntityId) {
    let Some(target) = event.target else {
        return;
    };
    if sim.rails.rejects_placement(&sim.world, target) {
        debug!("Placement against rail at {} refused", target);
        event.consume();
    }
}

/// Default block item behavior: place the family's variant into an empty cell
fn place_block(sim: &mut Simulation, event: &mut ActivateEvent, item: EntityId) {
    let Some(family) = sim.entities.block_item(item).map(|item| item.family) else {
        return;
    };

    let location = event.place_at;
    if !sim.world.block(location).is_air() {
        return;
    }

    let context = PlacementContext::new(location, event.approach, Vec3::ZERO);
    let Some(block) = sim.world.block_for_placement(family, &context) else {
        warn!("Family {:?} has nothing to place at {}", family, location);
        return;
    };

    sim.set_block(location, block);
    event.consume();
    sim.placed.push(OnBlockItemPlaced { location, block });
}

fn resolve_placed_rail(sim: &mut Simulation, event: &mut OnBlockItemPlaced, _item: EntityId) {
    sim.rails.on_block_placed(&mut sim.world, event.location);
}

fn damage_unsupported_rail(sim: &mut Simulation, _event: &mut DoDestroy, block: EntityId) {
    let Some(location) = sim.entities.block_position(block) else {
        return;
    };
    if let Some(message) = sim.rails.on_block_destroyed(&sim.world, location) {
        sim.outbox.send(message);
    }
}

fn cart_bump(sim: &mut Simulation, event: &mut CollideEvent, vehicle: EntityId) {
    let dt = sim.clock.game_delta();
    sim.carts
        .on_collide(&mut sim.entities, &mut sim.outbox, vehicle, event, dt);
}

/// Simulation plus the handlers subscribed to each event type
pub struct Game {
    pub sim: Simulation,
    activate: EventBus<Simulation, ActivateEvent>,
    placed: EventBus<Simulation, OnBlockItemPlaced>,
    destroy: EventBus<Simulation, DoDestroy>,
    collide: EventBus<Simulation, CollideEvent>,
}

impl Game {
    pub fn new(registry: BlockRegistry) -> Self {
        Self::with_settings(registry, RailSettings::default(), ImpulseSettings::default())
    }

    pub fn with_settings(registry: BlockRegistry, rails: RailSettings, impulse: ImpulseSettings) -> Self {
        let item = ComponentMask::BLOCK_ITEM;

        let mut activate: EventBus<Simulation, ActivateEvent> = EventBus::new();
        activate.subscribe("rail_stacking_guard", priority::HIGH, item, guard_rail_stacking);
        activate.subscribe("place_block", priority::NORMAL, item, place_block);

        let mut placed: EventBus<Simulation, OnBlockItemPlaced> = EventBus::new();
        placed.subscribe("resolve_placed_rail", priority::NORMAL, item, resolve_placed_rail);

        let mut destroy: EventBus<Simulation, DoDestroy> = EventBus::new();
        destroy.subscribe(
            "damage_unsupported_rail",
            priority::NORMAL,
            ComponentMask::BLOCK,
            damage_unsupported_rail,
        );

        let mut collide: EventBus<Simulation, CollideEvent> = EventBus::new();
        collide.subscribe(
            "cart_bump",
            priority::HIGH,
            ComponentMask::RAIL_VEHICLE | ComponentMask::TRANSFORM | ComponentMask::RIGID_BODY,
            cart_bump,
        );

        Self {
            sim: Simulation::new(registry, rails, impulse),
            activate,
            placed,
            destroy,
            collide,
        }
    }

    /// Use a block item, returning whether a block was placed
    pub fn use_item(
        &mut self,
        item: EntityId,
        target: Option<Location>,
        place_at: Location,
        approach: Side,
    ) -> bool {
        let mut event = ActivateEvent::new(target, place_at, approach);
        self.activate.dispatch(&mut self.sim, &mut event, item);

        let placements = std::mem::take(&mut self.sim.placed);
        let placed_any = !placements.is_empty();
        for mut placement in placements {
            self.placed.dispatch(&mut self.sim, &mut placement, item);
        }
        placed_any
    }

    /// Destroy the block at `location`
    pub fn destroy_block(&mut self, location: Location) {
        if let Some(entity) = self.sim.world.block_entity_at(location) {
            self.destroy.dispatch(&mut self.sim, &mut DoDestroy, entity);
        }
        self.sim.set_block(location, BlockId::AIR);
    }

    /// Deliver a physics contact to `entity`
    pub fn collide(&mut self, entity: EntityId, mut event: CollideEvent) {
        self.collide.dispatch(&mut self.sim, &mut event, entity);
    }

    /// Run one simulation tick
    pub fn tick(&mut self) {
        self.sim.rails.on_tick(&mut self.sim.world);
        self.process_messages();
    }

    /// Feed frame time into the clock and run the ticks it yields
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        let ticks = self.sim.clock.advance(frame_time);
        for _ in 0..ticks {
            self.tick();
        }
        ticks
    }

    /// Deliver queued entity messages, including any they cause
    pub fn process_messages(&mut self) {
        while let Some(message) = self.sim.outbox.pop() {
            match message {
                EntityMessage::Damage {
                    target,
                    amount,
                    damage_type,
                } => self.apply_damage(target, amount, damage_type),
                EntityMessage::CharacterImpulse { target, impulse } => {
                    if let Some(movement) = self.sim.entities.character_mut(target) {
                        movement.velocity += impulse;
                    }
                }
            }
        }
    }

    fn apply_damage(&mut self, target: EntityId, amount: i32, damage_type: DamageType) {
        let Some(health) = self.sim.entities.health_mut(target) else {
            return;
        };
        health.current -= amount;
        debug!("{} took {} {:?} damage", target, amount, damage_type);
        if !health.is_dead() {
            return;
        }

        match self.sim.entities.block_position(target) {
            Some(location) => {
                info!("Block at {} destroyed", location);
                self.destroy_block(location);
            }
            None => self.sim.despawn(target),
        }
    }
}
