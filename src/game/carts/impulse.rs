// Collision response for rail vehicles
//
// Carts are kinematic on their rails, so contacts reported by physics are
// resolved here with a single sequential impulse along the contact normal
// plus a Baumgarte bias for penetration.

use glam::Vec3;
use log::{debug, trace};

use super::filter::CollisionFilters;
use super::joints::JointLinks;
use crate::core::math::{finite_or_zero, nudged_normalize};
use crate::engine::{ComponentMask, ComponentQuery, EntityId, Outbox};
use crate::game::entities::EntityStore;
use crate::game::events::{CollideEvent, EntityMessage};
use crate::game::settings::ImpulseSettings;

/// State of one participant at the moment of contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
}

/// Velocity changes produced by a contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impulse {
    pub lambda: f32,
    /// Change for the vehicle that received the event
    pub first: Vec3,
    /// Change for the other participant
    pub second: Vec3,
}

/// What the solver did with a collision event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionResponse {
    /// The receiving vehicle filters the other out
    Excluded,
    /// The pair is held together by a coupling
    Joined,
    /// The impulse had the wrong sign and was dropped
    Rejected,
    Applied(Impulse),
    /// The other entity is neither a character nor a vehicle
    Ignored,
}

fn lambda(jv: f32, bias: f32, first_mass: f32, second_mass: f32) -> f32 {
    let effective_mass = 1.0 / first_mass + 1.0 / second_mass;
    -(jv + bias) / effective_mass
}

fn baumgarte_bias(
    settings: &ImpulseSettings,
    separation: Vec3,
    normal: Vec3,
    penetration: f32,
    dt: f32,
) -> f32 {
    -separation.dot(normal) * (settings.baumgarte / dt) * penetration
}

/// Impulse between a vehicle and a character pushed along the event normal
///
/// Only non-negative magnitudes are applied. The character uses the fixed
/// mass from `settings` and its share is returned rather than applied.
pub fn solve_character_contact(
    settings: &ImpulseSettings,
    vehicle: &ContactBody,
    character_position: Vec3,
    character_velocity: Vec3,
    event: &CollideEvent,
    dt: f32,
) -> Option<Impulse> {
    let normal = event.normal;
    let jv = normal.dot(vehicle.velocity) - normal.dot(character_velocity);
    let separation = (character_position - vehicle.position).normalize();
    let bias = baumgarte_bias(settings, separation, normal, event.penetration, dt);
    let lambda = lambda(jv, bias, vehicle.mass, settings.character_mass);

    // NaN fails this too
    if !(lambda >= 0.0) {
        return None;
    }

    Some(Impulse {
        lambda,
        first: finite_or_zero(normal / vehicle.mass * lambda),
        second: finite_or_zero(-(normal / settings.character_mass) * lambda),
    })
}

/// Impulse between two vehicles
///
/// The normal comes from the positions, not the event. Only non-positive
/// magnitudes are applied, the opposite sign of the character case. Each
/// side's change is zeroed on its own if it is not finite.
pub fn solve_vehicle_contact(
    settings: &ImpulseSettings,
    first: &ContactBody,
    second: &ContactBody,
    penetration: f32,
    dt: f32,
) -> Option<Impulse> {
    let separation = nudged_normalize(
        second.position - first.position,
        settings.separation_epsilon,
    );
    let normal = separation;

    let jv = normal.dot(first.velocity) - normal.dot(second.velocity);
    let bias = baumgarte_bias(settings, separation, normal, penetration, dt);
    let lambda = lambda(jv, bias, first.mass, second.mass);

    if lambda > 0.0 {
        return None;
    }

    Some(Impulse {
        lambda,
        first: finite_or_zero(normal / first.mass * lambda),
        second: finite_or_zero(-(normal / second.mass) * lambda),
    })
}

/// Applies collision impulses to rail vehicles
#[derive(Debug, Default)]
pub struct CartImpulseSystem {
    settings: ImpulseSettings,
    filters: CollisionFilters,
    joints: JointLinks,
}

impl CartImpulseSystem {
    pub fn new(settings: ImpulseSettings) -> Self {
        Self {
            settings,
            filters: CollisionFilters::new(),
            joints: JointLinks::new(),
        }
    }

    pub fn filters(&self) -> &CollisionFilters {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut CollisionFilters {
        &mut self.filters
    }

    pub fn joints(&self) -> &JointLinks {
        &self.joints
    }

    pub fn joints_mut(&mut self) -> &mut JointLinks {
        &mut self.joints
    }

    /// Drop every side table entry for a destroyed entity
    pub fn forget(&mut self, entity: EntityId) {
        self.filters.forget(entity);
        self.joints.forget(entity);
    }

    /// Resolve a contact reported to `vehicle`
    ///
    /// Vehicle velocities are written directly. A character's share goes out
    /// as a `CharacterImpulse` message since its movement state is owned
    /// elsewhere.
    pub fn on_collide(
        &self,
        entities: &mut EntityStore,
        outbox: &mut Outbox<EntityMessage>,
        vehicle: EntityId,
        event: &CollideEvent,
        dt: f32,
    ) -> CollisionResponse {
        let other = event.other;

        // Only the receiving vehicle's own filter counts
        if self.filters.is_excluded(vehicle, other) {
            trace!("Collision between {} and {} is filtered", vehicle, other);
            return CollisionResponse::Excluded;
        }
        if self.joints.are_joined(vehicle, other) {
            trace!("Collision between coupled {} and {} skipped", vehicle, other);
            return CollisionResponse::Joined;
        }

        let Some(body) = contact_body(entities, vehicle) else {
            return CollisionResponse::Ignored;
        };

        let components = entities.components(other);
        let response = if components.contains(ComponentMask::CHARACTER) {
            self.character_contact(entities, outbox, vehicle, &body, event, dt)
        } else if components.contains(ComponentMask::RAIL_VEHICLE) {
            self.vehicle_contact(entities, vehicle, &body, other, event, dt)
        } else {
            CollisionResponse::Ignored
        };

        if let CollisionResponse::Applied(impulse) = response {
            debug!(
                "Impulse {:.3} between {} and {}",
                impulse.lambda, vehicle, other
            );
        }
        response
    }

    fn character_contact(
        &self,
        entities: &mut EntityStore,
        outbox: &mut Outbox<EntityMessage>,
        vehicle: EntityId,
        body: &ContactBody,
        event: &CollideEvent,
        dt: f32,
    ) -> CollisionResponse {
        let other = event.other;
        let (Some(position), Some(movement)) = (entities.position(other), entities.character(other))
        else {
            return CollisionResponse::Ignored;
        };

        let Some(impulse) =
            solve_character_contact(&self.settings, body, position, movement.velocity, event, dt)
        else {
            return CollisionResponse::Rejected;
        };

        if let Some(state) = entities.rail_vehicle_mut(vehicle) {
            state.velocity += impulse.first;
        }
        outbox.send(EntityMessage::CharacterImpulse {
            target: other,
            impulse: impulse.second,
        });
        CollisionResponse::Applied(impulse)
    }

    fn vehicle_contact(
        &self,
        entities: &mut EntityStore,
        vehicle: EntityId,
        body: &ContactBody,
        other: EntityId,
        event: &CollideEvent,
        dt: f32,
    ) -> CollisionResponse {
        let Some(other_body) = contact_body(entities, other) else {
            return CollisionResponse::Ignored;
        };

        let Some(impulse) =
            solve_vehicle_contact(&self.settings, body, &other_body, event.penetration, dt)
        else {
            return CollisionResponse::Rejected;
        };

        if let Some(state) = entities.rail_vehicle_mut(vehicle) {
            state.velocity += impulse.first;
        }
        if let Some(state) = entities.rail_vehicle_mut(other) {
            state.velocity += impulse.second;
        }
        CollisionResponse::Applied(impulse)
    }
}

fn contact_body(entities: &EntityStore, entity: EntityId) -> Option<ContactBody> {
    Some(ContactBody {
        position: entities.position(entity)?,
        velocity: entities.rail_vehicle(entity)?.velocity,
        mass: entities.rigid_body(entity)?.mass,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn collide(other: EntityId, normal: Vec3, penetration: f32) -> CollideEvent {
        CollideEvent {
            other,
            normal,
            penetration,
        }
    }

    fn head_on(store: &mut EntityStore) -> (EntityId, EntityId) {
        let a = store.spawn_cart(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 10.0);
        let b = store.spawn_cart(Vec3::X, Vec3::new(-2.0, 0.0, 0.0), 10.0);
        (a, b)
    }

    #[test]
    fn test_head_on_vehicles() {
        let mut store = EntityStore::new();
        let mut outbox = Outbox::new();
        let (a, b) = head_on(&mut store);
        let system = CartImpulseSystem::default();

        let response = system.on_collide(&mut store, &mut outbox, a, &collide(b, Vec3::X, 0.0), DT);
        let CollisionResponse::Applied(impulse) = response else {
            panic!("expected an impulse, got {response:?}");
        };

        // Closing speed 4 over an effective inverse mass of 0.2
        assert_relative_eq!(impulse.lambda.abs(), 20.0, epsilon = 1e-4);
        assert_relative_eq!(impulse.first.length(), 2.0, epsilon = 1e-4);
        assert_relative_eq!(impulse.second.length(), 2.0, epsilon = 1e-4);
        assert!(impulse.first.dot(impulse.second) < 0.0);

        let va = store.rail_vehicle(a).unwrap().velocity;
        let vb = store.rail_vehicle(b).unwrap().velocity;
        assert_relative_eq!(va.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(vb.x, 0.0, epsilon = 1e-4);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_separating_vehicles_are_left_alone() {
        // Vehicle contacts only accept non-positive magnitudes
        let first = ContactBody {
            position: Vec3::ZERO,
            velocity: Vec3::new(-2.0, 0.0, 0.0),
            mass: 10.0,
        };
        let second = ContactBody {
            position: Vec3::X,
            velocity: Vec3::new(2.0, 0.0, 0.0),
            mass: 10.0,
        };
        let settings = ImpulseSettings::default();
        assert_eq!(solve_vehicle_contact(&settings, &first, &second, 0.0, DT), None);
    }

    #[test]
    fn test_vehicle_bias_reduces_response() {
        let settings = ImpulseSettings::default();
        let first = ContactBody {
            position: Vec3::ZERO,
            velocity: Vec3::new(2.0, 0.0, 0.0),
            mass: 10.0,
        };
        let second = ContactBody {
            position: Vec3::X,
            velocity: Vec3::new(-2.0, 0.0, 0.0),
            mass: 10.0,
        };

        // bias = -(1)(0.2 * 60)(0.1) = -1.2, lambda = -(4 - 1.2) / 0.2
        let impulse = solve_vehicle_contact(&settings, &first, &second, 0.1, DT).unwrap();
        assert_relative_eq!(impulse.lambda, -14.0, epsilon = 1e-3);
        assert_relative_eq!(impulse.first.x, -1.4, epsilon = 1e-4);
        assert_relative_eq!(impulse.second.x, 1.4, epsilon = 1e-4);
    }

    #[test]
    fn test_character_accepts_positive_lambda() {
        let mut store = EntityStore::new();
        let mut outbox = Outbox::new();
        let cart = store.spawn_cart(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 10.0);
        let player = store.spawn_character(Vec3::X, Vec3::ZERO);
        let system = CartImpulseSystem::default();

        let event = collide(player, Vec3::NEG_X, 0.0);
        let response = system.on_collide(&mut store, &mut outbox, cart, &event, DT);
        let CollisionResponse::Applied(impulse) = response else {
            panic!("expected an impulse, got {response:?}");
        };

        // jv = -2, effective inverse mass = 1/10 + 1/20
        assert_relative_eq!(impulse.lambda, 2.0 / 0.15, epsilon = 1e-4);
        let velocity = store.rail_vehicle(cart).unwrap().velocity;
        assert_relative_eq!(velocity.x, 2.0 - impulse.lambda / 10.0, epsilon = 1e-4);

        match outbox.pop() {
            Some(EntityMessage::CharacterImpulse { target, impulse: push }) => {
                assert_eq!(target, player);
                assert_relative_eq!(push.x, impulse.lambda / 20.0, epsilon = 1e-4);
            }
            other => panic!("expected a character impulse, got {other:?}"),
        }
        // Character state is only changed through the message
        assert_eq!(store.character(player).unwrap().velocity, Vec3::ZERO);
    }

    #[test]
    fn test_character_rejects_negative_lambda() {
        // Opposite polarity from the vehicle case
        let mut store = EntityStore::new();
        let mut outbox = Outbox::new();
        let cart = store.spawn_cart(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 10.0);
        let player = store.spawn_character(Vec3::X, Vec3::ZERO);
        let system = CartImpulseSystem::default();

        let event = collide(player, Vec3::X, 0.0);
        let response = system.on_collide(&mut store, &mut outbox, cart, &event, DT);
        assert_eq!(response, CollisionResponse::Rejected);
        assert_eq!(store.rail_vehicle(cart).unwrap().velocity, Vec3::new(2.0, 0.0, 0.0));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_coincident_character_is_skipped() {
        let settings = ImpulseSettings::default();
        let vehicle = ContactBody {
            position: Vec3::ZERO,
            velocity: Vec3::X,
            mass: 10.0,
        };
        let event = collide(EntityId::from_u64(9), Vec3::NEG_X, 0.0);
        let impulse = solve_character_contact(&settings, &vehicle, Vec3::ZERO, Vec3::ZERO, &event, DT);
        assert_eq!(impulse, None);
    }

    #[test]
    fn test_joined_vehicles_unchanged() {
        let mut store = EntityStore::new();
        let mut outbox = Outbox::new();
        let (a, b) = head_on(&mut store);
        let mut system = CartImpulseSystem::default();
        system.joints_mut().link(a, b, 1.0);

        let response = system.on_collide(&mut store, &mut outbox, a, &collide(b, Vec3::X, 0.5), DT);
        assert_eq!(response, CollisionResponse::Joined);
        assert_eq!(store.rail_vehicle(a).unwrap().velocity, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(store.rail_vehicle(b).unwrap().velocity, Vec3::new(-2.0, 0.0, 0.0));
    }

    #[test]
    fn test_exclusion_is_one_way() {
        let mut store = EntityStore::new();
        let mut outbox = Outbox::new();
        let (a, b) = head_on(&mut store);
        let mut system = CartImpulseSystem::default();

        // b ignoring a does not stop a's own handler
        system.filters_mut().add_exclusion(b, a);
        let response = system.on_collide(&mut store, &mut outbox, a, &collide(b, Vec3::X, 0.0), DT);
        assert!(matches!(response, CollisionResponse::Applied(_)));
        assert_ne!(store.rail_vehicle(a).unwrap().velocity, Vec3::new(2.0, 0.0, 0.0));

        let (c, d) = head_on(&mut store);
        system.filters_mut().add_exclusion(c, d);
        let response = system.on_collide(&mut store, &mut outbox, c, &collide(d, Vec3::X, 0.0), DT);
        assert_eq!(response, CollisionResponse::Excluded);
        assert_eq!(store.rail_vehicle(c).unwrap().velocity, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(store.rail_vehicle(d).unwrap().velocity, Vec3::new(-2.0, 0.0, 0.0));
    }

    #[test]
    fn test_zero_mass_side_is_clamped() {
        let mut store = EntityStore::new();
        let mut outbox = Outbox::new();
        let a = store.spawn_cart(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 0.0);
        let b = store.spawn_cart(Vec3::X, Vec3::new(-2.0, 0.0, 0.0), 10.0);
        let system = CartImpulseSystem::default();

        let response = system.on_collide(&mut store, &mut outbox, a, &collide(b, Vec3::X, 0.0), DT);
        let CollisionResponse::Applied(impulse) = response else {
            panic!("expected an impulse, got {response:?}");
        };

        assert_eq!(impulse.first, Vec3::ZERO);
        assert!(impulse.second.is_finite());
        assert_eq!(store.rail_vehicle(a).unwrap().velocity, Vec3::new(2.0, 0.0, 0.0));
        assert!(store.rail_vehicle(b).unwrap().velocity.is_finite());
    }

    #[test]
    fn test_each_side_clamped_independently() {
        let settings = ImpulseSettings::default();
        let first = ContactBody {
            position: Vec3::ZERO,
            velocity: Vec3::new(2.0, 0.0, 0.0),
            mass: 10.0,
        };
        let second = ContactBody {
            position: Vec3::X,
            velocity: Vec3::new(-2.0, 0.0, 0.0),
            mass: 0.0,
        };

        let impulse = solve_vehicle_contact(&settings, &first, &second, 0.0, DT).unwrap();
        assert!(impulse.first.is_finite());
        assert_eq!(impulse.second, Vec3::ZERO);
    }

    #[test]
    fn test_degenerate_contacts_never_poison_state() {
        let mut store = EntityStore::new();
        let mut outbox = Outbox::new();
        let a = store.spawn_cart(Vec3::ONE, Vec3::new(1.0, 0.0, 0.0), 10.0);
        let b = store.spawn_cart(Vec3::ONE, Vec3::new(-1.0, 0.0, 0.0), 10.0);
        let system = CartImpulseSystem::default();

        system.on_collide(&mut store, &mut outbox, a, &collide(b, Vec3::X, 0.2), DT);
        system.on_collide(&mut store, &mut outbox, a, &collide(b, Vec3::X, f32::NAN), DT);

        assert!(store.rail_vehicle(a).unwrap().velocity.is_finite());
        assert!(store.rail_vehicle(b).unwrap().velocity.is_finite());
    }

    #[test]
    fn test_non_vehicle_other_is_ignored() {
        let mut store = EntityStore::new();
        let mut outbox = Outbox::new();
        let cart = store.spawn_cart(Vec3::ZERO, Vec3::X, 10.0);
        let block = store.spawn_block(crate::core::Location::new(1, 0, 0), 5);
        let system = CartImpulseSystem::default();

        let response = system.on_collide(&mut store, &mut outbox, cart, &collide(block, Vec3::X, 0.0), DT);
        assert_eq!(response, CollisionResponse::Ignored);
    }

    #[test]
    fn test_forget_clears_side_tables() {
        let (a, b) = (EntityId::from_u64(1), EntityId::from_u64(2));
        let mut system = CartImpulseSystem::default();
        system.filters_mut().add_exclusion(a, b);
        system.joints_mut().link(a, b, 1.0);

        system.forget(a);
        assert!(!system.filters().is_excluded(a, b));
        assert!(!system.joints().are_joined(a, b));
    }
}
