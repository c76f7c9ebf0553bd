// Game events and entity messages

use glam::Vec3;

use crate::core::{Location, Side};
use crate::engine::{EntityId, Event};
use crate::game::world::BlockId;

/// A block item was used on the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivateEvent {
    /// Cell the player pointed at, if any
    pub target: Option<Location>,
    /// Cell the new block would go into
    pub place_at: Location,
    /// Face of the target that was hit
    pub approach: Side,
    consumed: bool,
}

impl ActivateEvent {
    pub fn new(target: Option<Location>, place_at: Location, approach: Side) -> Self {
        Self {
            target,
            place_at,
            approach,
            consumed: false,
        }
    }

    /// Claim the event so lower-priority handlers skip it
    pub fn consume(&mut self) {
        self.consumed = true;
    }
}

impl Event for ActivateEvent {
    fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// A block item finished placing its block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnBlockItemPlaced {
    pub location: Location,
    pub block: BlockId,
}

impl Event for OnBlockItemPlaced {}

/// An entity is about to be destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoDestroy;

impl Event for DoDestroy {}

/// Physics contact reported to one participant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollideEvent {
    pub other: EntityId,
    /// Unit contact normal
    pub normal: Vec3,
    /// Penetration depth, never negative
    pub penetration: f32,
}

impl Event for CollideEvent {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageType {
    /// Bypasses any resistance
    Direct,
}

/// Messages queued for entities and handled after the current event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityMessage {
    Damage {
        target: EntityId,
        amount: i32,
        damage_type: DamageType,
    },

    /// Velocity change for a character's movement state
    CharacterImpulse { target: EntityId, impulse: Vec3 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_consume() {
        let mut event = ActivateEvent::new(None, Location::new(0, 0, 0), Side::Top);
        assert!(!event.is_consumed());
        event.consume();
        assert!(event.is_consumed());
    }

    #[test]
    fn test_other_events_never_consumed() {
        assert!(!DoDestroy.is_consumed());
        let collide = CollideEvent {
            other: EntityId::from_u64(2),
            normal: Vec3::X,
            penetration: 0.0,
        };
        assert!(!collide.is_consumed());
    }
}
