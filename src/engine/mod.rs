// Engine infrastructure: entities, event dispatch, simulation clock

pub mod clock;
pub mod entity;
pub mod events;

pub use clock::TickClock;
pub use entity::{ComponentMask, EntityId};
pub use events::{priority, ComponentQuery, Event, EventBus, Outbox};
