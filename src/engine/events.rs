// Typed event dispatch and outgoing message queue
//
// Each event type gets its own `EventBus`. Handlers subscribe with a priority
// and the set of components the receiving entity must carry; dispatch walks
// matching handlers from highest to lowest priority and stops once a
// consumable event has been consumed.

use std::collections::VecDeque;

use super::entity::{ComponentMask, EntityId};

/// Handler priorities, higher runs first
pub mod priority {
    pub const CRITICAL: i32 = 200;
    pub const HIGH: i32 = 150;
    pub const NORMAL: i32 = 100;
    pub const LOW: i32 = 50;
    pub const TRIVIAL: i32 = 25;
}

/// An event that can be dispatched through an `EventBus`
pub trait Event {
    /// Whether a handler has claimed this event
    fn is_consumed(&self) -> bool {
        false
    }
}

/// Lookup of the components an entity currently has
pub trait ComponentQuery {
    fn components(&self, entity: EntityId) -> ComponentMask;
}

type Handler<C, E> = Box<dyn Fn(&mut C, &mut E, EntityId)>;

struct Subscription<C, E> {
    name: &'static str,
    priority: i32,
    required: ComponentMask,
    handler: Handler<C, E>,
}

/// Dispatcher for one event type over a context `C`
pub struct EventBus<C, E> {
    subscriptions: Vec<Subscription<C, E>>,
}

impl<C, E> EventBus<C, E>
where
    C: ComponentQuery,
    E: Event,
{
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Register a handler
    ///
    /// Handlers with equal priority have no guaranteed relative order.
    pub fn subscribe<F>(&mut self, name: &'static str, priority: i32, required: ComponentMask, handler: F)
    where
        F: Fn(&mut C, &mut E, EntityId) + 'static,
    {
        let index = self
            .subscriptions
            .iter()
            .position(|s| s.priority < priority)
            .unwrap_or(self.subscriptions.len());

        self.subscriptions.insert(
            index,
            Subscription {
                name,
                priority,
                required,
                handler: Box::new(handler),
            },
        );
    }

    /// Deliver `event` to `entity`, returning how many handlers ran
    pub fn dispatch(&self, ctx: &mut C, event: &mut E, entity: EntityId) -> usize {
        let components = ctx.components(entity);
        let mut ran = 0;

        for subscription in &self.subscriptions {
            if event.is_consumed() {
                log::trace!("Event consumed before {} ran", subscription.name);
                break;
            }
            if !components.contains(subscription.required) {
                continue;
            }
            (subscription.handler)(ctx, event, entity);
            ran += 1;
        }

        ran
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl<C, E> Default for EventBus<C, E>
where
    C: ComponentQuery,
    E: Event,
{
    fn default() -> Self {
        Self::new()
    }
}

/// FIFO of messages addressed to entities, drained by the owning simulation
#[derive(Debug)]
pub struct Outbox<M> {
    messages: VecDeque<M>,
}

impl<M> Outbox<M> {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::with_capacity(16),
        }
    }

    pub fn send(&mut self, message: M) {
        self.messages.push_back(message);
    }

    pub fn pop(&mut self) -> Option<M> {
        self.messages.pop_front()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<M> Default for Outbox<M> {
    fn default() -> Self {
        Self::new()
    }
}
