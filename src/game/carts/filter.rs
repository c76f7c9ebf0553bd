// Per-vehicle collision exclusions

use std::collections::{HashMap, HashSet};

use crate::engine::EntityId;

/// Entities each vehicle ignores when resolving collisions
///
/// Sets are created on first use and only shrink through `remove_exclusion`
/// or when the owner is forgotten.
#[derive(Debug, Default)]
pub struct CollisionFilters {
    filters: HashMap<EntityId, HashSet<EntityId>>,
}

impl CollisionFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_exclusion(&mut self, owner: EntityId, other: EntityId) {
        self.filters.entry(owner).or_default().insert(other);
    }

    pub fn remove_exclusion(&mut self, owner: EntityId, other: EntityId) {
        self.filters.entry(owner).or_default().remove(&other);
    }

    /// Whether `owner` ignores collisions with `other`
    pub fn is_excluded(&self, owner: EntityId, other: EntityId) -> bool {
        self.filters
            .get(&owner)
            .is_some_and(|filter| filter.contains(&other))
    }

    pub fn exclusions(&self, owner: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.filters.get(&owner).into_iter().flatten().copied()
    }

    /// Drop the set owned by a destroyed entity
    pub fn forget(&mut self, owner: EntityId) {
        self.filters.remove(&owner);
    }
}
