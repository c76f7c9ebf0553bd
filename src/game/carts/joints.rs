// Couplings between rail vehicles

use std::collections::HashMap;

use crate::engine::EntityId;

/// One end of a coupling, as seen from the vehicle that owns it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLink {
    pub other: EntityId,
    /// Distance the coupling holds the two vehicles at
    pub rest_length: f32,
}

/// Couplings per vehicle
#[derive(Debug, Default)]
pub struct JointLinks {
    links: HashMap<EntityId, Vec<JointLink>>,
}

impl JointLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Couple two vehicles, recording the link on both
    pub fn link(&mut self, a: EntityId, b: EntityId, rest_length: f32) {
        self.unlink(a, b);
        self.links.entry(a).or_default().push(JointLink {
            other: b,
            rest_length,
        });
        self.links.entry(b).or_default().push(JointLink {
            other: a,
            rest_length,
        });
    }

    pub fn unlink(&mut self, a: EntityId, b: EntityId) {
        if let Some(links) = self.links.get_mut(&a) {
            links.retain(|link| link.other != b);
        }
        if let Some(links) = self.links.get_mut(&b) {
            links.retain(|link| link.other != a);
        }
    }

    pub fn find_joint(&self, owner: EntityId, other: EntityId) -> Option<&JointLink> {
        self.links
            .get(&owner)
            .and_then(|links| links.iter().find(|link| link.other == other))
    }

    /// Whether both vehicles carry couplings and `a` is coupled to `b`
    pub fn are_joined(&self, a: EntityId, b: EntityId) -> bool {
        if !self.links.contains_key(&a) || !self.links.contains_key(&b) {
            return false;
        }
        self.find_joint(a, b).is_some()
    }

    pub fn links(&self, owner: EntityId) -> &[JointLink] {
        self.links.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove a destroyed vehicle and every coupling pointing at it
    pub fn forget(&mut self, entity: EntityId) {
        if let Some(links) = self.links.remove(&entity) {
            for link in links {
                if let Some(other) = self.links.get_mut(&link.other) {
                    other.retain(|l| l.other != entity);
                }
            }
        }
    }
}
