//! Fixed-capacity entity pool
//!
//! Insertion order is render order. Capacity is set at construction and the
//! number of occupied slots never exceeds it; what happens on overflow is the
//! pool's `OverflowPolicy`.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};

/// What `spawn` does when every slot is occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Drop the new entity
    Reject,
    /// Drop the oldest entity, append the new one
    EvictOldest,
    /// Ring buffer: overwrite the oldest slot in place
    OverwriteAtCursor,
}

#[derive(Debug, Clone)]
struct Slot {
    id: EntityId,
    entity: Entity,
    /// Cleared by `remove`; the slot is skipped until compacted or overwritten
    live: bool,
}

/// An ordered, bounded collection of entities
#[derive(Debug, Clone)]
pub struct EntityPool {
    slots: Vec<Slot>,
    capacity: usize,
    policy: OverflowPolicy,
    /// Next slot to overwrite once a ring pool is full (also its oldest slot)
    cursor: usize,
    next_id: u64,
}

impl EntityPool {
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            policy,
            cursor: 0,
            next_id: 1,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Occupied slots, including removed/expired ones awaiting reuse
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Entities a traversal would yield right now
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Slot index the next `spawn` writes to (ring position for trails)
    pub fn next_slot(&self) -> usize {
        if self.slots.len() < self.capacity {
            self.slots.len()
        } else {
            self.cursor
        }
    }

    /// Add an entity, applying the overflow policy when full.
    /// Returns `None` if the entity was rejected.
    pub fn spawn(&mut self, entity: Entity) -> Option<EntityId> {
        if self.capacity == 0 {
            return None;
        }

        if self.slots.len() >= self.capacity && self.policy != OverflowPolicy::OverwriteAtCursor {
            self.compact();
        }

        if self.slots.len() < self.capacity {
            let id = self.allocate_id();
            self.slots.push(Slot {
                id,
                entity,
                live: true,
            });
            return Some(id);
        }

        match self.policy {
            OverflowPolicy::Reject => None,
            OverflowPolicy::EvictOldest => {
                self.slots.remove(0);
                let id = self.allocate_id();
                self.slots.push(Slot {
                    id,
                    entity,
                    live: true,
                });
                Some(id)
            }
            OverflowPolicy::OverwriteAtCursor => {
                let id = self.allocate_id();
                self.slots[self.cursor] = Slot {
                    id,
                    entity,
                    live: true,
                };
                self.cursor = (self.cursor + 1) % self.capacity;
                Some(id)
            }
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Exclude an entity from every later traversal
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.slots.iter_mut().find(|s| s.live && s.id == id) {
            Some(slot) => {
                slot.live = false;
                true
            }
            None => false,
        }
    }

    /// Look up a visible entity
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.iter().find(|(eid, _)| *eid == id).map(|(_, e)| e)
    }

    /// One-shot traversal of visible entities in insertion order
    pub fn iter(&self) -> Live<'_> {
        let (newer, older) = self.slots.split_at(self.cursor.min(self.slots.len()));
        Live {
            first: older.iter(),
            second: newer.iter(),
        }
    }

    /// Visit every visible entity in insertion order
    pub fn for_each(&self, mut visitor: impl FnMut(EntityId, &Entity)) {
        for (id, entity) in self.iter() {
            visitor(id, entity);
        }
    }

    /// Mutable access for the simulator: every live slot, expired or not
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots
            .iter_mut()
            .filter(|s| s.live)
            .map(|s| &mut s.entity)
    }

    /// Drop removed and expired slots. Ring pools keep their slots until
    /// overwritten so the cursor stays meaningful.
    pub(crate) fn compact(&mut self) {
        if self.policy == OverflowPolicy::OverwriteAtCursor {
            return;
        }
        self.slots.retain(|s| s.live && !s.entity.is_expired());
    }

    /// Empty the pool (resize rebuilds). Ids keep increasing.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.cursor = 0;
    }
}

/// Traversal over the live, non-expired entities of one pool for one frame
pub struct Live<'a> {
    first: std::slice::Iter<'a, Slot>,
    second: std::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Live<'a> {
    type Item = (EntityId, &'a Entity);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = match self.first.next() {
                Some(slot) => slot,
                None => self.second.next()?,
            };
            if slot.live && !slot.entity.is_expired() {
                return Some((slot.id, &slot.entity));
            }
        }
    }
}
