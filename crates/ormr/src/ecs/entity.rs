//! # Entity — Identity and Lifecycle Metadata
//!
//! An [`Entity`] is just an id; all of its data lives in per-type component
//! stores owned by the [`World`](super::world::World). Ids come from a
//! monotonically increasing counter and are **never reused** within a process
//! lifetime, so a stale handle can never silently alias a newer entity.
//! Because ids don't recycle, "unknown" and "destroyed" collapse into the same
//! observable state: the id is simply absent from the metadata map.
//!
//! Destruction is deferred: [`Entities::queue_destroy`] only flags the entity,
//! and the world flushes the queue at one well-defined point per update tick.
//! Until the flush, the entity stays fully visible to queries — callers that
//! hold a handle across a trigger or system boundary check the pending flag.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

/// Handle to an entity: a plain numeric id, cheap to copy and hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    /// The raw numeric id.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Per-entity bookkeeping: which component types are attached, and whether a
/// destroy has been requested but not yet flushed.
pub(crate) struct EntityMeta {
    pub(crate) types: HashSet<TypeId>,
    pub(crate) pending_destroy: bool,
}

/// Registry of live entities.
pub(crate) struct Entities {
    next: u64,
    meta: HashMap<Entity, EntityMeta>,
    pending: Vec<Entity>,
}

impl Entities {
    pub(crate) fn new() -> Self {
        Self {
            next: 0,
            meta: HashMap::new(),
            pending: Vec::new(),
        }
    }

    pub(crate) fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        self.meta.insert(
            entity,
            EntityMeta {
                types: HashSet::new(),
                pending_destroy: false,
            },
        );
        entity
    }

    /// True while the entity exists, including the pending-destroy window.
    pub(crate) fn contains(&self, entity: Entity) -> bool {
        self.meta.contains_key(&entity)
    }

    pub(crate) fn is_pending_destroy(&self, entity: Entity) -> bool {
        self.meta
            .get(&entity)
            .is_some_and(|m| m.pending_destroy)
    }

    pub(crate) fn meta(&self, entity: Entity) -> Option<&EntityMeta> {
        self.meta.get(&entity)
    }

    pub(crate) fn meta_mut(&mut self, entity: Entity) -> Option<&mut EntityMeta> {
        self.meta.get_mut(&entity)
    }

    /// Flags the entity for destruction. Returns `false` (and does nothing)
    /// for unknown ids or entities already queued — double-destroy is a
    /// silent no-op.
    pub(crate) fn queue_destroy(&mut self, entity: Entity) -> bool {
        match self.meta.get_mut(&entity) {
            Some(meta) if !meta.pending_destroy => {
                meta.pending_destroy = true;
                self.pending.push(entity);
                true
            }
            _ => false,
        }
    }

    /// Takes the current destruction queue, leaving it empty. Detach hooks
    /// running during a flush may queue more entities; the caller loops until
    /// this comes back empty.
    pub(crate) fn drain_pending(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.pending)
    }

    /// Drops the entity's metadata. After this the id is gone for good.
    pub(crate) fn release(&mut self, entity: Entity) {
        self.meta.remove(&entity);
    }

    pub(crate) fn count(&self) -> usize {
        self.meta.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (Entity, &EntityMeta)> {
        self.meta.iter().map(|(e, m)| (*e, m))
    }
}
