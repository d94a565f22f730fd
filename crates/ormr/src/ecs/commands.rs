//! Builder-style entity handles. [`EntityWorldMut`] chains component
//! insertions, scoped observers, and child spawning on a freshly created or
//! looked-up entity; [`ChildSpawner`] is the closure argument of
//! [`EntityWorldMut::with_children`].

use super::component::Component;
use super::entity::Entity;
use super::hierarchy::Parent;
use super::observer::Trigger;
use super::world::World;

/// Exclusive handle to one entity, borrowed from the world.
pub struct EntityWorldMut<'w> {
    world: &'w mut World,
    entity: Entity,
}

impl<'w> EntityWorldMut<'w> {
    pub(crate) fn new(world: &'w mut World, entity: Entity) -> Self {
        Self { world, entity }
    }

    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Attaches a component, replacing any existing instance of the type.
    pub fn insert<T: Component>(&mut self, component: T) -> &mut Self {
        self.world.insert_component(self.entity, component);
        self
    }

    /// Registers an observer scoped to this entity.
    pub fn observe<E: 'static>(
        &mut self,
        callback: impl FnMut(&mut World, Trigger<'_, E>) + 'static,
    ) -> &mut Self {
        self.world.observe_entity(self.entity, callback);
        self
    }

    /// Fires a targeted trigger at this entity, bubbling up its parents.
    pub fn trigger<E: 'static>(&mut self, event: E) -> &mut Self {
        self.world.trigger_targets(event, self.entity);
        self
    }

    /// Spawns children of this entity inside the closure.
    pub fn with_children(&mut self, spawn: impl FnOnce(&mut ChildSpawner<'_>)) -> &mut Self {
        let mut spawner = ChildSpawner {
            world: self.world,
            parent: self.entity,
        };
        spawn(&mut spawner);
        self
    }
}

/// Spawns entities pre-linked to a fixed parent.
pub struct ChildSpawner<'w> {
    world: &'w mut World,
    parent: Entity,
}

impl ChildSpawner<'_> {
    /// Spawns a new entity with `Parent` already attached.
    pub fn spawn(&mut self) -> EntityWorldMut<'_> {
        let entity = self.world.create_entity();
        self.world.insert_component(entity, Parent(self.parent));
        EntityWorldMut::new(self.world, entity)
    }

    pub fn parent(&self) -> Entity {
        self.parent
    }
}
