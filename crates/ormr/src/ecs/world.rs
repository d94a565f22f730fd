//! # World — The Central Container
//!
//! The [`World`] owns all entities, components, resources, event buffers,
//! observer registrations, and the per-system membership caches. It's the
//! single source of truth the scheduler and queries read from.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ World                                                    │
//! │                                                          │
//! │  entities:    id counter + per-entity type set & flags   │
//! │                                                          │
//! │  stores:      HashMap<TypeId, ComponentStore>            │
//! │    one sparse set per component type (the type index)    │
//! │                                                          │
//! │  memberships: Vec<Membership>                            │
//! │    per registered system/query: required types +         │
//! │    incrementally maintained HashSet<Entity>              │
//! │                                                          │
//! │  resources:   HashMap<TypeId, Box<dyn Any>>              │
//! │  events:      double-buffered per-type queues            │
//! │  observers:   global + entity-scoped trigger callbacks   │
//! │  hooks:       external + static attach/detach hooks      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mutation discipline
//!
//! Everything is single-threaded and runs to completion; there is no
//! transaction or rollback. Every mutating operation therefore updates
//! structural state *fully* before invoking any user callback: on attach the
//! store, the type index, and every membership set are consistent before the
//! first hook runs; on detach the hooks run first, while the instance is
//! still reachable, and the unlink follows. Destruction is deferred — a
//! destroy request only flags the entity, and the flush happens at one
//! well-defined point per update tick, so systems can freely request
//! destruction of entities they are iterating.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use super::commands::EntityWorldMut;
use super::component::{
    Component, ComponentStore, Hooks, static_detach_runner,
};
use super::entity::{Entities, Entity};
use super::event::EventChannels;
use super::hierarchy::Parent;
use super::observer::{Observers, Trigger, erase_observer};
use super::query::{Query, QueryFilter, QueryParam, QueryState};
use crate::error::EcsError;

/// One registered system or query: its component-type precondition, its lazy
/// exclusion set, and the incrementally maintained set of matching entities.
pub(crate) struct Membership {
    required: Vec<TypeId>,
    without: Vec<TypeId>,
    matched: HashSet<Entity>,
}

/// The central container for all runtime state.
pub struct World {
    entities: Entities,
    stores: HashMap<TypeId, ComponentStore>,
    resources: HashMap<TypeId, Box<dyn Any>>,
    memberships: Vec<Membership>,
    events: EventChannels,
    observers: Observers,
    hooks: Hooks,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: Entities::new(),
            stores: HashMap::new(),
            resources: HashMap::new(),
            memberships: Vec::new(),
            events: EventChannels::default(),
            observers: Observers::default(),
            hooks: Hooks::default(),
        }
    }

    // ── Entity lifecycle ─────────────────────────────────────────────

    /// Allocates a fresh entity with no components. Ids are monotonic and
    /// never reused.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.allocate();
        log::trace!("created entity {entity:?}");
        entity
    }

    /// Allocates a fresh entity and returns the builder handle for it.
    pub fn spawn(&mut self) -> EntityWorldMut<'_> {
        let entity = self.create_entity();
        EntityWorldMut::new(self, entity)
    }

    /// Builder handle for an existing entity.
    pub fn entity_mut(&mut self, entity: Entity) -> Result<EntityWorldMut<'_>, EcsError> {
        if self.entities.contains(entity) {
            Ok(EntityWorldMut::new(self, entity))
        } else {
            Err(EcsError::InvalidEntity(entity))
        }
    }

    /// True while the entity exists — including the window between a destroy
    /// request and the end-of-tick flush.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    /// True once a destroy has been requested but not yet flushed. Callers
    /// holding a handle across a trigger or system boundary check this.
    pub fn is_pending_destroy(&self, entity: Entity) -> bool {
        self.entities.is_pending_destroy(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    /// Queues the entity for destruction at the end of the current update
    /// tick. Double-destroys and unknown ids are silent no-ops. Until the
    /// flush the entity remains visible to queries and mutable.
    pub fn destroy(&mut self, entity: Entity) {
        if self.entities.queue_destroy(entity) {
            log::trace!("queued destroy for {entity:?}");
        }
    }

    /// Flushes all queued destructions: per remaining component, detach hooks
    /// then unlink; then removal from every membership set and observer
    /// registration; then the metadata drop. Detach hooks may queue further
    /// destroys — those flush in the same pass.
    pub(crate) fn flush_destroyed(&mut self) {
        loop {
            let pending = self.entities.drain_pending();
            if pending.is_empty() {
                break;
            }
            for entity in pending {
                let Some(meta) = self.entities.meta(entity) else {
                    continue;
                };
                let types: Vec<TypeId> = meta.types.iter().copied().collect();
                for type_id in types {
                    self.detach_component(type_id, entity, false);
                }
                for membership in &mut self.memberships {
                    membership.matched.remove(&entity);
                }
                self.observers.remove_entity(entity);
                self.entities.release(entity);
                log::debug!("destroyed entity {entity:?}");
            }
        }
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attaches a component, replacing any existing instance of the same type
    /// (last write wins — the replaced instance receives its detach hooks
    /// first, so reactive components like [`Parent`] stay consistent under
    /// raw re-attachment).
    ///
    /// Fails with [`EcsError::InvalidEntity`] if the entity was never created
    /// or already flushed; pending-destroy entities stay mutable.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        if !self.entities.contains(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
        self.insert_component(entity, component);
        Ok(())
    }

    /// Infallible insertion path for callers that have already validated the
    /// entity (the public API, builders, hierarchy hooks).
    pub(crate) fn insert_component<T: Component>(&mut self, entity: Entity, component: T) {
        let type_id = TypeId::of::<T>();
        self.hooks
            .ensure_static_detach(type_id, static_detach_runner::<T>);

        let replacing = self
            .entities
            .meta(entity)
            .is_some_and(|meta| meta.types.contains(&type_id));
        if replacing {
            self.run_detach_hooks(type_id, entity);
        }

        // Structural state first: store, type set, memberships...
        self.stores
            .entry(type_id)
            .or_insert_with(ComponentStore::new)
            .insert(entity, Box::new(component));
        if let Some(meta) = self.entities.meta_mut(entity) {
            meta.types.insert(type_id);
        }
        self.refresh_memberships(entity);
        log::trace!(
            "attached `{}` to {entity:?}",
            std::any::type_name::<T>()
        );

        // ...then hooks: external registrations in order, then the static one.
        for hook in self.hooks.attach_snapshot(type_id) {
            (hook.borrow_mut())(self, entity);
        }
        T::on_attach(self, entity);
    }

    /// Detaches a component. Removing a type the entity doesn't hold is a
    /// silent no-op; mutating an unknown/destroyed entity is an error.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<(), EcsError> {
        if !self.entities.contains(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
        let type_id = TypeId::of::<T>();
        let held = self
            .entities
            .meta(entity)
            .is_some_and(|meta| meta.types.contains(&type_id));
        if held {
            self.detach_component(type_id, entity, true);
            log::trace!(
                "detached `{}` from {entity:?}",
                std::any::type_name::<T>()
            );
        }
        Ok(())
    }

    /// Detach hooks (while the instance is still reachable), then unlink from
    /// store and type set, then optionally re-evaluate memberships. The flush
    /// path skips the per-component refresh and strips memberships wholesale.
    fn detach_component(&mut self, type_id: TypeId, entity: Entity, refresh: bool) {
        self.run_detach_hooks(type_id, entity);
        if let Some(store) = self.stores.get_mut(&type_id) {
            store.remove(entity);
        }
        if let Some(meta) = self.entities.meta_mut(entity) {
            meta.types.remove(&type_id);
        }
        if refresh {
            self.refresh_memberships(entity);
        }
    }

    fn run_detach_hooks(&mut self, type_id: TypeId, entity: Entity) {
        for hook in self.hooks.detach_snapshot(type_id) {
            (hook.borrow_mut())(self, entity);
        }
        if let Some(runner) = self.hooks.static_detach(type_id) {
            runner(self, entity);
        }
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.contains(entity) {
            return None;
        }
        self.stores
            .get(&TypeId::of::<T>())?
            .get(entity)?
            .downcast_ref::<T>()
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.contains(entity) {
            return None;
        }
        self.stores
            .get_mut(&TypeId::of::<T>())?
            .get_mut(entity)?
            .downcast_mut::<T>()
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.entities
            .meta(entity)
            .is_some_and(|meta| meta.types.contains(&TypeId::of::<T>()))
    }

    /// The live type index for `T`: every instance with its owning entity, in
    /// insertion order. Order is not stable across removals.
    pub fn components_of<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.stores
            .get(&TypeId::of::<T>())
            .into_iter()
            .flat_map(|store| store.iter())
            .map(|(entity, any)| {
                let component = any.downcast_ref::<T>().unwrap_or_else(|| {
                    panic!(
                        "component store type mismatch for `{}`",
                        std::any::type_name::<T>()
                    )
                });
                (entity, component)
            })
    }

    // ── External lifecycle hooks ─────────────────────────────────────

    /// Registers an attach hook for `T`, fired after any instance of `T` is
    /// attached anywhere (before the type's own static hook).
    pub fn add_attach_hook<T: Component>(
        &mut self,
        hook: impl FnMut(&mut World, Entity) + 'static,
    ) {
        self.hooks
            .add_attach(TypeId::of::<T>(), std::rc::Rc::new(std::cell::RefCell::new(hook)));
    }

    /// Registers a detach hook for `T`, fired while the detaching instance is
    /// still reachable (before the type's own static hook).
    pub fn add_detach_hook<T: Component>(
        &mut self,
        hook: impl FnMut(&mut World, Entity) + 'static,
    ) {
        self.hooks
            .add_detach(TypeId::of::<T>(), std::rc::Rc::new(std::cell::RefCell::new(hook)));
    }

    // ── Resources ────────────────────────────────────────────────────

    /// Inserts a resource, replacing any existing one of the same type.
    pub fn insert_resource<T: 'static>(&mut self, value: T) {
        self.resources.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Shared access to a resource, or [`EcsError::ResourceNotFound`].
    pub fn resource<T: 'static>(&self) -> Result<&T, EcsError> {
        self.resources
            .get(&TypeId::of::<T>())
            .and_then(|r| r.downcast_ref::<T>())
            .ok_or(EcsError::ResourceNotFound(std::any::type_name::<T>()))
    }

    /// Exclusive access to a resource, or [`EcsError::ResourceNotFound`].
    pub fn resource_mut<T: 'static>(&mut self) -> Result<&mut T, EcsError> {
        self.resources
            .get_mut(&TypeId::of::<T>())
            .and_then(|r| r.downcast_mut::<T>())
            .ok_or(EcsError::ResourceNotFound(std::any::type_name::<T>()))
    }

    pub fn get_resource<T: 'static>(&self) -> Option<&T> {
        self.resources
            .get(&TypeId::of::<T>())
            .and_then(|r| r.downcast_ref::<T>())
    }

    pub fn get_resource_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.resources
            .get_mut(&TypeId::of::<T>())
            .and_then(|r| r.downcast_mut::<T>())
    }

    /// Auto-create convenience: returns the resource, lazily inserting
    /// `T::default()` on first access.
    pub fn resource_or_default<T: 'static + Default>(&mut self) -> &mut T {
        self.resources
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()))
            .downcast_mut::<T>()
            .unwrap_or_else(|| {
                panic!(
                    "resource slot type mismatch for `{}`",
                    std::any::type_name::<T>()
                )
            })
    }

    /// Removes a resource, taking ownership.
    pub fn remove_resource<T: 'static>(&mut self) -> Option<T> {
        self.resources
            .remove(&TypeId::of::<T>())
            .and_then(|r| r.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    // ── Buffered events ──────────────────────────────────────────────

    /// Appends an event to the write buffer. It becomes readable after the
    /// next update tick's buffer swap, for exactly one tick.
    pub fn send_event<E: 'static>(&mut self, event: E) {
        self.events.push(event);
    }

    /// The previous tick's events of type `E`, in push order.
    pub fn read_events<E: 'static>(&self) -> &[E] {
        self.events.read()
    }

    pub(crate) fn swap_event_buffers(&mut self) {
        self.events.swap();
    }

    // ── Observers / triggers ─────────────────────────────────────────

    /// Registers a global observer for `E`, fired on every trigger of that
    /// type after the bubble walk completes.
    pub fn observe<E: 'static>(
        &mut self,
        callback: impl FnMut(&mut World, Trigger<'_, E>) + 'static,
    ) {
        self.observers
            .add_global(TypeId::of::<E>(), erase_observer(callback));
    }

    /// Registers an observer scoped to one entity, fired when that entity is
    /// on the bubble path of a targeted trigger. Registering on an unknown or
    /// destroyed entity is a silent no-op.
    pub fn observe_entity<E: 'static>(
        &mut self,
        entity: Entity,
        callback: impl FnMut(&mut World, Trigger<'_, E>) + 'static,
    ) {
        if !self.entities.contains(entity) {
            return;
        }
        self.observers
            .add_scoped(entity, TypeId::of::<E>(), erase_observer(callback));
    }

    /// Fires `event` at the global observers only, synchronously.
    pub fn trigger<E: 'static>(&mut self, event: E) {
        self.dispatch(&event, None);
    }

    /// Fires `event` at `target`, bubbling up the parent chain: the target's
    /// observers first, then each ancestor's up to the root, then the global
    /// observers. Every step runs synchronously, in registration order, with
    /// no way to halt the walk.
    pub fn trigger_targets<E: 'static>(&mut self, event: E, target: Entity) {
        self.dispatch(&event, Some(target));
    }

    fn dispatch<E: 'static>(&mut self, event: &E, target: Option<Entity>) {
        let event_type = TypeId::of::<E>();
        if let Some(start) = target {
            let mut current = Some(start);
            while let Some(entity) = current {
                for callback in self.observers.scoped_snapshot(entity, event_type) {
                    (callback.borrow_mut())(self, event, target, Some(entity));
                }
                current = self.get::<Parent>(entity).map(|parent| parent.0);
            }
        }
        for callback in self.observers.global_snapshot(event_type) {
            (callback.borrow_mut())(self, event, target, None);
        }
    }

    // ── Memberships & queries ────────────────────────────────────────

    /// Registers a membership record and seeds it by evaluating every
    /// currently live entity once. Thereafter the record is maintained
    /// incrementally: cost per store mutation is proportional to the number
    /// of registered systems, not the number of entities.
    pub(crate) fn register_membership(
        &mut self,
        required: Vec<TypeId>,
        without: Vec<TypeId>,
    ) -> usize {
        let mut matched = HashSet::new();
        for (entity, meta) in self.entities.iter() {
            if required.iter().all(|t| meta.types.contains(t)) {
                matched.insert(entity);
            }
        }
        self.memberships.push(Membership {
            required,
            without,
            matched,
        });
        self.memberships.len() - 1
    }

    /// Recomputes — not transitions — the entity's membership in every
    /// registered record. Called synchronously on every add/remove.
    fn refresh_memberships(&mut self, entity: Entity) {
        let Some(meta) = self.entities.meta(entity) else {
            for membership in &mut self.memberships {
                membership.matched.remove(&entity);
            }
            return;
        };
        for membership in &mut self.memberships {
            if membership.required.iter().all(|t| meta.types.contains(t)) {
                membership.matched.insert(entity);
            } else {
                membership.matched.remove(&entity);
            }
        }
    }

    /// Registers a query: required types are `Q`'s access types plus the
    /// filter's `with` types; `without` types are kept for lazy exclusion.
    pub fn query_state<Q: QueryParam>(&mut self, filter: QueryFilter) -> QueryState<Q> {
        let mut required = Q::type_ids();
        for tid in &filter.with {
            if !required.contains(tid) {
                required.push(*tid);
            }
        }
        let membership = self.register_membership(required, filter.without);
        QueryState {
            membership,
            _marker: PhantomData,
        }
    }

    /// The iterable view for a registered query.
    pub fn query<'w, Q: QueryParam>(&'w mut self, state: &QueryState<Q>) -> Query<'w, Q> {
        let record = &self.memberships[state.membership];
        let entities: Vec<Entity> = record.matched.iter().copied().collect();
        let without = record.without.clone();
        Query::new(self, entities, without)
    }

    pub(crate) fn membership_snapshot(&self, membership: usize) -> Vec<Entity> {
        self.memberships[membership].matched.iter().copied().collect()
    }

    pub(crate) fn stores_mut(&mut self) -> &mut HashMap<TypeId, ComponentStore> {
        &mut self.stores
    }

    pub(crate) fn entity_has_any(&self, entity: Entity, types: &[TypeId]) -> bool {
        self.entities
            .meta(entity)
            .is_some_and(|meta| types.iter().any(|t| meta.types.contains(t)))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {}

    struct Velocity {
        dx: f32,
    }
    impl Component for Velocity {}

    struct Tagged;
    impl Component for Tagged {}

    #[test]
    fn add_get_mutate_remove() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();

        assert!(world.has::<Position>(e));
        assert_eq!(world.get::<Position>(e).unwrap().x, 1.0);

        world.get_mut::<Position>(e).unwrap().x = 5.0;
        assert_eq!(world.get::<Position>(e).unwrap().x, 5.0);

        world.remove_component::<Position>(e).unwrap();
        assert!(!world.has::<Position>(e));
        // Removing again stays a silent no-op.
        world.remove_component::<Position>(e).unwrap();
    }

    #[test]
    fn duplicate_type_is_last_write_wins() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Position { x: 1.0, y: 0.0 }).unwrap();
        world.add_component(e, Position { x: 9.0, y: 0.0 }).unwrap();

        assert_eq!(world.get::<Position>(e).unwrap().x, 9.0);
        assert_eq!(world.components_of::<Position>().count(), 1);
    }

    #[test]
    fn mutating_a_flushed_entity_is_an_error() {
        let mut world = World::new();
        let e = world.create_entity();
        world.destroy(e);

        // Pending-destroy entities remain mutable until the flush.
        world.add_component(e, Tagged).unwrap();

        world.flush_destroyed();
        assert_eq!(
            world.add_component(e, Tagged),
            Err(EcsError::InvalidEntity(e))
        );
        assert_eq!(
            world.remove_component::<Tagged>(e),
            Err(EcsError::InvalidEntity(e))
        );
        assert!(world.get::<Tagged>(e).is_none());
    }

    #[test]
    fn destroy_is_deferred_and_idempotent() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Tagged).unwrap();

        world.destroy(e);
        world.destroy(e); // double-destroy: silent

        // Still visible until the flush.
        assert!(world.is_alive(e));
        assert!(world.is_pending_destroy(e));
        assert_eq!(world.components_of::<Tagged>().count(), 1);

        world.flush_destroyed();
        assert!(!world.is_alive(e));
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.components_of::<Tagged>().count(), 0);
    }

    #[test]
    fn membership_matches_required_superset_after_every_mutation() {
        let mut world = World::new();
        let state = world
            .query_state::<(&Position, &Velocity)>(crate::ecs::query::QueryFilter::new());

        let e = world.create_entity();
        assert!(world.membership_snapshot(state.membership).is_empty());

        world.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        assert!(world.membership_snapshot(state.membership).is_empty());

        world.add_component(e, Velocity { dx: 1.0 }).unwrap();
        assert_eq!(world.membership_snapshot(state.membership), vec![e]);

        world.remove_component::<Position>(e).unwrap();
        assert!(world.membership_snapshot(state.membership).is_empty());

        world.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        world.destroy(e);
        world.flush_destroyed();
        assert!(world.membership_snapshot(state.membership).is_empty());
    }

    #[test]
    fn external_hooks_fire_before_static_in_registration_order() {
        // Tagged carries no static hooks, so the recorded order is purely
        // the external registrations.
        let mut world = World::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = order.clone();
        world.add_attach_hook::<Tagged>(move |_, _| log.borrow_mut().push("attach-1"));
        let log = order.clone();
        world.add_attach_hook::<Tagged>(move |_, _| log.borrow_mut().push("attach-2"));
        let log = order.clone();
        world.add_detach_hook::<Tagged>(move |world, entity| {
            // The instance must still be reachable while detach hooks run.
            assert!(world.has::<Tagged>(entity));
            log.borrow_mut().push("detach-1");
        });

        let e = world.create_entity();
        world.add_component(e, Tagged).unwrap();
        world.remove_component::<Tagged>(e).unwrap();

        assert_eq!(
            &*order.borrow(),
            &["attach-1", "attach-2", "detach-1"]
        );
    }

    #[test]
    fn replacement_fires_detach_on_the_old_instance() {
        let mut world = World::new();
        let detached = Rc::new(RefCell::new(0u32));
        let count = detached.clone();
        world.add_detach_hook::<Position>(move |_, _| *count.borrow_mut() += 1);

        let e = world.create_entity();
        world.add_component(e, Position { x: 1.0, y: 0.0 }).unwrap();
        assert_eq!(*detached.borrow(), 0);

        world.add_component(e, Position { x: 2.0, y: 0.0 }).unwrap();
        assert_eq!(*detached.borrow(), 1);
    }

    #[test]
    fn attach_hook_observes_updated_membership() {
        let mut world = World::new();
        let state = world.query_state::<&Tagged>(crate::ecs::query::QueryFilter::new());
        let membership = state.membership;

        let seen = Rc::new(RefCell::new(false));
        let flag = seen.clone();
        world.add_attach_hook::<Tagged>(move |world, entity| {
            // Store state and caches are updated before hooks run.
            assert!(world.membership_snapshot(membership).contains(&entity));
            *flag.borrow_mut() = true;
        });

        let e = world.create_entity();
        world.add_component(e, Tagged).unwrap();
        assert!(*seen.borrow());
    }

    #[test]
    fn destroy_flush_runs_detach_hooks_and_clears_observers() {
        let mut world = World::new();
        let detached = Rc::new(RefCell::new(0u32));
        let count = detached.clone();
        world.add_detach_hook::<Tagged>(move |_, _| *count.borrow_mut() += 1);

        struct Ping;
        let e = world.create_entity();
        world.add_component(e, Tagged).unwrap();
        world.observe_entity::<Ping>(e, |_, _| panic!("observer survived destruction"));

        world.destroy(e);
        world.flush_destroyed();

        assert_eq!(*detached.borrow(), 1);
        world.trigger_targets(Ping, e); // must not reach the dead registration
    }

    #[test]
    fn resources_roundtrip_and_error() {
        #[derive(Default, PartialEq, Debug)]
        struct Score(u32);

        let mut world = World::new();
        assert_eq!(
            world.resource::<Score>().unwrap_err(),
            EcsError::ResourceNotFound(std::any::type_name::<Score>())
        );
        assert!(world.get_resource::<Score>().is_none());

        // Auto-create on first access.
        world.resource_or_default::<Score>().0 = 7;
        assert_eq!(world.resource::<Score>().unwrap().0, 7);

        world.insert_resource(Score(42));
        world.resource_mut::<Score>().unwrap().0 += 1;
        assert_eq!(world.remove_resource::<Score>(), Some(Score(43)));
        assert!(world.get_resource::<Score>().is_none());
    }

    #[test]
    fn components_of_iterates_in_insertion_order() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let c = world.create_entity();
        world.add_component(b, Position { x: 2.0, y: 0.0 }).unwrap();
        world.add_component(a, Position { x: 1.0, y: 0.0 }).unwrap();
        world.add_component(c, Position { x: 3.0, y: 0.0 }).unwrap();

        let order: Vec<Entity> = world.components_of::<Position>().map(|(e, _)| e).collect();
        assert_eq!(order, vec![b, a, c]);
    }
}
