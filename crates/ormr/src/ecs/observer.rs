//! # Observers — Synchronous Triggers with Hierarchical Bubbling
//!
//! Where buffered events are deferred by a tick, a trigger is a plain
//! synchronous call: [`World::trigger`](super::world::World::trigger) runs
//! every interested callback before it returns. Triggers aimed at an entity
//! bubble upward — the target's observers fire first, then each ancestor's in
//! turn up to the root, then the global observers for that event type. There
//! is no stop-propagation: every ancestor sees the event exactly once.
//!
//! Callbacks are stored as `Rc<RefCell<…>>` so dispatch can snapshot a
//! registration list and hand each callback `&mut World` without borrowing
//! the registry. Re-entrant triggering from inside a callback is therefore
//! just a deeper call stack, processed fully before the outer callback
//! resumes.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::entity::Entity;
use super::world::World;

/// The context handed to an observer callback: the event payload, the entity
/// the trigger originally targeted, and the entity whose registration fired
/// (`None` for global observers).
pub struct Trigger<'a, E> {
    pub(crate) event: &'a E,
    pub(crate) target: Option<Entity>,
    pub(crate) observer: Option<Entity>,
}

impl<'a, E> Trigger<'a, E> {
    /// The triggered event payload. Every callback on the bubble path sees
    /// the same instance.
    pub fn event(&self) -> &'a E {
        self.event
    }

    /// The entity the trigger was aimed at, if any.
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// The entity this callback was registered on. `None` when the callback
    /// is a global observer.
    pub fn observer(&self) -> Option<Entity> {
        self.observer
    }
}

/// Type-erased observer callback: (world, payload, target, registration
/// entity). The typed wrapper is created at registration time.
pub(crate) type ObserverFn =
    Rc<RefCell<dyn FnMut(&mut World, &dyn Any, Option<Entity>, Option<Entity>)>>;

/// Wraps a typed callback into the erased form, restoring the static type at
/// dispatch. A downcast miss here is a dispatcher bug, not a user error.
pub(crate) fn erase_observer<E: 'static>(
    mut callback: impl FnMut(&mut World, Trigger<'_, E>) + 'static,
) -> ObserverFn {
    Rc::new(RefCell::new(
        move |world: &mut World, payload: &dyn Any, target, observer| {
            let event = payload.downcast_ref::<E>().unwrap_or_else(|| {
                panic!(
                    "observer payload type mismatch for `{}`",
                    std::any::type_name::<E>()
                )
            });
            callback(
                world,
                Trigger {
                    event,
                    target,
                    observer,
                },
            );
        },
    ))
}

/// Registrations, global and entity-scoped. Scoped callbacks are bucketed by
/// entity first so a destroy-flush can drop everything an entity registered
/// in one operation.
#[derive(Default)]
pub(crate) struct Observers {
    global: HashMap<TypeId, Vec<ObserverFn>>,
    scoped: HashMap<Entity, HashMap<TypeId, Vec<ObserverFn>>>,
}

impl Observers {
    pub(crate) fn add_global(&mut self, event_type: TypeId, callback: ObserverFn) {
        self.global.entry(event_type).or_default().push(callback);
    }

    pub(crate) fn add_scoped(&mut self, entity: Entity, event_type: TypeId, callback: ObserverFn) {
        self.scoped
            .entry(entity)
            .or_default()
            .entry(event_type)
            .or_default()
            .push(callback);
    }

    /// Cloned registration list, in registration order. Cloning `Rc`s lets a
    /// callback register further observers without invalidating the walk; the
    /// newcomers simply miss the in-flight dispatch.
    pub(crate) fn global_snapshot(&self, event_type: TypeId) -> Vec<ObserverFn> {
        self.global.get(&event_type).cloned().unwrap_or_default()
    }

    pub(crate) fn scoped_snapshot(&self, entity: Entity, event_type: TypeId) -> Vec<ObserverFn> {
        self.scoped
            .get(&entity)
            .and_then(|by_type| by_type.get(&event_type))
            .cloned()
            .unwrap_or_default()
    }

    /// Drops every registration scoped to the entity. Called by the
    /// destroy-flush.
    pub(crate) fn remove_entity(&mut self, entity: Entity) {
        self.scoped.remove(&entity);
    }
}

#[cfg(test)]
mod tests {
    use crate::ecs::world::World;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Damage(u32);
    struct Healed;

    #[test]
    fn global_trigger_invokes_in_registration_order() {
        let mut world = World::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = order.clone();
        world.observe::<Damage>(move |_, trigger| {
            log.borrow_mut().push(("first", trigger.event().0));
        });
        let log = order.clone();
        world.observe::<Damage>(move |_, trigger| {
            log.borrow_mut().push(("second", trigger.event().0));
        });

        world.trigger(Damage(3));
        assert_eq!(&*order.borrow(), &[("first", 3), ("second", 3)]);
    }

    #[test]
    fn bubbles_target_then_ancestors_then_global() {
        let mut world = World::new();
        let root = world.create_entity();
        let mid = world.create_entity();
        let leaf = world.create_entity();
        world.set_parent(mid, root).unwrap();
        world.set_parent(leaf, mid).unwrap();

        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let log = order.clone();
        world.observe_entity::<Damage>(leaf, move |_, _| log.borrow_mut().push("leaf"));
        let log = order.clone();
        world.observe_entity::<Damage>(mid, move |_, _| log.borrow_mut().push("mid"));
        let log = order.clone();
        world.observe_entity::<Damage>(root, move |_, _| log.borrow_mut().push("root"));
        let log = order.clone();
        world.observe::<Damage>(move |_, _| log.borrow_mut().push("global"));

        world.trigger_targets(Damage(1), leaf);
        assert_eq!(&*order.borrow(), &["leaf", "mid", "root", "global"]);
    }

    #[test]
    fn unrelated_entity_observer_is_not_invoked() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();

        let hits = Rc::new(RefCell::new(0u32));
        let count = hits.clone();
        world.observe_entity::<Damage>(a, move |_, trigger| {
            assert_eq!(trigger.target(), Some(trigger.observer().unwrap()));
            *count.borrow_mut() += 1;
        });
        world.observe_entity::<Damage>(b, |_, _| panic!("wrong entity's observer fired"));

        world.trigger_targets(Damage(9), a);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn untargeted_trigger_skips_entity_scopes() {
        let mut world = World::new();
        let a = world.create_entity();
        world.observe_entity::<Healed>(a, |_, _| panic!("scoped observer fired globally"));

        let hits = Rc::new(RefCell::new(0u32));
        let count = hits.clone();
        world.observe::<Healed>(move |_, trigger| {
            assert!(trigger.target().is_none());
            *count.borrow_mut() += 1;
        });

        world.trigger(Healed);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn reentrant_trigger_completes_inline() {
        let mut world = World::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = order.clone();
        world.observe::<Healed>(move |_, _| log.borrow_mut().push("inner"));

        let log = order.clone();
        world.observe::<Damage>(move |world, _| {
            log.borrow_mut().push("outer-before");
            world.trigger(Healed);
            log.borrow_mut().push("outer-after");
        });

        world.trigger(Damage(1));
        assert_eq!(&*order.borrow(), &["outer-before", "inner", "outer-after"]);
    }

    #[test]
    fn trigger_on_destroyed_target_still_reaches_globals() {
        let mut world = World::new();
        let ghost = world.create_entity();
        world.observe_entity::<Damage>(ghost, |_, _| panic!("destroyed scope fired"));
        world.destroy(ghost);
        world.flush_destroyed();

        let hits = Rc::new(RefCell::new(0u32));
        let count = hits.clone();
        world.observe::<Damage>(move |_, _| *count.borrow_mut() += 1);

        world.trigger_targets(Damage(1), ghost);
        assert_eq!(*hits.borrow(), 1);
    }
}
