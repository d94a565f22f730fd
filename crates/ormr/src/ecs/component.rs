//! # Component — Typed Data in Per-Type Sparse Sets
//!
//! Components are plain data attached to exactly one entity per type. The
//! world can't know user types at compile time, so each type gets one
//! [`ComponentStore`]: a type-erased sparse set keyed by [`TypeId`].
//!
//! ```text
//! ComponentStore for T
//!   sparse:   HashMap<Entity, usize>     entity → dense row
//!   entities: Vec<Entity>                dense row → owning entity
//!   data:     Vec<Box<dyn Any>>          dense row → instance of T
//! ```
//!
//! The dense `entities` vector doubles as the component → entity
//! back-reference (a relational side index, never an owning pointer), and
//! dense iteration in insertion order doubles as the component-type index
//! behind [`World::components_of`](super::world::World::components_of).
//! Removal is swap-remove, so iteration order is insertion order but not
//! stable across removals.
//!
//! ## Why `Box<dyn Any>`?
//!
//! The classic approach stores raw bytes with manual layout management — fast
//! but requires `unsafe`. We box each instance and `downcast` at the typed
//! boundary instead: zero unsafe code, and the storage stays easy to audit.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::entity::Entity;
use super::world::World;

/// Trait for component types.
///
/// The two associated functions are the type's *static* lifecycle hooks.
/// Both default to no-ops; override them to react to attach/detach — that is
/// exactly how the [`Parent`](super::hierarchy::Parent) component keeps the
/// hierarchy consistent. Hooks run at most once per attach/detach:
/// `on_attach` after the store is fully updated, `on_detach` while the
/// instance is still reachable through the entity.
pub trait Component: 'static {
    /// Called after the component has been inserted and system membership
    /// re-evaluated. Externally registered attach hooks run first.
    fn on_attach(_world: &mut World, _entity: Entity) {}

    /// Called before the component is unlinked from the entity and the type
    /// index. Externally registered detach hooks run first.
    fn on_detach(_world: &mut World, _entity: Entity) {}
}

/// Type-erased sparse set holding every live instance of one component type.
///
/// Public because it appears in [`QueryParam`](super::query::QueryParam)
/// signatures; all of its methods stay crate-internal, so from outside the
/// crate it is an opaque token.
#[doc(hidden)]
pub struct ComponentStore {
    sparse: HashMap<Entity, usize>,
    entities: Vec<Entity>,
    data: Vec<Box<dyn Any>>,
}

impl ComponentStore {
    pub(crate) fn new() -> Self {
        Self {
            sparse: HashMap::new(),
            entities: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Inserts or replaces the entity's instance. Last write wins; there is
    /// never more than one instance per entity.
    pub(crate) fn insert(&mut self, entity: Entity, value: Box<dyn Any>) {
        match self.sparse.get(&entity) {
            Some(&row) => self.data[row] = value,
            None => {
                self.sparse.insert(entity, self.data.len());
                self.entities.push(entity);
                self.data.push(value);
            }
        }
    }

    pub(crate) fn contains(&self, entity: Entity) -> bool {
        self.sparse.contains_key(&entity)
    }

    pub(crate) fn get(&self, entity: Entity) -> Option<&dyn Any> {
        self.sparse.get(&entity).map(|&row| &*self.data[row])
    }

    pub(crate) fn get_mut(&mut self, entity: Entity) -> Option<&mut dyn Any> {
        match self.sparse.get(&entity) {
            Some(&row) => Some(&mut *self.data[row]),
            None => None,
        }
    }

    /// Swap-removes the entity's instance, fixing up the row of whichever
    /// entity got swapped into the hole. Returns `false` if absent.
    pub(crate) fn remove(&mut self, entity: Entity) -> bool {
        let Some(row) = self.sparse.remove(&entity) else {
            return false;
        };
        self.entities.swap_remove(row);
        self.data.swap_remove(row);
        if row < self.entities.len() {
            self.sparse.insert(self.entities[row], row);
        }
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Dense iteration in insertion order, entity back-reference included.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Entity, &dyn Any)> {
        self.entities
            .iter()
            .zip(self.data.iter())
            .map(|(e, any)| (*e, &**any))
    }
}

/// An externally registered attach/detach hook. `Rc<RefCell>` lets the world
/// snapshot the hook list and call each hook with `&mut World` without
/// holding a borrow on the registry itself.
pub(crate) type HookFn = Rc<RefCell<dyn FnMut(&mut World, Entity)>>;

/// Monomorphized trampoline to a component type's static detach hook, stored
/// as a plain fn pointer so destroy-flush can detach without knowing `T`.
pub(crate) type StaticDetachFn = fn(&mut World, Entity);

pub(crate) fn static_detach_runner<T: Component>(world: &mut World, entity: Entity) {
    T::on_detach(world, entity);
}

/// Registry of lifecycle hooks keyed by component type.
///
/// Invocation order is fixed either way: externally registered hooks in
/// registration order, then the type's own static hook.
#[derive(Default)]
pub(crate) struct Hooks {
    attach: HashMap<TypeId, Vec<HookFn>>,
    detach: HashMap<TypeId, Vec<HookFn>>,
    static_detach: HashMap<TypeId, StaticDetachFn>,
}

impl Hooks {
    pub(crate) fn add_attach(&mut self, type_id: TypeId, hook: HookFn) {
        self.attach.entry(type_id).or_default().push(hook);
    }

    pub(crate) fn add_detach(&mut self, type_id: TypeId, hook: HookFn) {
        self.detach.entry(type_id).or_default().push(hook);
    }

    /// Records the static detach trampoline for a type, first insert wins.
    pub(crate) fn ensure_static_detach(&mut self, type_id: TypeId, runner: StaticDetachFn) {
        self.static_detach.entry(type_id).or_insert(runner);
    }

    pub(crate) fn attach_snapshot(&self, type_id: TypeId) -> Vec<HookFn> {
        self.attach.get(&type_id).cloned().unwrap_or_default()
    }

    pub(crate) fn detach_snapshot(&self, type_id: TypeId) -> Vec<HookFn> {
        self.detach.get(&type_id).cloned().unwrap_or_default()
    }

    pub(crate) fn static_detach(&self, type_id: TypeId) -> Option<StaticDetachFn> {
        self.static_detach.get(&type_id).copied()
    }
}
