//! # Query — Filterable Views Over Cached Entity Sets
//!
//! A query does not scan the world. Registering one creates a membership
//! record in the [`World`](super::world::World) whose required-type list is
//! the query's access types plus its `with` filters; the store keeps that
//! record's entity set fresh on every component add/remove. Iterating a query
//! only walks the cached set.
//!
//! ```text
//! let state = world.query_state::<(&Position, &mut Velocity)>(
//!     QueryFilter::new().without::<Frozen>(),
//! );
//!
//! world.query(&state).for_each(|world, entity, (pos, vel)| {
//!     // pos: &Position, vel: &mut Velocity — world is still usable for
//!     // events, triggers, and deferred destroys.
//! });
//! ```
//!
//! `without` filters are *not* part of the membership precondition — excluded
//! entities stay in the cached set and are skipped lazily at iteration time.
//!
//! ## The extract/restore trick
//!
//! Rust's `Iterator` can't express "yielded items borrow from the iterator",
//! and fetching `(&mut A, &B)` needs simultaneous access to two stores inside
//! one `HashMap`. Instead of unsafe pointer games, [`QueryParam::extract`]
//! temporarily *removes* the needed stores from the world's map, giving owned
//! access the borrow checker can verify, and restores them afterwards. The
//! price: inside `for_each`, the queried component types must not be touched
//! structurally through the world (their stores are out on loan).

use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;

use super::component::{Component, ComponentStore};
use super::entity::Entity;
use super::world::World;

/// Trait for things fetchable per entity from the component stores.
///
/// Implemented for `&T` (shared read), `&mut T` (exclusive write), and tuples
/// of those up to eight elements, so `(&A, &mut B)` just works.
pub trait QueryParam {
    /// The item yielded per entity.
    type Item<'w>;

    /// Owned store data taken out of the world for the duration of a fetch.
    type Fetch;

    /// The component types this parameter reads or writes, in declared order.
    fn type_ids() -> Vec<TypeId>;

    /// Takes the needed store(s) out of the world's store map. A store that
    /// was never created (no instance of the type ever attached) comes back
    /// as `None` and every fetch against it misses.
    fn extract(stores: &mut HashMap<TypeId, ComponentStore>) -> Self::Fetch;

    /// Puts the store(s) back.
    fn restore(fetch: Self::Fetch, stores: &mut HashMap<TypeId, ComponentStore>);

    /// Fetches the item for one entity, or `None` if any part is missing.
    fn fetch<'f>(fetch: &'f mut Self::Fetch, entity: Entity) -> Option<Self::Item<'f>>;
}

impl<T: Component> QueryParam for &T {
    type Item<'w> = &'w T;
    type Fetch = (TypeId, Option<ComponentStore>);

    fn type_ids() -> Vec<TypeId> {
        vec![TypeId::of::<T>()]
    }

    fn extract(stores: &mut HashMap<TypeId, ComponentStore>) -> Self::Fetch {
        let tid = TypeId::of::<T>();
        (tid, stores.remove(&tid))
    }

    fn restore(fetch: Self::Fetch, stores: &mut HashMap<TypeId, ComponentStore>) {
        if let Some(store) = fetch.1 {
            stores.insert(fetch.0, store);
        }
    }

    fn fetch<'f>(fetch: &'f mut Self::Fetch, entity: Entity) -> Option<Self::Item<'f>> {
        fetch.1.as_ref()?.get(entity)?.downcast_ref::<T>()
    }
}

impl<T: Component> QueryParam for &mut T {
    type Item<'w> = &'w mut T;
    type Fetch = (TypeId, Option<ComponentStore>);

    fn type_ids() -> Vec<TypeId> {
        vec![TypeId::of::<T>()]
    }

    fn extract(stores: &mut HashMap<TypeId, ComponentStore>) -> Self::Fetch {
        let tid = TypeId::of::<T>();
        (tid, stores.remove(&tid))
    }

    fn restore(fetch: Self::Fetch, stores: &mut HashMap<TypeId, ComponentStore>) {
        if let Some(store) = fetch.1 {
            stores.insert(fetch.0, store);
        }
    }

    fn fetch<'f>(fetch: &'f mut Self::Fetch, entity: Entity) -> Option<Self::Item<'f>> {
        fetch.1.as_mut()?.get_mut(entity)?.downcast_mut::<T>()
    }
}

macro_rules! impl_query_param_tuple {
    ($($P:ident),+) => {
        impl<$($P: QueryParam),+> QueryParam for ($($P,)+) {
            type Item<'w> = ($($P::Item<'w>,)+);
            type Fetch = ($($P::Fetch,)+);

            fn type_ids() -> Vec<TypeId> {
                let mut ids = Vec::new();
                $(ids.extend($P::type_ids());)+
                ids
            }

            #[allow(non_snake_case)]
            fn extract(stores: &mut HashMap<TypeId, ComponentStore>) -> Self::Fetch {
                ($($P::extract(stores),)+)
            }

            #[allow(non_snake_case)]
            fn restore(fetch: Self::Fetch, stores: &mut HashMap<TypeId, ComponentStore>) {
                let ($($P,)+) = fetch;
                $($P::restore($P, stores);)+
            }

            #[allow(non_snake_case)]
            fn fetch<'f>(fetch: &'f mut Self::Fetch, entity: Entity) -> Option<Self::Item<'f>> {
                let ($($P,)+) = fetch;
                Some(($($P::fetch($P, entity)?,)+))
            }
        }
    };
}

impl_query_param_tuple!(A);
impl_query_param_tuple!(A, B);
impl_query_param_tuple!(A, B, C);
impl_query_param_tuple!(A, B, C, D);
impl_query_param_tuple!(A, B, C, D, E);
impl_query_param_tuple!(A, B, C, D, E, F);
impl_query_param_tuple!(A, B, C, D, E, F, G);
impl_query_param_tuple!(A, B, C, D, E, F, G, H);

/// Inclusion/exclusion filters for a query, beyond its access types.
///
/// `with` types join the membership precondition; `without` types are checked
/// lazily while iterating.
#[derive(Default)]
pub struct QueryFilter {
    pub(crate) with: Vec<TypeId>,
    pub(crate) without: Vec<TypeId>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require entities to also hold `T` without fetching it.
    pub fn with<T: Component>(mut self) -> Self {
        self.with.push(TypeId::of::<T>());
        self
    }

    /// Skip entities holding `T`.
    pub fn without<T: Component>(mut self) -> Self {
        self.without.push(TypeId::of::<T>());
        self
    }
}

/// Registered-query handle. Cheap to keep around; create once, reuse across
/// ticks. Obtain the iterable view with [`World::query`].
pub struct QueryState<Q: QueryParam> {
    pub(crate) membership: usize,
    pub(crate) _marker: PhantomData<fn() -> Q>,
}

/// A borrowed, iterable view over one registered query's cached entity set.
pub struct Query<'w, Q: QueryParam> {
    world: &'w mut World,
    entities: Vec<Entity>,
    without: Vec<TypeId>,
    _marker: PhantomData<fn() -> Q>,
}

impl<'w, Q: QueryParam> Query<'w, Q> {
    pub(crate) fn new(world: &'w mut World, entities: Vec<Entity>, without: Vec<TypeId>) -> Self {
        Self {
            world,
            entities,
            without,
            _marker: PhantomData,
        }
    }

    /// The cached entity set snapshot, before `without` filtering.
    /// Destroyed-but-unflushed entities are still present.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Matching entities after `without` filtering.
    pub fn count(&self) -> usize {
        self.entities
            .iter()
            .filter(|&&e| !self.world.entity_has_any(e, &self.without))
            .count()
    }

    /// The world behind this view, for reads and deferred mutations between
    /// iterations.
    pub fn world(&mut self) -> &mut World {
        self.world
    }

    /// Calls `f` once per matching entity with its component tuple.
    ///
    /// The closure receives the world so it can read other data, push events,
    /// trigger observers, or request deferred destruction mid-iteration. The
    /// component types named by `Q` are on loan for the duration and must not
    /// be structurally added or removed through that world handle.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut World, Entity, Q::Item<'_>)) {
        let mut fetch = Q::extract(self.world.stores_mut());
        for &entity in &self.entities {
            if self.world.entity_has_any(entity, &self.without) {
                continue;
            }
            if let Some(item) = Q::fetch(&mut fetch, entity) {
                f(self.world, entity, item);
            }
        }
        Q::restore(fetch, self.world.stores_mut());
    }
}
