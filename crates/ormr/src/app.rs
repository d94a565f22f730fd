//! App builder — the entry point for an ormr runtime.
//!
//! Bundles a [`World`] and a [`Schedule`] behind a builder API, then hands
//! control of the tick cadence back to you: call [`App::run_startup`] once,
//! then [`App::run_update`] per frame and [`App::run_fixed_update`] from
//! your own fixed-step accumulator.
//!
//! ## Example
//!
//! ```ignore
//! use ormr::prelude::*;
//!
//! fn main() {
//!     let mut app = App::new()
//!         .insert_resource(Score(0))
//!         .add_startup_system(spawn_board)
//!         .add_system(advance_turn);
//!
//!     app.run_startup();
//!     loop {
//!         app.run_update();
//!     }
//! }
//! ```

use crate::ecs::query::{Query, QueryFilter, QueryParam};
use crate::ecs::system::{Schedule, Stage, System};
use crate::ecs::world::World;

/// The app builder. Both fields are public — drop down to the raw world or
/// schedule whenever the builder surface is too narrow.
pub struct App {
    pub world: World,
    pub schedule: Schedule,
}

impl App {
    /// Create a new app with an empty world and no systems.
    pub fn new() -> Self {
        Self {
            world: World::new(),
            schedule: Schedule::new(),
        }
    }

    /// Insert a resource into the world.
    pub fn insert_resource<T: 'static>(mut self, value: T) -> Self {
        self.world.insert_resource(value);
        self
    }

    /// Add a system that runs once, before the first update tick.
    pub fn add_startup_system<F: FnMut(&mut World) + 'static>(mut self, system: F) -> Self {
        self.schedule.add_system(Stage::Startup, system);
        self
    }

    /// Add a system that runs every update tick.
    pub fn add_system<F: FnMut(&mut World) + 'static>(mut self, system: F) -> Self {
        self.schedule.add_system(Stage::Update, system);
        self
    }

    /// Add a system that runs on the fixed timestep.
    pub fn add_fixed_system<F: FnMut(&mut World) + 'static>(mut self, system: F) -> Self {
        self.schedule.add_system(Stage::FixedUpdate, system);
        self
    }

    /// Add an update-tick system receiving an injected, pre-filtered query.
    pub fn add_query_system<Q, F>(mut self, filter: QueryFilter, system: F) -> Self
    where
        Q: QueryParam + 'static,
        F: for<'w> FnMut(Query<'w, Q>) + 'static,
    {
        self.schedule
            .add_query_system(&mut self.world, Stage::Update, filter, system);
        self
    }

    /// Add a tracked system with a cached entity membership.
    pub fn add_tracked_system<S: System>(mut self, stage: Stage, system: S) -> Self {
        self.schedule.add_tracked(&mut self.world, stage, system);
        self
    }

    /// Run the startup systems once.
    pub fn run_startup(&mut self) {
        self.schedule.run_startup(&mut self.world);
    }

    /// Run one update tick: event swap, Update systems, destroy flush.
    pub fn run_update(&mut self) {
        self.schedule.run_update(&mut self.world);
    }

    /// Run one fixed-timestep step.
    pub fn run_fixed_update(&mut self) {
        self.schedule.run_fixed_update(&mut self.world);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Component;
    use crate::ecs::query::{Query, QueryFilter};

    struct Counter(u32);
    impl Component for Counter {}

    #[test]
    fn startup_then_update() {
        let mut app = App::new()
            .insert_resource(Vec::<&'static str>::new())
            .add_startup_system(|w: &mut World| {
                w.resource_or_default::<Vec<&'static str>>().push("startup");
            })
            .add_system(|w: &mut World| {
                w.resource_or_default::<Vec<&'static str>>().push("update");
            });

        app.run_startup();
        app.run_update();
        app.run_update();

        assert_eq!(
            *app.world.resource::<Vec<&'static str>>().unwrap(),
            vec!["startup", "update", "update"]
        );
    }

    #[test]
    fn tracked_system_through_the_builder() {
        struct Bump;
        impl System for Bump {
            type Query = &'static mut Counter;
            fn filter() -> QueryFilter {
                QueryFilter::new()
            }
            fn update(&mut self, mut query: Query<'_, Self::Query>) {
                query.for_each(|_, _, counter| counter.0 += 1);
            }
        }

        let mut app = App::new().add_tracked_system(Stage::Update, Bump);
        let e = app.world.create_entity();
        app.world.add_component(e, Counter(0)).unwrap();

        app.run_update();
        app.run_update();
        assert_eq!(app.world.get::<Counter>(e).unwrap().0, 2);
    }

    #[test]
    fn query_system_through_the_builder() {
        let mut app = App::new().add_query_system::<&'static mut Counter, _>(
            QueryFilter::new(),
            |mut query| {
                query.for_each(|_, _, counter| counter.0 += 10);
            },
        );
        let e = app.world.create_entity();
        app.world.add_component(e, Counter(0)).unwrap();

        app.run_update();
        assert_eq!(app.world.get::<Counter>(e).unwrap().0, 10);
    }

    #[test]
    fn fixed_systems_run_only_on_fixed_steps() {
        let mut app = App::new()
            .insert_resource(0u32)
            .add_fixed_system(|w: &mut World| {
                *w.resource_or_default::<u32>() += 1;
            });

        app.run_update();
        assert_eq!(*app.world.resource::<u32>().unwrap(), 0);

        app.run_fixed_update();
        app.run_fixed_update();
        assert_eq!(*app.world.resource::<u32>().unwrap(), 2);
    }
}
