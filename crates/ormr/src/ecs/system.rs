//! # Systems & Schedule — The Tick Pipeline
//!
//! A system is a function over the world. There are two flavors:
//!
//! - **Global systems** are plain `FnMut(&mut World)` — closures or fn
//!   pointers, added directly. They see the whole world.
//! - **Tracked systems** implement the [`System`] trait with an associated
//!   [`QueryParam`]. Registering one creates a cached entity-membership set,
//!   and each tick the system's `update` receives a pre-filtered [`Query`]
//!   over exactly the matching entities — no per-tick scan.
//!
//! Within a stage, systems run strictly in registration order. There is no
//! dependency graph and no parallelism; ordering is the registration order,
//! full stop.
//!
//! ## Stages and the update tick
//!
//! ```text
//! run_update:
//!   1. swap event buffers      (last tick's sends become readable)
//!   2. run Update systems      (registration order)
//!   3. flush queued destroys   (deferred destruction resolves here)
//! ```
//!
//! [`Stage::Startup`] and [`Stage::FixedUpdate`] run their systems only —
//! no event swap, no destroy flush. Fixed-update cadence is the caller's
//! job: run [`Schedule::run_fixed_update`] zero or more times per frame
//! from your own accumulator.
//!
//! ## Comparison
//!
//! - **bevy_ecs**: schedules are dependency graphs with automatic
//!   parallelism and run conditions. Ours is a `Vec` per stage.
//! - **hecs**: no schedule at all; you call your functions yourself.

use super::query::{Query, QueryFilter, QueryParam, QueryState};
use super::world::World;

/// Which phase of the tick a system belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Run once, up front, by the driver.
    Startup,
    /// Run every frame; the stage that swaps events and flushes destroys.
    Update,
    /// Run on a fixed timestep, zero or more times per frame.
    FixedUpdate,
}

/// A tracked system: declares its component access up front and receives a
/// cached, pre-filtered [`Query`] each tick.
pub trait System: 'static {
    /// Component access pattern, e.g. `(&Position, &mut Velocity)`.
    type Query: QueryParam;

    /// Extra membership constraints beyond the access pattern.
    fn filter() -> QueryFilter {
        QueryFilter::new()
    }

    fn update(&mut self, query: Query<'_, Self::Query>);
}

/// Anything the schedule can execute. Global closures and tracked-system
/// wrappers both end up as one of these.
trait Runnable {
    fn run(&mut self, world: &mut World);
}

impl<F: FnMut(&mut World)> Runnable for F {
    fn run(&mut self, world: &mut World) {
        (self)(world);
    }
}

/// Pairs a tracked system with its registered query state.
struct TrackedRunner<S: System> {
    system: S,
    state: QueryState<S::Query>,
}

impl<S: System> Runnable for TrackedRunner<S> {
    fn run(&mut self, world: &mut World) {
        let query = world.query(&self.state);
        self.system.update(query);
    }
}

/// A boxed runnable with a short name for trace logging.
struct NamedSystem {
    name: String,
    system: Box<dyn Runnable>,
}

impl NamedSystem {
    fn run(&mut self, world: &mut World) {
        let start = std::time::Instant::now();
        self.system.run(world);
        log::trace!(
            "system `{}` ran in {:.1}us",
            self.name,
            start.elapsed().as_secs_f64() * 1_000_000.0
        );
    }
}

/// Ordered system lists, one per stage.
pub struct Schedule {
    startup: Vec<NamedSystem>,
    update: Vec<NamedSystem>,
    fixed: Vec<NamedSystem>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            startup: Vec::new(),
            update: Vec::new(),
            fixed: Vec::new(),
        }
    }

    /// Appends a global system to the given stage.
    pub fn add_system<F: FnMut(&mut World) + 'static>(&mut self, stage: Stage, system: F) {
        self.stage_mut(stage).push(NamedSystem {
            name: short_system_name(std::any::type_name::<F>()),
            system: Box::new(system),
        });
    }

    /// Appends a tracked system, registering its membership against the
    /// world now so the cache is live from this point on.
    pub fn add_tracked<S: System>(&mut self, world: &mut World, stage: Stage, system: S) {
        let state = world.query_state::<S::Query>(S::filter());
        self.stage_mut(stage).push(NamedSystem {
            name: short_system_name(std::any::type_name::<S>()),
            system: Box::new(TrackedRunner { system, state }),
        });
    }

    /// Appends a callback system with an injected query: the membership is
    /// resolved against the world at registration time, and each tick the
    /// callback receives the pre-filtered [`Query`] view directly. This is
    /// the closure-shaped middle ground between a global system (which pulls
    /// everything by hand) and a full [`System`] impl. Resources and other
    /// world data stay reachable through [`Query::world`].
    pub fn add_query_system<Q, F>(
        &mut self,
        world: &mut World,
        stage: Stage,
        filter: QueryFilter,
        mut system: F,
    ) where
        Q: QueryParam + 'static,
        F: for<'w> FnMut(Query<'w, Q>) + 'static,
    {
        let name = short_system_name(std::any::type_name_of_val(&system));
        let state = world.query_state::<Q>(filter);
        self.stage_mut(stage).push(NamedSystem {
            name,
            system: Box::new(move |world: &mut World| {
                system(world.query(&state));
            }),
        });
    }

    fn stage_mut(&mut self, stage: Stage) -> &mut Vec<NamedSystem> {
        match stage {
            Stage::Startup => &mut self.startup,
            Stage::Update => &mut self.update,
            Stage::FixedUpdate => &mut self.fixed,
        }
    }

    /// Runs the startup systems in order. The driver calls this once before
    /// the first update tick; calling it again runs them again.
    pub fn run_startup(&mut self, world: &mut World) {
        for system in &mut self.startup {
            system.run(world);
        }
    }

    /// One update tick: swap event buffers, run the Update systems in
    /// order, then flush queued destructions.
    pub fn run_update(&mut self, world: &mut World) {
        world.swap_event_buffers();
        for system in &mut self.update {
            system.run(world);
        }
        world.flush_destroyed();
    }

    /// One fixed-timestep step: the FixedUpdate systems only.
    pub fn run_fixed_update(&mut self, world: &mut World) {
        for system in &mut self.fixed {
            system.run(world);
        }
    }

    pub fn len(&self) -> usize {
        self.startup.len() + self.update.len() + self.fixed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the module path from a fully-qualified type name, keeping only the
/// last segment (`demo::movement_system` → `movement_system`, closures →
/// `<closure>`).
fn short_system_name(full: &str) -> String {
    let name = full.rsplit("::").next().unwrap_or(full);
    if name.contains("closure") {
        "<closure>".to_string()
    } else {
        name.to_string()
    }
}
