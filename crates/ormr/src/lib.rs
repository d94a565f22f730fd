//! # Ormr — Sparse-Set ECS Runtime Core
//!
//! A single-threaded entity-component runtime with cached query memberships,
//! reactive parent/child hierarchy, double-buffered events, and synchronous
//! bubbling triggers.
//!
//! Start with `use ormr::prelude::*` and build an [`App`](app::App), or use
//! [`World`](ecs::World) and [`Schedule`](ecs::Schedule) directly.

pub mod app;
pub mod ecs;
pub mod error;
pub mod prelude;
