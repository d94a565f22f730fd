//! # Sparse-Set ECS With Cached Query Memberships
//!
//! A deliberately simple Entity Component System built around per-type
//! sparse-set stores rather than archetypes. The trade: component moves are
//! O(1) with no archetype churn, at the cost of per-type lookups when
//! fetching tuples. Registered systems and queries don't pay a scan at all —
//! each keeps a membership set the store updates incrementally on every
//! add/remove.
//!
//! ## Module Overview
//!
//! - [`entity`] — Monotonic entity ids (never reused) and deferred destruction
//! - [`component`] — The [`Component`] trait, per-type sparse stores, hooks
//! - [`world`] — Central container (entities, stores, resources, events,
//!   observers, memberships)
//! - [`hierarchy`] — Reactive [`Parent`]/[`Children`] tree maintenance
//! - [`query`] — Cached, filterable views; the extract/restore fetch
//! - [`system`] — Stages, the [`Schedule`], tracked and global systems
//! - [`event`] — Double-buffered event queues
//! - [`observer`] — Synchronous triggers with parent-chain bubbling
//! - [`commands`] — Builder-style entity handles

pub(crate) mod component;
pub mod commands;
pub mod entity;
pub(crate) mod event;
pub mod hierarchy;
pub mod observer;
pub mod query;
pub mod system;
pub mod world;

pub use commands::{ChildSpawner, EntityWorldMut};
pub use component::Component;
#[doc(hidden)]
pub use component::ComponentStore;
pub use entity::Entity;
pub use hierarchy::{Children, Parent};
pub use observer::Trigger;
pub use query::{Query, QueryFilter, QueryParam, QueryState};
pub use system::{Schedule, Stage, System};
pub use world::World;
