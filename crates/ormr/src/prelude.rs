//! Convenience re-exports — `use ormr::prelude::*` for the common items.

pub use crate::app::App;
pub use crate::ecs::{
    ChildSpawner, Children, Component, Entity, EntityWorldMut, Parent, Query, QueryFilter,
    QueryState, Schedule, Stage, System, Trigger, World,
};
pub use crate::error::EcsError;
