//! Error types for fallible world operations.
//!
//! Structural no-ops (removing an absent component, double-destroying an
//! entity, detaching an absent parent) are deliberately *not* errors — they
//! keep cleanup idempotent under re-entrant or out-of-order calls. Errors are
//! reserved for the cases a caller genuinely needs to hear about.

use crate::ecs::Entity;

/// Errors surfaced by [`World`](crate::ecs::World) operations.
///
/// The core never retries; every failure propagates synchronously to the
/// immediate caller. Whether a failing system halts the current stage or the
/// driver continues with the remaining systems is a driver decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// A mutation was attempted on an entity id that was never created or has
    /// already been destroyed. Read paths (queries, observer lookups) treat
    /// such ids as empty instead of raising this.
    #[error("invalid entity {0:?}: never created or already destroyed")]
    InvalidEntity(Entity),

    /// A resource of the named type was requested but never inserted, and
    /// auto-creation was not asked for.
    #[error("resource `{0}` not found — insert it or use resource_or_default")]
    ResourceNotFound(&'static str),

    /// Re-parenting would make the child its own ancestor, which would send
    /// the bubble and despawn walks in circles.
    #[error("cannot parent {child:?} under {parent:?}: it would create a cycle")]
    HierarchyCycle { child: Entity, parent: Entity },
}
