//! # Buffered Events — Double-Buffered, One-Tick-Delayed Delivery
//!
//! Two mappings from event type to an ordered list of events: a write side
//! for the in-progress tick and a read side holding the previous tick's
//! events. Pushing appends to the write side; reading only ever sees the
//! read side. Exactly once per update tick — before any Update-stage system
//! runs — the read side is discarded, the write side becomes the read side,
//! and a fresh write side is installed.
//!
//! Consequence: an event pushed during tick N is invisible to every reader
//! during tick N, visible to every reader throughout tick N+1, and gone from
//! tick N+2 on. All systems in a tick therefore observe the same, order-stable
//! snapshot regardless of where they sit in the stage.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// The double buffer. Each box holds a `Vec<E>` for one event type.
#[derive(Default)]
pub(crate) struct EventChannels {
    current: HashMap<TypeId, Box<dyn Any>>,
    next: HashMap<TypeId, Box<dyn Any>>,
}

impl EventChannels {
    pub(crate) fn push<E: 'static>(&mut self, event: E) {
        self.next
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<E>::new()))
            .downcast_mut::<Vec<E>>()
            .unwrap_or_else(|| {
                panic!(
                    "event buffer type mismatch for `{}`",
                    std::any::type_name::<E>()
                )
            })
            .push(event);
    }

    /// The previous tick's events of type `E`, in push order. Never mutates.
    pub(crate) fn read<E: 'static>(&self) -> &[E] {
        self.current
            .get(&TypeId::of::<E>())
            .and_then(|buf| buf.downcast_ref::<Vec<E>>())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rotates the buffers: last tick's events are dropped, this tick's
    /// become readable, and a fresh write side takes over.
    pub(crate) fn swap(&mut self) {
        self.current = std::mem::take(&mut self.next);
    }
}
