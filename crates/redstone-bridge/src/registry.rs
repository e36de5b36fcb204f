use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use redstone_events::{Event, EventKind};
use tracing::{debug, error, trace};

/// Handler for one event kind, typed by the event's arguments and outcome
pub type Handler<E> =
    Arc<dyn Fn(&<E as Event>::Args) -> <E as Event>::Outcome + Send + Sync + 'static>;

/// One handler slot per event kind.
///
/// Setting a handler replaces whatever was in the slot; there is no fan-out. Handlers
/// are stored type-erased and recovered through the event's marker type, so a slot can
/// only ever hold a handler with its own event's signature.
///
/// The slot map is a leaf lock: it is held only to read or write a slot, never while a
/// handler runs, so a handler may set or clear handlers itself.
#[derive(Default)]
pub struct HandlerRegistry {
    slots: Mutex<HashMap<EventKind, Box<dyn Any + Send + Sync>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the handler for `E`, replacing any previous one
    pub fn set<E, F>(&self, handler: F)
    where
        E: Event,
        F: Fn(&E::Args) -> E::Outcome + Send + Sync + 'static,
    {
        let handler: Handler<E> = Arc::new(handler);
        let replaced = self.slots().insert(E::KIND, Box::new(handler)).is_some();
        debug!(
            target: "bridge",
            "Handler for {} {}",
            E::KIND,
            if replaced { "replaced" } else { "registered" }
        );
    }

    /// Empty the slot for `E`; returns whether a handler was present
    pub fn clear<E: Event>(&self) -> bool {
        self.clear_kind(E::KIND)
    }

    pub fn clear_kind(&self, kind: EventKind) -> bool {
        self.slots().remove(&kind).is_some()
    }

    /// Empty every slot; returns how many handlers were removed
    pub fn clear_all(&self) -> usize {
        let removed = std::mem::take(&mut *self.slots());
        // Handlers (and whatever they captured) are dropped outside the lock
        removed.len()
    }

    /// Current handler for `E`, cloned out so the caller can invoke it unlocked
    pub fn get<E: Event>(&self) -> Option<Handler<E>> {
        let slots = self.slots();
        let slot = slots.get(&E::KIND)?;
        let handler = slot.downcast_ref::<Handler<E>>().cloned();
        if handler.is_none() {
            error!(
                target: "bridge",
                "Handler slot for {} holds a different event's handler, ignoring it",
                E::KIND
            );
        }
        handler
    }

    pub fn is_set(&self, kind: EventKind) -> bool {
        self.slots().contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kinds that currently have a handler, in discriminant order
    pub fn registered_kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<_> = self.slots().keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// Run the handler for `E`, or produce the default outcome if there is none.
    ///
    /// A panicking handler is logged and answered with the default outcome.
    pub fn dispatch<E: Event>(&self, args: &E::Args) -> E::Outcome {
        match self.get::<E>() {
            Some(handler) => invoke::<E>(&handler, args),
            None => {
                trace!(
                    target: "bridge",
                    "No handler for {}, using default outcome ({})",
                    E::KIND,
                    E::KIND.default_outcome()
                );
                E::default_outcome(args)
            }
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<EventKind, Box<dyn Any + Send + Sync>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("registered", &self.registered_kinds())
            .finish()
    }
}

/// Call `handler`, turning a panic into the event's default outcome
pub(crate) fn invoke<E: Event>(handler: &Handler<E>, args: &E::Args) -> E::Outcome {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler(args))) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(
                target: "bridge",
                "Handler for {} panicked, using default outcome: {:?}",
                E::KIND,
                e
            );
            E::default_outcome(args)
        }
    }
}
