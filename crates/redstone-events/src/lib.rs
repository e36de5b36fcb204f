//! Event catalog for the redstone bridge
//!
//! This crate describes everything that crosses the host/runtime boundary as data:
//! which event kinds exist, what arguments each one carries, what a handler returns,
//! and what the host does when no handler is registered. It has no threading or
//! dispatch logic of its own so both sides of the boundary can depend on it.

/// Declare zero-sized event markers and bind each one to its [`EventKind`],
/// argument payload, outcome type and default outcome.
macro_rules! events {
    ($(
        $(#[$meta:meta])*
        $name:ident($args:ty) -> $outcome:ty = $default:expr;
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name;

            impl $crate::Event for $name {
                const KIND: $crate::EventKind = $crate::EventKind::$name;
                type Args = $args;
                type Outcome = $outcome;

                fn default_outcome(_args: &Self::Args) -> Self::Outcome {
                    $default
                }
            }
        )*
    };
}

pub mod block_events;
pub mod container_events;
pub mod entity_events;
pub mod item_events;
pub mod kind;
pub mod lifecycle_events;
pub mod outcome;
pub mod player_events;
pub mod registration;
pub mod screen_events;

pub use kind::{DefaultOutcome, EventCategory, EventKind};
pub use outcome::{ActionResult, CommandResult, InputResult, Permission, SlotClickResult};
pub use registration::{
    BlockDefinition, BlockEntityDefinition, EntityBaseType, EntityDefinition, Identifier,
    ItemDefinition, ObjectKind, Registration, SpawnGroup,
};

/// A single kind of occurrence that can cross from the host into the runtime.
///
/// Implementors are zero-sized markers; the associated types fix the shape of the
/// arguments and of the handler's answer, and [`Event::default_outcome`] is what
/// dispatch returns when no handler is registered (or the handler fails).
pub trait Event: 'static {
    /// Catalog entry for this event
    const KIND: EventKind;

    /// Arguments passed to the handler by reference
    type Args: 'static;

    /// Value produced by the handler (or the default)
    type Outcome: 'static;

    /// Outcome used when no handler is registered for this event
    fn default_outcome(args: &Self::Args) -> Self::Outcome;
}

/// Block position in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Which hand an interaction was performed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hand {
    #[default]
    MainHand,
    OffHand,
}
