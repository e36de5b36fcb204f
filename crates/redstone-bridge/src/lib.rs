//! Boundary-safety layer between a multithreaded host and an embedded runtime
//!
//! The embedded runtime (a scripting engine with its own event loop and UI engine) is
//! logically single-threaded, while the host raises events from its main thread and
//! from worker threads. This crate provides the pieces that make the two meet safely:
//!
//! - [`RuntimeAffinityLock`]: serializes host threads entering the runtime and lets the
//!   owning thread re-enter without deadlocking
//! - [`TaskRunner`]: collapses the engine's platform/UI/render schedulers onto one
//!   host-driven thread
//! - [`RequestQueue`] / [`Registrations`]: non-blocking registration requests from the
//!   runtime thread to the host's registry thread, with IDs handed back immediately
//! - [`HandlerRegistry`]: one handler per event kind
//! - [`RuntimeBridge`]: ties them together and applies each event's default outcome
pub mod affinity;
pub mod bridge;
pub mod error;
pub mod handles;
pub mod registry;
pub mod request_queue;
pub mod task_runner;

pub use affinity::{RuntimeAffinityLock, RuntimeGuard};
pub use bridge::{BridgeState, HostCallbacks, HostObject, RuntimeBridge};
pub use error::BridgeError;
pub use handles::HandleTable;
pub use registry::{Handler, HandlerRegistry};
pub use request_queue::{
    Registrable, RegistrationRequest, Registrations, RequestId, RequestQueue,
};
pub use task_runner::{
    CustomTaskRunners, EngineTaskRunner, RunnerPhase, Task, TaskCallback, TaskRunner,
};

// Re-export the event catalog so hosts only need this crate
pub use redstone_events as events;
