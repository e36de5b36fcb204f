use std::thread::ThreadId;

/// Lifecycle misuse of a bridge or one of its components.
///
/// Dispatch, queue and lock operations never produce these; they are infallible.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Bridge '{0}' is already initialized")]
    AlreadyInitialized(String),

    #[error("Bridge '{0}' has been shut down")]
    ShutDown(String),

    #[error("Task runner is bound to thread {bound:?}, cannot bind {caller:?}")]
    TaskRunnerBound { bound: ThreadId, caller: ThreadId },

    #[error("Task runner has been stopped")]
    TaskRunnerStopped,

    #[error("Registries must be opened on the host thread {expected:?}, not {caller:?}")]
    RegistryThread { expected: ThreadId, caller: ThreadId },

    #[error("Registries have already been opened")]
    RegistriesAlreadyOpen,
}
