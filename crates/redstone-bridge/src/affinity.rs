use std::marker::PhantomData;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

/// Ownership record for the runtime.
///
/// `depth > 0` exactly when `owning_thread` is set.
#[derive(Debug, Default)]
struct LockState {
    owning_thread: Option<ThreadId>,
    depth: u32,
}

/// Reentrant, thread-owning lock guarding entry into the embedded runtime.
///
/// The first entry on a thread claims ownership of the runtime and blocks while any
/// other thread owns it. Further entries on the owning thread (a runtime call that loops
/// back out through a host callback and in again) only bump the depth counter. The
/// internal mutex is held just long enough to read or update the ownership record,
/// never while the caller runs inside the runtime.
///
/// Guards must be released on the thread that acquired them, so [`RuntimeGuard`] is
/// neither `Send` nor `Sync`.
#[derive(Debug, Default)]
pub struct RuntimeAffinityLock {
    state: Mutex<LockState>,
    released: Condvar,
}

/// Scoped entry into the runtime, released on drop (including unwinding).
///
/// Nested guards on one thread may be dropped in any order; the runtime stays owned
/// until every one of them is gone.
#[must_use = "the runtime is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct RuntimeGuard<'a> {
    lock: &'a RuntimeAffinityLock,
    owning: bool,
    _not_send: PhantomData<*const ()>,
}

impl RuntimeAffinityLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the runtime, blocking while another thread owns it
    pub fn enter(&self) -> RuntimeGuard<'_> {
        let me = thread::current().id();
        let mut state = self.state();

        if state.owning_thread == Some(me) && state.depth > 0 {
            state.depth += 1;
            return self.guard(false);
        }

        while state.owning_thread.is_some() {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.owning_thread = Some(me);
        state.depth = 1;
        self.guard(true)
    }

    /// Enter the runtime only if that does not require waiting for another thread
    pub fn try_enter(&self) -> Option<RuntimeGuard<'_>> {
        let me = thread::current().id();
        let mut state = self.state();

        match state.owning_thread {
            Some(owner) if owner == me => {
                state.depth += 1;
                Some(self.guard(false))
            }
            Some(_) => None,
            None => {
                state.owning_thread = Some(me);
                state.depth = 1;
                Some(self.guard(true))
            }
        }
    }

    /// Explicit counterpart to [`enter`](Self::enter); equivalent to dropping the guard
    pub fn exit(guard: RuntimeGuard<'_>) {
        drop(guard);
    }

    /// Current nesting depth, zero when nobody is inside the runtime
    pub fn depth(&self) -> u32 {
        self.state().depth
    }

    pub fn owner(&self) -> Option<ThreadId> {
        self.state().owning_thread
    }

    pub fn is_held_by_current_thread(&self) -> bool {
        self.owner() == Some(thread::current().id())
    }

    fn guard(&self, owning: bool) -> RuntimeGuard<'_> {
        RuntimeGuard {
            lock: self,
            owning,
            _not_send: PhantomData,
        }
    }

    // No user code runs while this mutex is held, so a poisoned state is still consistent.
    fn state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Guards drop in any order; the last one on the owning thread releases the runtime.
    fn release(&self) {
        let me = thread::current().id();
        let mut state = self.state();

        if state.owning_thread != Some(me) || state.depth == 0 {
            return;
        }

        state.depth -= 1;
        if state.depth == 0 {
            state.owning_thread = None;
            drop(state);
            self.released.notify_one();
        }
    }
}

impl RuntimeGuard<'_> {
    /// True for the outermost guard on this thread, the one that claimed ownership
    pub fn is_owning(&self) -> bool {
        self.owning
    }
}

impl Drop for RuntimeGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
