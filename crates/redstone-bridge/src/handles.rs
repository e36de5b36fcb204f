use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Opaque handles for host objects the runtime keeps references to.
///
/// The runtime only ever sees the `u64`; the host resolves it back to the object.
/// Handles are never reused, and zero is never issued so the runtime can use it as
/// "no object".
#[derive(Debug)]
pub struct HandleTable<T> {
    objects: Mutex<HashMap<u64, T>>,
    next_handle: AtomicU64,
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn store(&self, object: T) -> u64 {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.objects().insert(handle, object);
        handle
    }

    pub fn contains(&self, handle: u64) -> bool {
        self.objects().contains_key(&handle)
    }

    /// Remove and return the object; unknown handles are ignored
    pub fn release(&self, handle: u64) -> Option<T> {
        self.objects().remove(&handle)
    }

    pub fn release_all(&self) -> usize {
        let released = std::mem::take(&mut *self.objects());
        released.len()
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<u64, T>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> HandleTable<T> {
    pub fn get(&self, handle: u64) -> Option<T> {
        self.objects().get(&handle).cloned()
    }
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
