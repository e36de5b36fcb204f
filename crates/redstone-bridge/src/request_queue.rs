use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use redstone_events::{
    BlockDefinition, BlockEntityDefinition, EntityDefinition, ItemDefinition, ObjectKind,
    Registration,
};
use tracing::{debug, info};

/// Handler ID handed back to the runtime when it queues a registration.
///
/// Unique per object kind and usable immediately, before the host has registered the
/// object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RequestId> for u64 {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// A queued registration and the ID it was given
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRequest<T> {
    pub id: RequestId,
    pub payload: T,
}

/// FIFO of registration requests from the runtime thread to the host's registry thread
pub struct RequestQueue<T> {
    pending: Mutex<VecDeque<RegistrationRequest<T>>>,
    next_id: AtomicU64,
}

impl<T> RequestQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Queue `payload` and return its ID without waiting on the host.
    ///
    /// Must not be called while holding the host's registry lock.
    pub fn enqueue(&self, payload: T) -> RequestId {
        let mut pending = self.pending();
        // Allocated under the queue mutex so queue order matches ID order
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        pending.push_back(RegistrationRequest { id, payload });
        id
    }

    /// Pop the oldest request; `None` just means nothing is waiting
    pub fn try_dequeue(&self) -> Option<RegistrationRequest<T>> {
        self.pending().pop_front()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending().is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending().len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_pending()
    }

    /// Take every queued request at once, in FIFO order
    pub fn drain(&self) -> Vec<RegistrationRequest<T>> {
        self.pending().drain(..).collect()
    }

    /// Discard queued requests; IDs already handed out are not reused
    pub fn clear(&self) -> usize {
        let discarded = std::mem::take(&mut *self.pending());
        discarded.len()
    }

    /// The ID the next `enqueue` will return
    pub fn peek_next_id(&self) -> RequestId {
        RequestId(self.next_id.load(Ordering::Relaxed))
    }

    fn pending(&self) -> MutexGuard<'_, VecDeque<RegistrationRequest<T>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for RequestQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RequestQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestQueue")
            .field("pending", &self.len())
            .field("next_id", &self.peek_next_id())
            .finish()
    }
}

/// A registration payload with a home queue in [`Registrations`]
pub trait Registrable: Registration + Sized {
    fn queue(registrations: &Registrations) -> &RequestQueue<Self>;
}

impl Registrable for BlockDefinition {
    fn queue(registrations: &Registrations) -> &RequestQueue<Self> {
        &registrations.blocks
    }
}

impl Registrable for ItemDefinition {
    fn queue(registrations: &Registrations) -> &RequestQueue<Self> {
        &registrations.items
    }
}

impl Registrable for EntityDefinition {
    fn queue(registrations: &Registrations) -> &RequestQueue<Self> {
        &registrations.entities
    }
}

impl Registrable for BlockEntityDefinition {
    fn queue(registrations: &Registrations) -> &RequestQueue<Self> {
        &registrations.block_entities
    }
}

/// One request queue per registrable object kind, plus the two signals that bracket
/// the host's registry-open phase.
///
/// The runtime raises the "queued" signal once it has queued everything; the host sets
/// "flushed" after it has drained every queue into its registries.
#[derive(Debug, Default)]
pub struct Registrations {
    pub blocks: RequestQueue<BlockDefinition>,
    pub items: RequestQueue<ItemDefinition>,
    pub entities: RequestQueue<EntityDefinition>,
    pub block_entities: RequestQueue<BlockEntityDefinition>,
    queued: Mutex<bool>,
    queued_signal: Condvar,
    flushed: AtomicBool,
}

impl Registrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue<T: Registrable>(&self, payload: T) -> RequestId {
        let identifier = payload.identifier();
        let id = T::queue(self).enqueue(payload);
        debug!(
            target: "registration",
            "Queued {} registration {} with ID {}",
            T::KIND,
            identifier,
            id
        );
        id
    }

    pub fn try_dequeue<T: Registrable>(&self) -> Option<RegistrationRequest<T>> {
        T::queue(self).try_dequeue()
    }

    /// Whether any request of `kind` is waiting for the host
    pub fn has_pending(&self, kind: ObjectKind) -> bool {
        self.pending_count(kind) > 0
    }

    pub fn pending_count(&self, kind: ObjectKind) -> usize {
        match kind {
            ObjectKind::Block => self.blocks.len(),
            ObjectKind::Item => self.items.len(),
            ObjectKind::Entity => self.entities.len(),
            ObjectKind::BlockEntity => self.block_entities.len(),
        }
    }

    pub fn total_pending(&self) -> usize {
        self.blocks.len() + self.items.len() + self.entities.len() + self.block_entities.len()
    }

    /// Called by the runtime once every registration has been queued
    pub fn signal_registrations_queued(&self) {
        let mut queued = self.queued_flag();
        if !*queued {
            *queued = true;
            info!(
                target: "registration",
                "Runtime finished queueing registrations ({} pending)",
                self.total_pending()
            );
        }
        drop(queued);
        self.queued_signal.notify_all();
    }

    pub fn registrations_queued(&self) -> bool {
        *self.queued_flag()
    }

    /// Block until the runtime signals, or `timeout` passes; true if it signalled
    pub fn wait_registrations_queued(&self, timeout: Duration) -> bool {
        let queued = self.queued_flag();
        let (queued, _) = self
            .queued_signal
            .wait_timeout_while(queued, timeout, |queued| !*queued)
            .unwrap_or_else(PoisonError::into_inner);
        *queued
    }

    /// Set by the host once it has drained every queue
    pub fn mark_flushed(&self) {
        self.flushed.store(true, Ordering::Release);
    }

    /// True once the host has fully registered everything it dequeued
    pub fn registrations_flushed(&self) -> bool {
        self.flushed.load(Ordering::Acquire)
    }

    /// Drop everything queued; returns how many requests were discarded
    pub fn clear(&self) -> usize {
        self.blocks.clear()
            + self.items.clear()
            + self.entities.clear()
            + self.block_entities.clear()
    }

    fn queued_flag(&self) -> MutexGuard<'_, bool> {
        self.queued.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
