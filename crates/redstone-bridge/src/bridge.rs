use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use redstone_events::lifecycle_events::{
    RegistryReady, ServerStarted, ServerStarting, ServerStopping, Tick, TickArgs,
};
use redstone_events::{Event, ObjectKind};
use tracing::{debug, info, trace};

use crate::affinity::{RuntimeAffinityLock, RuntimeGuard};
use crate::error::BridgeError;
use crate::handles::HandleTable;
use crate::registry::{self, HandlerRegistry};
use crate::request_queue::{Registrable, RegistrationRequest, Registrations, RequestId};
use crate::task_runner::{CustomTaskRunners, TaskRunner};

/// A host object the runtime holds a handle to
pub type HostObject = Arc<dyn Any + Send + Sync>;

type SendChatFn = Arc<dyn Fn(i64, &str) + Send + Sync>;
type SendPacketFn = Arc<dyn Fn(i32, i32, &[u8]) + Send + Sync>;

/// Calls the runtime can make back out into the host.
///
/// Unset callbacks make the corresponding bridge call a no-op.
#[derive(Clone, Default)]
pub struct HostCallbacks {
    /// `(player_id, message)`
    pub send_chat: Option<SendChatFn>,
    /// `(player_id, packet_type, data)`
    pub send_packet: Option<SendPacketFn>,
}

impl HostCallbacks {
    pub fn with_send_chat(mut self, f: impl Fn(i64, &str) + Send + Sync + 'static) -> Self {
        self.send_chat = Some(Arc::new(f));
        self
    }

    pub fn with_send_packet(mut self, f: impl Fn(i32, i32, &[u8]) + Send + Sync + 'static) -> Self {
        self.send_packet = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for HostCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCallbacks")
            .field("send_chat", &self.send_chat.is_some())
            .field("send_packet", &self.send_packet.is_some())
            .finish()
    }
}

/// Lifecycle of a [`RuntimeBridge`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum BridgeState {
    Uninitialized = 0,
    Initialized = 1,
    ShutDown = 2,
}

impl BridgeState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => BridgeState::Uninitialized,
            1 => BridgeState::Initialized,
            _ => BridgeState::ShutDown,
        }
    }
}

/// Boundary between the host and one embedded runtime instance.
///
/// Every inbound event goes through [`dispatch`](Self::dispatch): it enters the
/// runtime's affinity lock, looks up the handler for the event and falls back to the
/// event's default outcome when there is none. Outbound registration requests go
/// through per-kind request queues, and the optional task runner is what the runtime's
/// engine schedules its work on.
///
/// A bridge is created by the host's composition root, one per embedded runtime, and
/// shared behind an `Arc`. Once shut down it stays shut down.
pub struct RuntimeBridge {
    name: String,
    state: AtomicU8,
    lock: RuntimeAffinityLock,
    handlers: HandlerRegistry,
    registrations: Registrations,
    task_runner: Option<Arc<TaskRunner>>,
    handles: HandleTable<HostObject>,
    host_callbacks: RwLock<HostCallbacks>,
}

impl RuntimeBridge {
    /// A bridge for a runtime that schedules its own work
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    /// A bridge whose runtime runs on a merged task runner, bound on `initialize`
    pub fn with_task_runner(name: impl Into<String>, runner_identifier: u64) -> Self {
        Self::build(name.into(), Some(Arc::new(TaskRunner::new(runner_identifier))))
    }

    fn build(name: String, task_runner: Option<Arc<TaskRunner>>) -> Self {
        Self {
            name,
            state: AtomicU8::new(BridgeState::Uninitialized as u8),
            lock: RuntimeAffinityLock::new(),
            handlers: HandlerRegistry::new(),
            registrations: Registrations::new(),
            task_runner,
            handles: HandleTable::new(),
            host_callbacks: RwLock::new(HostCallbacks::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> BridgeState {
        BridgeState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_initialized(&self) -> bool {
        self.state() == BridgeState::Initialized
    }

    /// Mark the runtime as running so dispatch reaches its handlers.
    ///
    /// Binds the task runner (if any) to the calling thread, which must be the thread
    /// that later drains it.
    pub fn initialize(&self) -> Result<(), BridgeError> {
        match self.state() {
            BridgeState::Initialized => {
                return Err(BridgeError::AlreadyInitialized(self.name.clone()));
            }
            BridgeState::ShutDown => return Err(BridgeError::ShutDown(self.name.clone())),
            BridgeState::Uninitialized => {}
        }

        if let Some(runner) = &self.task_runner {
            runner.bind_current_thread()?;
        }

        self.state
            .compare_exchange(
                BridgeState::Uninitialized as u8,
                BridgeState::Initialized as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|current| match BridgeState::from_u8(current) {
                BridgeState::ShutDown => BridgeError::ShutDown(self.name.clone()),
                _ => BridgeError::AlreadyInitialized(self.name.clone()),
            })?;

        info!(target: "bridge", "Runtime bridge '{}' initialized", self.name);
        Ok(())
    }

    /// Tear the bridge down; later calls do nothing.
    ///
    /// Dispatch falls back to defaults as soon as the state flips, then every handler
    /// slot is cleared, the task runner stops taking and discards tasks, and all host
    /// object handles are released.
    pub fn shutdown(&self) {
        let previous = self.state.swap(BridgeState::ShutDown as u8, Ordering::AcqRel);
        if BridgeState::from_u8(previous) == BridgeState::ShutDown {
            debug!(target: "bridge", "Runtime bridge '{}' already shut down", self.name);
            return;
        }

        let cleared = {
            // Wait for any in-flight dispatch to leave the runtime
            let _guard = self.lock.enter();
            self.handlers.clear_all()
        };

        let discarded = match &self.task_runner {
            Some(runner) => {
                runner.begin_shutdown();
                runner.stop()
            }
            None => 0,
        };

        let released = self.handles.release_all();

        info!(
            target: "bridge",
            "Runtime bridge '{}' shut down ({} handlers cleared, {} tasks discarded, {} handles released)",
            self.name,
            cleared,
            discarded,
            released
        );
    }

    /// Enter the runtime directly, for host code that calls into it outside dispatch
    pub fn enter(&self) -> RuntimeGuard<'_> {
        self.lock.enter()
    }

    pub fn affinity_lock(&self) -> &RuntimeAffinityLock {
        &self.lock
    }

    // --- Handlers ---

    /// Install the runtime's handler for `E`, replacing any previous one
    pub fn set_handler<E, F>(&self, handler: F)
    where
        E: Event,
        F: Fn(&E::Args) -> E::Outcome + Send + Sync + 'static,
    {
        self.handlers.set::<E, F>(handler);
    }

    pub fn clear_handler<E: Event>(&self) -> bool {
        self.handlers.clear::<E>()
    }

    pub fn clear_handlers(&self) -> usize {
        self.handlers.clear_all()
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    // --- Dispatch ---

    /// Deliver `E` to the runtime and return its outcome.
    ///
    /// Before initialization and after shutdown this returns the default outcome
    /// without touching the runtime lock. Otherwise the handler runs inside the lock,
    /// serialized with every other dispatch on this bridge.
    pub fn dispatch<E: Event>(&self, args: &E::Args) -> E::Outcome {
        if !self.is_initialized() {
            trace!(
                target: "bridge",
                "'{}' not initialized, default outcome ({}) for {}",
                self.name,
                E::KIND.default_outcome(),
                E::KIND
            );
            return E::default_outcome(args);
        }

        let _guard = self.lock.enter();
        self.handlers.dispatch::<E>(args)
    }

    /// Deliver `E` with the handler running after the runtime lock is released.
    ///
    /// For handlers that may register further handlers or wait on work that itself
    /// dispatches from another thread.
    pub fn dispatch_unlocked<E: Event>(&self, args: &E::Args) -> E::Outcome {
        if !self.is_initialized() {
            return E::default_outcome(args);
        }

        let handler = {
            let _guard = self.lock.enter();
            self.handlers.get::<E>()
        };

        match handler {
            Some(handler) => registry::invoke::<E>(&handler, args),
            None => E::default_outcome(args),
        }
    }

    pub fn server_starting(&self) {
        self.dispatch::<ServerStarting>(&());
    }

    /// The runtime may register handlers from this notification, so it runs unlocked
    pub fn server_started(&self) {
        self.dispatch_unlocked::<ServerStarted>(&());
    }

    pub fn server_stopping(&self) {
        self.dispatch::<ServerStopping>(&());
    }

    pub fn registry_ready(&self) {
        self.dispatch::<RegistryReady>(&());
    }

    pub fn tick(&self, tick: u64) {
        self.dispatch::<Tick>(&TickArgs { tick });
    }

    // --- Registration ---

    /// Queue `payload` for the host's registry-open phase and return its ID now
    pub fn enqueue_registration<T: Registrable>(&self, payload: T) -> RequestId {
        self.registrations.enqueue(payload)
    }

    pub fn has_pending(&self, kind: ObjectKind) -> bool {
        self.registrations.has_pending(kind)
    }

    pub fn try_dequeue<T: Registrable>(&self) -> Option<RegistrationRequest<T>> {
        self.registrations.try_dequeue()
    }

    pub fn signal_registrations_queued(&self) {
        self.registrations.signal_registrations_queued();
    }

    pub fn registrations(&self) -> &Registrations {
        &self.registrations
    }

    // --- Tasks ---

    pub fn task_runner(&self) -> Option<&Arc<TaskRunner>> {
        self.task_runner.as_ref()
    }

    /// Engine task runner configuration with every role on this bridge's runner
    pub fn custom_task_runners(&self) -> Option<CustomTaskRunners> {
        self.task_runner
            .as_ref()
            .map(|runner| CustomTaskRunners::merged(Arc::clone(runner)))
    }

    /// Run ready engine tasks; zero when this bridge has no task runner
    pub fn drain_ready_tasks(&self) -> usize {
        self.task_runner
            .as_ref()
            .map_or(0, |runner| runner.drain_ready_tasks())
    }

    // --- Host objects and callbacks ---

    pub fn handles(&self) -> &HandleTable<HostObject> {
        &self.handles
    }

    pub fn set_host_callbacks(&self, callbacks: HostCallbacks) {
        *self
            .host_callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner) = callbacks;
    }

    pub fn send_chat_message(&self, player_id: i64, message: &str) {
        let send_chat = self.host_callbacks().send_chat;
        if let Some(send_chat) = send_chat {
            send_chat(player_id, message);
        }
    }

    pub fn send_packet_to_client(&self, player_id: i32, packet_type: i32, data: &[u8]) {
        let send_packet = self.host_callbacks().send_packet;
        if let Some(send_packet) = send_packet {
            send_packet(player_id, packet_type, data);
        }
    }

    fn host_callbacks(&self) -> HostCallbacks {
        self.host_callbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for RuntimeBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeBridge")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("handlers", &self.handlers.len())
            .field("task_runner", &self.task_runner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redstone_events::block_events::{BlockBreak, BlockBreakArgs};
    use redstone_events::{BlockPos, Permission};
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn must_not_run() {
        panic!("must not run");
    }

    fn break_args() -> BlockBreakArgs {
        BlockBreakArgs {
            pos: BlockPos::new(0, 70, 0),
            player_id: 1,
        }
    }

    #[test]
    fn test_initialize_twice_is_rejected() {
        let bridge = RuntimeBridge::new("server");
        assert_eq!(bridge.state(), BridgeState::Uninitialized);
        bridge.initialize().unwrap();
        assert!(matches!(bridge.initialize(), Err(BridgeError::AlreadyInitialized(_))));

        bridge.shutdown();
        assert!(matches!(bridge.initialize(), Err(BridgeError::ShutDown(_))));
    }

    #[test]
    fn test_dispatch_before_initialize_skips_the_lock() {
        let bridge = Arc::new(RuntimeBridge::new("server"));
        bridge.set_handler::<BlockBreak, _>(|_| Permission::Deny);

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let holder = {
            let bridge = Arc::clone(&bridge);
            std::thread::spawn(move || {
                let _guard = bridge.enter();
                entered_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
        };
        entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        // Would block if dispatch tried to enter the runtime
        assert_eq!(bridge.dispatch::<BlockBreak>(&break_args()), Permission::Allow);

        release_tx.send(()).unwrap();
        holder.join().unwrap();
    }

    #[test]
    fn test_handler_may_reenter_through_host() {
        let bridge = Arc::new(RuntimeBridge::new("server"));
        bridge.initialize().unwrap();

        let depth_seen = Arc::new(AtomicUsize::new(0));
        {
            let inner = Arc::clone(&bridge);
            let depth_seen = Arc::clone(&depth_seen);
            bridge.set_handler::<BlockBreak, _>(move |_| {
                // Runtime calls out to the host, which calls back in
                let _nested = inner.enter();
                depth_seen.store(inner.affinity_lock().depth() as usize, Ordering::SeqCst);
                Permission::Deny
            });
        }

        assert_eq!(bridge.dispatch::<BlockBreak>(&break_args()), Permission::Deny);
        assert_eq!(depth_seen.load(Ordering::SeqCst), 2);
        assert_eq!(bridge.affinity_lock().depth(), 0);
    }

    #[test]
    fn test_server_started_handler_runs_outside_lock() {
        let bridge = Arc::new(RuntimeBridge::new("server"));
        bridge.initialize().unwrap();

        let held_during_handler = Arc::new(Mutex::new(None));
        {
            let inner = Arc::clone(&bridge);
            let held = Arc::clone(&held_during_handler);
            bridge.set_handler::<ServerStarted, _>(move |_| {
                *held.lock().unwrap() = Some(inner.affinity_lock().owner().is_some());
                inner.set_handler::<BlockBreak, _>(|_| Permission::Deny);
            });
        }

        bridge.server_started();
        assert_eq!(*held_during_handler.lock().unwrap(), Some(false));
        assert_eq!(bridge.dispatch::<BlockBreak>(&break_args()), Permission::Deny);
    }

    #[test]
    fn test_shutdown_clears_everything() {
        let bridge = RuntimeBridge::with_task_runner("client", 1);
        bridge.initialize().unwrap();
        bridge.set_handler::<BlockBreak, _>(|_| Permission::Deny);
        bridge.handles().store(Arc::new(42u32));

        let runner = Arc::clone(bridge.task_runner().unwrap());
        runner.post_task(Box::new(must_not_run), Instant::now());

        bridge.shutdown();
        assert_eq!(bridge.state(), BridgeState::ShutDown);
        assert!(bridge.handlers().is_empty());
        assert!(bridge.handles().is_empty());
        assert_eq!(runner.pending_count(), 0);
        assert_eq!(runner.dropped_count(), 1);

        runner.post_task(Box::new(must_not_run), Instant::now());
        assert_eq!(bridge.drain_ready_tasks(), 0);

        bridge.shutdown();
        assert_eq!(bridge.dispatch::<BlockBreak>(&break_args()), Permission::Allow);
    }

    #[test]
    fn test_merged_runners_from_bridge() {
        let bridge = RuntimeBridge::with_task_runner("client", 3);
        bridge.initialize().unwrap();

        let runners = bridge.custom_task_runners().unwrap();
        assert!(runners.is_merged());
        assert!(runners.ui.runs_on_current_thread());
        assert!(RuntimeBridge::new("server").custom_task_runners().is_none());
    }

    #[test]
    fn test_host_callbacks() {
        let bridge = RuntimeBridge::new("server");

        // No callbacks installed: nothing happens
        bridge.send_chat_message(1, "ignored");
        bridge.send_packet_to_client(1, 2, &[1, 2, 3]);

        let sent = Arc::new(Mutex::new(Vec::new()));
        {
            let chat_log = Arc::clone(&sent);
            let packet_log = Arc::clone(&sent);
            bridge.set_host_callbacks(
                HostCallbacks::default()
                    .with_send_chat(move |player, message| {
                        chat_log.lock().unwrap().push(format!("chat {player}: {message}"));
                    })
                    .with_send_packet(move |player, kind, data| {
                        packet_log
                            .lock()
                            .unwrap()
                            .push(format!("packet {player}/{kind}: {} bytes", data.len()));
                    }),
            );
        }

        bridge.send_chat_message(5, "welcome");
        bridge.send_packet_to_client(5, 9, &[0; 4]);
        assert_eq!(
            *sent.lock().unwrap(),
            vec!["chat 5: welcome".to_string(), "packet 5/9: 4 bytes".to_string()]
        );
    }
}
