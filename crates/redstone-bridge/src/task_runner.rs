use std::collections::VecDeque;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::error::BridgeError;

/// Opaque unit of work posted by the embedded engine
pub type TaskCallback = Box<dyn FnOnce() + Send + 'static>;

/// A posted task and the earliest time it may run
pub struct Task {
    callback: TaskCallback,
    not_before: Instant,
}

impl Task {
    pub fn new(callback: TaskCallback, not_before: Instant) -> Self {
        Self {
            callback,
            not_before,
        }
    }

    pub fn not_before(&self) -> Instant {
        self.not_before
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        self.not_before <= now
    }

    fn run(self) {
        (self.callback)()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("not_before", &self.not_before)
            .finish_non_exhaustive()
    }
}

/// Lifecycle of a [`TaskRunner`]
///
/// `Uninitialized -> Bound -> (Running <-> Draining) -> ShuttingDown -> Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerPhase {
    /// No thread bound yet; posted tasks are kept
    Uninitialized,
    /// Bound to a thread, nothing posted yet
    Bound,
    Running,
    /// A drain is executing tasks on the bound thread
    Draining,
    /// New tasks are dropped
    ShuttingDown,
    /// Pending tasks were discarded; nothing runs again
    Stopped,
}

/// What the embedded engine sees of a task runner.
///
/// This is the engine's custom task runner configuration surface: it asks whether the
/// caller is already on the runner's thread and hands over tasks to run later.
pub trait EngineTaskRunner: Send + Sync {
    fn runs_on_current_thread(&self) -> bool;

    fn post_task(&self, task: TaskCallback, not_before: Instant);
}

struct RunnerInner {
    phase: RunnerPhase,
    pending: VecDeque<Task>,
    dropped: u64,
}

/// Cooperative task runner bound to one externally driven thread.
///
/// The engine posts tasks from any thread; the host calls
/// [`drain_ready_tasks`](Self::drain_ready_tasks) once per frame or tick on the bound
/// thread. The internal mutex only covers queue bookkeeping: a drain swaps the whole
/// queue out and runs tasks with the mutex released, so posting never waits on task
/// execution.
pub struct TaskRunner {
    identifier: u64,
    bound_thread: OnceLock<ThreadId>,
    inner: Mutex<RunnerInner>,
    shutdown_drop_logged: AtomicBool,
    off_thread_drain_logged: AtomicBool,
}

impl TaskRunner {
    /// Create a runner; `identifier` distinguishes runners in engine config and logs
    pub fn new(identifier: u64) -> Self {
        Self {
            identifier,
            bound_thread: OnceLock::new(),
            inner: Mutex::new(RunnerInner {
                phase: RunnerPhase::Uninitialized,
                pending: VecDeque::new(),
                dropped: 0,
            }),
            shutdown_drop_logged: AtomicBool::new(false),
            off_thread_drain_logged: AtomicBool::new(false),
        }
    }

    pub fn identifier(&self) -> u64 {
        self.identifier
    }

    /// Bind the runner to the calling thread.
    ///
    /// Binding again from the same thread is a no-op; a runner never moves threads.
    pub fn bind_current_thread(&self) -> Result<(), BridgeError> {
        let me = thread::current().id();
        let bound = *self.bound_thread.get_or_init(|| me);
        if bound != me {
            return Err(BridgeError::TaskRunnerBound { bound, caller: me });
        }

        let mut inner = self.inner();
        match inner.phase {
            RunnerPhase::Uninitialized => {
                inner.phase = if inner.pending.is_empty() {
                    RunnerPhase::Bound
                } else {
                    RunnerPhase::Running
                };
                debug!(target: "tasks", "Task runner {} bound to {:?}", self.identifier, me);
                Ok(())
            }
            RunnerPhase::ShuttingDown | RunnerPhase::Stopped => Err(BridgeError::TaskRunnerStopped),
            _ => Ok(()),
        }
    }

    pub fn bound_thread(&self) -> Option<ThreadId> {
        self.bound_thread.get().copied()
    }

    /// True only on the single bound thread
    pub fn runs_on_current_thread(&self) -> bool {
        self.bound_thread() == Some(thread::current().id())
    }

    /// Queue a task; dropped silently once shutdown has begun
    pub fn post_task(&self, callback: TaskCallback, not_before: Instant) {
        let mut inner = self.inner();

        match inner.phase {
            RunnerPhase::ShuttingDown | RunnerPhase::Stopped => {
                inner.dropped += 1;
                drop(inner);
                if !self.shutdown_drop_logged.swap(true, Ordering::Relaxed) {
                    warn!(
                        target: "tasks",
                        "Task runner {} is shutting down, dropping newly posted tasks",
                        self.identifier
                    );
                }
                // The callback is dropped here, outside the lock
            }
            phase => {
                if phase == RunnerPhase::Bound {
                    inner.phase = RunnerPhase::Running;
                }
                inner.pending.push_back(Task::new(callback, not_before));
            }
        }
    }

    /// Run every task whose time has come; returns how many ran
    pub fn drain_ready_tasks(&self) -> usize {
        self.drain_ready_tasks_at(Instant::now())
    }

    /// Same as [`drain_ready_tasks`](Self::drain_ready_tasks) with an explicit "now"
    pub fn drain_ready_tasks_at(&self, now: Instant) -> usize {
        if !self.runs_on_current_thread() {
            if !self.off_thread_drain_logged.swap(true, Ordering::Relaxed) {
                warn!(
                    target: "tasks",
                    "Task runner {} drained from {:?}, which is not its bound thread; ignoring",
                    self.identifier,
                    thread::current().id()
                );
            }
            return 0;
        }

        let batch = {
            let mut inner = self.inner();
            match inner.phase {
                RunnerPhase::Bound | RunnerPhase::Running => {
                    inner.phase = RunnerPhase::Draining;
                    std::mem::take(&mut inner.pending)
                }
                // Draining means a task re-entered the drain; the outer call finishes the batch
                _ => return 0,
            }
        };

        let mut executed = 0;
        let mut deferred = VecDeque::new();

        for task in batch {
            if !task.is_ready(now) {
                deferred.push_back(task);
                continue;
            }

            if let Err(e) = catch_unwind(AssertUnwindSafe(|| task.run())) {
                error!(
                    target: "tasks",
                    "Task on runner {} panicked: {:?}",
                    self.identifier,
                    e
                );
            }
            executed += 1;
        }

        let discarded = {
            let mut inner = self.inner();
            match inner.phase {
                RunnerPhase::Draining => {
                    inner.phase = RunnerPhase::Running;
                    // Deferred tasks were posted before anything queued during this drain
                    deferred.append(&mut inner.pending);
                    inner.pending = deferred;
                    None
                }
                _ => {
                    inner.dropped += deferred.len() as u64;
                    Some(deferred)
                }
            }
        };
        drop(discarded);

        if executed > 0 {
            debug!(target: "tasks", "Task runner {} ran {} task(s)", self.identifier, executed);
        }

        executed
    }

    /// Stop accepting tasks; already queued tasks stay until [`stop`](Self::stop)
    pub fn begin_shutdown(&self) {
        let mut inner = self.inner();
        if inner.phase != RunnerPhase::Stopped {
            inner.phase = RunnerPhase::ShuttingDown;
        }
    }

    /// Discard every pending task and stop for good; returns how many were discarded
    pub fn stop(&self) -> usize {
        let (discarded, dropped_total) = {
            let mut inner = self.inner();
            if inner.phase == RunnerPhase::Stopped {
                return 0;
            }
            inner.phase = RunnerPhase::Stopped;
            let discarded = std::mem::take(&mut inner.pending);
            inner.dropped += discarded.len() as u64;
            (discarded, inner.dropped)
        };

        let count = discarded.len();
        drop(discarded);

        info!(
            target: "tasks",
            "Task runner {} stopped ({} pending discarded, {} dropped in total)",
            self.identifier,
            count,
            dropped_total
        );
        count
    }

    pub fn phase(&self) -> RunnerPhase {
        self.inner().phase
    }

    pub fn pending_count(&self) -> usize {
        self.inner().pending.len()
    }

    /// Tasks dropped because they arrived during shutdown or were discarded by `stop`
    pub fn dropped_count(&self) -> u64 {
        self.inner().dropped
    }

    // Tasks never run under this mutex, so a poisoned queue is still consistent.
    fn inner(&self) -> MutexGuard<'_, RunnerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRunner")
            .field("identifier", &self.identifier)
            .field("bound_thread", &self.bound_thread())
            .field("phase", &self.phase())
            .finish()
    }
}

impl EngineTaskRunner for TaskRunner {
    fn runs_on_current_thread(&self) -> bool {
        TaskRunner::runs_on_current_thread(self)
    }

    fn post_task(&self, task: TaskCallback, not_before: Instant) {
        TaskRunner::post_task(self, task, not_before)
    }
}

/// Task runner assignment for the engine's platform, UI and render roles
#[derive(Clone)]
pub struct CustomTaskRunners {
    pub platform: Arc<dyn EngineTaskRunner>,
    pub ui: Arc<dyn EngineTaskRunner>,
    pub render: Arc<dyn EngineTaskRunner>,
}

impl CustomTaskRunners {
    /// All three roles share one runner, so the engine never expects its roles to run
    /// concurrently and the host may call into it synchronously from the bound thread.
    pub fn merged(runner: Arc<TaskRunner>) -> Self {
        let runner: Arc<dyn EngineTaskRunner> = runner;
        Self {
            platform: Arc::clone(&runner),
            ui: Arc::clone(&runner),
            render: runner,
        }
    }

    pub fn is_merged(&self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.platform), Arc::as_ptr(&self.ui))
            && std::ptr::addr_eq(Arc::as_ptr(&self.ui), Arc::as_ptr(&self.render))
    }
}

impl fmt::Debug for CustomTaskRunners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTaskRunners")
            .field("merged", &self.is_merged())
            .finish_non_exhaustive()
    }
}
