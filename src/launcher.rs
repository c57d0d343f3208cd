//! Background task launching.
//!
//! A launched task runs on its own thread and the launch call returns as soon
//! as the thread exists. The returned [`TaskHandle`] is optional to use:
//! dropping it detaches the task, keeping it allows `cancel` and `join`.
//!
//! Values a task needs from the launching scope are moved in as a
//! [`Snapshot`], which hands out shared references only.

use crate::error::{LambdaError, Result};
use crossbeam::channel::{bounded, Receiver, Sender};
use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

// =============================================================================
// Captured values
// =============================================================================

/// Read-only view of a value captured when a task was created.
///
/// There is no `DerefMut` and no `&mut` accessor, so a task cannot change
/// what it captured:
///
/// ```compile_fail
/// use lambdas::launcher::Snapshot;
///
/// let mut value = Snapshot::new(65);
/// *value += 1;
/// ```
pub struct Snapshot<T>(Arc<T>);

impl<T> Snapshot<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn get(&self) -> &T {
        &self.0
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Snapshot").field(&*self.0).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

// =============================================================================
// Cancellation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    Elapsed,
    Cancelled,
}

#[derive(Default)]
struct CancelState {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Shared cancellation flag with a sleep that wakes up early when set.
#[derive(Clone, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

fn lock_flag(mutex: &Mutex<bool>) -> MutexGuard<'_, bool> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        *lock_flag(&self.state.cancelled) = true;
        self.state.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *lock_flag(&self.state.cancelled)
    }

    /// Blocks for `duration` unless cancelled first.
    pub fn sleep(&self, duration: Duration) -> SleepOutcome {
        let guard = lock_flag(&self.state.cancelled);
        let (guard, _timeout) = self
            .state
            .wake
            .wait_timeout_while(guard, duration, |cancelled| !*cancelled)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *guard {
            SleepOutcome::Cancelled
        } else {
            SleepOutcome::Elapsed
        }
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// =============================================================================
// Task context and handle
// =============================================================================

/// What a running task knows about itself.
#[derive(Debug, Clone)]
pub struct TaskContext {
    name: String,
    token: CancelToken,
}

impl TaskContext {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn sleep(&self, duration: Duration) -> SleepOutcome {
        self.token.sleep(duration)
    }
}

#[derive(Debug)]
enum TaskOutcome {
    Completed,
    Panicked(String),
}

pub struct TaskHandle {
    name: String,
    token: CancelToken,
    done: Receiver<TaskOutcome>,
}

impl TaskHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requests cancellation; the task observes it at its next sleep or check.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        !self.done.is_empty()
    }

    /// Waits for the task to finish. A panic inside the task is reported here
    /// as [`LambdaError::TaskPanicked`].
    pub fn join(self) -> Result<()> {
        match self.done.recv() {
            Ok(TaskOutcome::Completed) => Ok(()),
            Ok(TaskOutcome::Panicked(message)) => {
                Err(LambdaError::task_panicked(self.name, message))
            }
            Err(_) => Err(LambdaError::task_panicked(
                self.name,
                "task was dropped before it reported completion",
            )),
        }
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("name", &self.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}

// =============================================================================
// Running a task body
// =============================================================================

pub type Job = Box<dyn FnOnce(&TaskContext) + Send + 'static>;

/// Everything needed to run one job, created before it is handed to a thread.
pub(crate) struct PreparedTask {
    context: TaskContext,
    job: Job,
    done: Sender<TaskOutcome>,
}

pub(crate) fn prepare(name: String, job: Job) -> (PreparedTask, TaskHandle) {
    let token = CancelToken::new();
    let (done_tx, done_rx) = bounded(1);
    let handle = TaskHandle {
        name: name.clone(),
        token: token.clone(),
        done: done_rx,
    };
    let task = PreparedTask {
        context: TaskContext { name, token },
        job,
        done: done_tx,
    };
    (task, handle)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl PreparedTask {
    pub(crate) fn name(&self) -> &str {
        &self.context.name
    }

    /// Runs the job on the current thread. Panics stay on this thread.
    pub(crate) fn run(self) {
        let PreparedTask { context, job, done } = self;
        let span = tracing::info_span!("task", name = %context.name);
        let _enter = span.enter();

        let outcome = if context.is_cancelled() {
            tracing::debug!("cancelled before start, skipping body");
            TaskOutcome::Completed
        } else {
            match panic::catch_unwind(AssertUnwindSafe(|| job(&context))) {
                Ok(()) => TaskOutcome::Completed,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(%message, "task panicked");
                    TaskOutcome::Panicked(message)
                }
            }
        };

        // Nobody listening means the handle was dropped; that is fine.
        let _ = done.send(outcome);
    }
}

// =============================================================================
// Spawning
// =============================================================================

/// Something that accepts tasks and starts them without waiting for them.
pub trait Spawn {
    fn spawn_job(&self, name: String, job: Job) -> Result<TaskHandle>;

    fn launch<F>(&self, name: impl Into<String>, body: F) -> Result<TaskHandle>
    where
        F: FnOnce(&TaskContext) + Send + 'static,
        Self: Sized,
    {
        self.spawn_job(name.into(), Box::new(body))
    }

    /// Like [`Spawn::launch`], but an `Err` from the body is logged and
    /// dropped on the task thread.
    fn launch_fallible<F, E>(&self, name: impl Into<String>, body: F) -> Result<TaskHandle>
    where
        F: FnOnce(&TaskContext) -> std::result::Result<(), E> + Send + 'static,
        E: fmt::Display,
        Self: Sized,
    {
        self.launch(name, move |ctx: &TaskContext| {
            if let Err(err) = body(ctx) {
                tracing::warn!(task = ctx.name(), error = %err, "task failed");
            }
        })
    }

    /// Starts a zero-argument callback and discards its handle.
    fn fire_and_forget<F>(&self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
        Self: Sized,
    {
        self.launch(name, move |_: &TaskContext| body()).map(drop)
    }
}

/// Starts one OS thread per task.
#[derive(Debug, Clone, Default)]
pub struct ThreadLauncher {
    stack_size: Option<usize>,
}

impl ThreadLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

impl Spawn for ThreadLauncher {
    fn spawn_job(&self, name: String, job: Job) -> Result<TaskHandle> {
        let (task, handle) = prepare(name.clone(), job);

        let mut builder = thread::Builder::new().name(name.clone());
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }

        // The JoinHandle is dropped right away; completion is reported through
        // the task handle instead.
        builder
            .spawn(move || task.run())
            .map_err(|source| LambdaError::Spawn { name, source })?;

        tracing::debug!(task = handle.name(), "launched");
        Ok(handle)
    }
}
