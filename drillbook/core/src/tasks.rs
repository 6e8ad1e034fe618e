//! Delay Task Handles
//!
//! Wraps a randomized delay as an independently scheduled unit of work.
//! Scheduling returns a [`DelayTask`] immediately; the caller decides when
//! (and whether) to await it.
//!
//! Tasks are spawned onto the Tokio runtime that is current at the call
//! site. On a current-thread runtime every task shares one thread and only
//! makes progress at suspension points.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use crate::delay::wait_random;

/// Task identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Generate a new process-unique task ID
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "delay_task_{}", self.0)
    }
}

/// Why a delay task produced no value
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// The task was aborted before it finished
    #[error("{id} was cancelled")]
    Cancelled {
        /// The task that was cancelled
        id: TaskId,
    },

    /// The task panicked
    #[error("{id} panicked")]
    Panicked {
        /// The task that panicked
        id: TaskId,
    },
}

impl TaskError {
    fn from_join(id: TaskId, err: &JoinError) -> Self {
        if err.is_cancelled() {
            Self::Cancelled { id }
        } else {
            Self::Panicked { id }
        }
    }
}

/// Handle to one in-flight randomized delay
///
/// Awaiting the handle yields the delay the task waited. Dropping the handle
/// does not stop the task; use [`DelayTask::abort`] for that.
#[derive(Debug)]
#[must_use = "a DelayTask does nothing useful unless awaited or aborted"]
pub struct DelayTask {
    id: TaskId,
    handle: JoinHandle<f64>,
}

impl DelayTask {
    /// Identifier of this task
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Whether the underlying task has finished (successfully or not)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Request cancellation at the task's next suspension point
    pub fn abort(&self) {
        debug!(task = %self.id, "Aborting delay task");
        self.handle.abort();
    }
}

impl Future for DelayTask {
    type Output = Result<f64, TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|res| res.map_err(|e| TaskError::from_join(id, &e)))
    }
}

/// Schedule [`wait_random`] as its own task and return without suspending.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime, like [`tokio::spawn`].
pub fn task_wait_random(max_delay: f64) -> DelayTask {
    let id = TaskId::generate();
    debug!(task = %id, max_delay, "Scheduling delay task");
    let handle = tokio::spawn(wait_random(max_delay));
    DelayTask { id, handle }
}
