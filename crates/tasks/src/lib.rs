//! A small task-spawning abstraction so the execution gate doesn't reach for the `tokio` runtime
//! handle directly: every background task it starts (the stats ticker, debug-replay workers) goes
//! through a [`TaskExecutor`], so a panic in one is observable rather than silently swallowed by
//! Tokio's default panic-in-task behavior.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use futures_util::FutureExt;
use std::{fmt, future::Future, pin::Pin};
use tokio::{
    runtime::Handle,
    sync::mpsc,
    task::JoinHandle,
};
use tracing::Instrument;

/// A name identifying a spawned task, used only for panic/shutdown logging.
pub type TaskName = &'static str;

/// Why a [`TaskManager`] is shutting down.
#[derive(Debug, Clone)]
pub enum PanicCause {
    /// A task spawned with [`TaskExecutor::spawn_critical`] panicked.
    CriticalTaskPanicked(TaskName),
}

impl fmt::Display for PanicCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CriticalTaskPanicked(name) => write!(f, "critical task '{name}' panicked"),
        }
    }
}

/// Spawns tasks onto a [`Handle`], tracking critical-task panics so a caller can shut the whole
/// engine down instead of continuing with a half-dead task set.
#[derive(Debug, Clone)]
pub struct TaskExecutor {
    handle: Handle,
    panicked_tasks_tx: mpsc::UnboundedSender<PanicCause>,
}

impl TaskExecutor {
    /// The underlying Tokio runtime handle this executor spawns onto.
    pub const fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Spawns a future, logging (but not propagating) a panic.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut)
    }

    /// Spawns a future whose panic is treated as fatal: [`TaskManager::wait_for_panic`] resolves
    /// with the cause and the caller is expected to shut the system down.
    pub fn spawn_critical<F>(&self, name: TaskName, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let panicked_tasks_tx = self.panicked_tasks_tx.clone();
        let fut = async move {
            let result = std::panic::AssertUnwindSafe(fut).catch_unwind().await;
            if result.is_err() {
                let _ = panicked_tasks_tx.send(PanicCause::CriticalTaskPanicked(name));
            }
        }
        .instrument(tracing::trace_span!("critical_task", %name));
        self.handle.spawn(fut)
    }
}

/// Owns the receiving end of the critical-task panic channel. Dropping it does not stop already
/// running tasks; it only stops observing their panics.
pub struct TaskManager {
    panicked_tasks_rx: mpsc::UnboundedReceiver<PanicCause>,
    executor: TaskExecutor,
}

impl TaskManager {
    /// Creates a manager/executor pair bound to `handle`.
    pub fn new(handle: Handle) -> Self {
        let (panicked_tasks_tx, panicked_tasks_rx) = mpsc::unbounded_channel();
        Self { panicked_tasks_rx, executor: TaskExecutor { handle, panicked_tasks_tx } }
    }

    /// An executor that reports panics back to this manager.
    pub fn executor(&self) -> TaskExecutor {
        self.executor.clone()
    }

    /// Resolves once a critical task has panicked, yielding the cause.
    pub async fn wait_for_panic(&mut self) -> PanicCause {
        self.panicked_tasks_rx
            .recv()
            .await
            .expect("executor is held by self, channel cannot close")
    }
}

/// A boxed, type-erased future, used where a trait object is more convenient than a generic.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
