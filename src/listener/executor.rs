use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError, oneshot};
use tokio::task::JoinSet;
use tracing::{error, warn};

use crate::errors::ExecutorError;

/// Completion signal for a submitted task.
///
/// Resolves when the task finishes, is aborted, or is discarded during
/// shutdown without having run.
pub struct TaskCompletion(oneshot::Receiver<()>);

impl TaskCompletion {
    pub async fn wait(self) {
        let _ = self.0.await;
    }
}

/// Bounded execution context owned by a single listener container.
///
/// At most `max_concurrency` submitted tasks run at once. Tasks beyond that
/// wait for a permit. With a backlog limit, no more than
/// `max_concurrency + max_queued_tasks` tasks are outstanding: `submit`
/// waits for a slot and `try_submit` rejects.
pub struct BoundedExecutor {
    max_concurrency: usize,
    permits: Arc<Semaphore>,
    backlog: Option<Arc<Semaphore>>,
    tasks: Mutex<JoinSet<()>>,
    closed: AtomicBool,
}

impl BoundedExecutor {
    pub fn new(max_concurrency: usize, max_queued_tasks: Option<usize>) -> Self {
        let max_concurrency = max_concurrency.max(1);
        BoundedExecutor {
            max_concurrency,
            permits: Arc::new(Semaphore::new(max_concurrency)),
            backlog: max_queued_tasks
                .map(|queued| Arc::new(Semaphore::new(max_concurrency + queued))),
            tasks: Mutex::new(JoinSet::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Number of tasks currently holding a concurrency permit.
    pub fn active_count(&self) -> usize {
        self.max_concurrency - self.permits.available_permits()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Schedules `task`, waiting for a backlog slot when the backlog is full.
    ///
    /// Fails only once the executor is shutting down.
    pub async fn submit<F>(&self, task: F) -> Result<TaskCompletion, ExecutorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_closed() {
            return Err(ExecutorError::Closed);
        }

        let slot = match &self.backlog {
            Some(backlog) => Some(
                backlog
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| ExecutorError::Closed)?,
            ),
            None => None,
        };

        self.spawn(slot, task)
    }

    /// Schedules `task` without waiting, rejecting it when the backlog is full.
    pub fn try_submit<F>(&self, task: F) -> Result<TaskCompletion, ExecutorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_closed() {
            return Err(ExecutorError::Closed);
        }

        let slot = match &self.backlog {
            Some(backlog) => Some(backlog.clone().try_acquire_owned().map_err(|e| match e {
                TryAcquireError::Closed => ExecutorError::Closed,
                TryAcquireError::NoPermits => ExecutorError::Rejected,
            })?),
            None => None,
        };

        self.spawn(slot, task)
    }

    fn spawn<F>(
        &self,
        slot: Option<OwnedSemaphorePermit>,
        task: F,
    ) -> Result<TaskCompletion, ExecutorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = self.permits.clone();
        let (done_tx, done_rx) = oneshot::channel();

        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        if self.is_closed() {
            return Err(ExecutorError::Closed);
        }
        reap_finished(&mut tasks);
        tasks.spawn(async move {
            // The semaphore is closed on shutdown; queued tasks are then dropped unrun.
            let Ok(permit) = permits.acquire_owned().await else {
                return;
            };
            task.await;
            drop(permit);
            drop(slot);
            let _ = done_tx.send(());
        });

        Ok(TaskCompletion(done_rx))
    }

    /// Stops accepting work and waits up to `grace_period` for running tasks
    /// to finish before aborting them. Tasks that never got a permit are
    /// discarded. Calling this more than once is harmless.
    ///
    /// Returns `true` if every task finished within the grace period.
    pub async fn shutdown(&self, grace_period: Duration) -> bool {
        self.closed.store(true, Ordering::Release);
        self.permits.close();
        if let Some(backlog) = &self.backlog {
            backlog.close();
        }

        let mut tasks = {
            let mut guard = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *guard)
        };

        let drained = tokio::time::timeout(grace_period, async {
            while let Some(result) = tasks.join_next().await {
                log_join_error(result);
            }
        })
        .await;

        match drained {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    remaining = tasks.len(),
                    ?grace_period,
                    "Tasks still running after shutdown grace period, aborting them"
                );
                tasks.shutdown().await;
                false
            }
        }
    }
}

fn reap_finished(tasks: &mut JoinSet<()>) {
    while let Some(result) = tasks.try_join_next() {
        log_join_error(result);
    }
}

fn log_join_error(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!("Executor task panicked: {e}");
        }
    }
}
