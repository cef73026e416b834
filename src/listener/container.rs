use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::config::ListenerConfig;
use super::executor::BoundedExecutor;
use super::handler::MessageHandler;
use super::poll::PollLoop;
use super::worker::DispatchWorker;
use crate::client::QueueClient;
use crate::errors::SqsListenerError;
use crate::message::QueueAddress;

enum ContainerState {
    Created,
    Running(RunningContainer),
    Stopped,
}

struct RunningContainer {
    queue_address: Arc<QueueAddress>,
    shutdown_tx: watch::Sender<bool>,
    poll_task: JoinHandle<()>,
    executor: Arc<BoundedExecutor>,
}

/// Polls one queue and dispatches its messages to a handler.
///
/// A container is created once per listener, started once and stopped once.
/// It owns its bounded executor for its whole running lifetime; nothing is
/// shared with other containers except the queue client.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use sqs_listener::{DeletionPolicy, HandlerFn, ListenerConfig, ListenerContainer, Message, SqsQueueClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Arc::new(SqsQueueClient::from_env().await);
///     let config = ListenerConfig::new("orders")
///         .with_max_concurrency(4)
///         .with_deletion_policy(DeletionPolicy::OnSuccess);
///     let handler = HandlerFn::new(|message: Message| async move {
///         println!("Processing message: {}", message.body);
///         Ok(())
///     });
///
///     let container = ListenerContainer::new("orders-listener", config, client, Arc::new(handler));
///     container.start().await?;
///     tokio::signal::ctrl_c().await?;
///     container.stop().await;
///     Ok(())
/// }
/// ```
pub struct ListenerContainer {
    name: Arc<str>,
    config: ListenerConfig,
    client: Arc<dyn QueueClient>,
    handler: Arc<dyn MessageHandler>,
    state: Mutex<ContainerState>,
    running: AtomicBool,
}

impl ListenerContainer {
    pub fn new(
        name: impl Into<String>,
        config: ListenerConfig,
        client: Arc<dyn QueueClient>,
        handler: Arc<dyn MessageHandler>,
    ) -> Self {
        let name: String = name.into();
        ListenerContainer {
            name: Arc::from(name),
            config,
            client,
            handler,
            state: Mutex::new(ContainerState::Created),
            running: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// The resolved queue address, once the container is running.
    pub async fn queue_address(&self) -> Option<QueueAddress> {
        match &*self.state.lock().await {
            ContainerState::Running(running) => Some(running.queue_address.as_ref().clone()),
            _ => None,
        }
    }

    /// Resolves the queue address and schedules the poll loop.
    ///
    /// Returns as soon as the loop is scheduled. Failing to resolve the queue
    /// address within `resolve_timeout` is fatal for this container and
    /// leaves it unstarted.
    pub async fn start(&self) -> Result<(), SqsListenerError> {
        let mut state = self.state.lock().await;
        match *state {
            ContainerState::Created => {}
            ContainerState::Running(_) => {
                return Err(SqsListenerError::AlreadyStarted(self.name.to_string()));
            }
            ContainerState::Stopped => {
                return Err(SqsListenerError::Stopped(self.name.to_string()));
            }
        }

        self.config.validate()?;
        let queue_address = Arc::new(self.resolve_queue_address().await?);

        let executor = Arc::new(BoundedExecutor::new(
            self.config.max_concurrency,
            self.config.max_queued_tasks,
        ));
        let worker = DispatchWorker::new(
            self.name.clone(),
            self.client.clone(),
            self.handler.clone(),
            self.config.deletion_policy,
            queue_address.clone(),
        );
        let poll_loop = PollLoop {
            listener_name: self.name.clone(),
            client: self.client.clone(),
            queue_address: queue_address.clone(),
            request: self.config.receive_request(),
            executor: executor.clone(),
            worker,
            receive_error_backoff: self.config.receive_error_backoff,
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poll_task = tokio::spawn(poll_loop.run(shutdown_rx));

        info!(
            listener = %self.name,
            queue = %queue_address,
            max_concurrency = self.config.max_concurrency,
            deletion_policy = %self.config.deletion_policy,
            "Listener started"
        );

        *state = ContainerState::Running(RunningContainer {
            queue_address,
            shutdown_tx,
            poll_task,
            executor,
        });
        self.running.store(true, Ordering::Release);
        Ok(())
    }

    async fn resolve_queue_address(&self) -> Result<QueueAddress, SqsListenerError> {
        let queue_name = &self.config.queue_name;
        let timeout = self.config.resolve_timeout;

        match tokio::time::timeout(timeout, self.client.resolve_queue_address(queue_name)).await {
            Ok(Ok(address)) => Ok(address),
            Ok(Err(source)) => Err(SqsListenerError::ResolveFailed {
                queue_name: queue_name.clone(),
                source,
            }),
            Err(_) => Err(SqsListenerError::ResolveTimeout {
                queue_name: queue_name.clone(),
                timeout,
            }),
        }
    }

    /// Stops polling and drains in-flight dispatches.
    ///
    /// Cancels the current receive, then gives running dispatches up to
    /// `shutdown_grace_period` to finish before aborting them. Once this
    /// returns the container issues no further receive or delete calls.
    /// Calling `stop` again is a no-op. Stopping a container that never
    /// started only keeps it from being started later.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        let previous = std::mem::replace(&mut *state, ContainerState::Stopped);
        self.running.store(false, Ordering::Release);

        let ContainerState::Running(running) = previous else {
            debug!(listener = %self.name, "Listener is not running, nothing to stop");
            return;
        };

        info!(listener = %self.name, "Stopping listener");
        let _ = running.shutdown_tx.send(true);

        if let Err(e) = running.poll_task.await {
            if e.is_panic() {
                error!(listener = %self.name, "Poll loop panicked: {e}");
            }
        }

        let drained = running
            .executor
            .shutdown(self.config.shutdown_grace_period)
            .await;

        info!(listener = %self.name, drained, "Listener stopped");
    }
}

impl Drop for ListenerContainer {
    fn drop(&mut self) {
        if let ContainerState::Running(running) = self.state.get_mut() {
            let _ = running.shutdown_tx.send(true);
            running.poll_task.abort();
        }
    }
}
