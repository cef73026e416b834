use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info};

use crate::client::{QueueClient, SqsQueueClient};
use crate::errors::{HandlerError, SqsListenerError};
use crate::listener::{HandlerFn, ListenerConfig, ListenerContainer, MessageHandler, SharedHandlerFn};
use crate::message::Message;

/// Registry of listener containers sharing one queue client.
///
/// Binds handlers to listener configurations, starts every container on
/// boot and stops them all on shutdown.
///
/// # Example
///
/// ```rust,no_run
/// use sqs_listener::{client::create_sqs_client_from_env, ListenerConfig, Message, SqsReceiver};
///
/// #[tokio::main]
/// async fn main() {
///     let mut receiver = SqsReceiver::from_sqs_client(create_sqs_client_from_env().await);
///     let shared_data = "shared state".to_string();
///
///     receiver.add_handler_fn_with_shared(
///         "orders-listener",
///         ListenerConfig::new("orders"),
///         |message: Message, shared: String| async move {
///             println!("Processing message: {} with shared: {}", message.body, shared);
///             Ok(())
///         },
///         shared_data,
///     );
///
///     receiver
///         .run_until_shutdown(async {
///             let _ = tokio::signal::ctrl_c().await;
///         })
///         .await;
/// }
/// ```
pub struct SqsReceiver {
    client: Arc<dyn QueueClient>,
    containers: Vec<Arc<ListenerContainer>>,
}

impl SqsReceiver {
    pub fn new(client: Arc<dyn QueueClient>) -> Self {
        SqsReceiver {
            client,
            containers: Vec::new(),
        }
    }

    pub fn from_sqs_client(sqs_client: aws_sdk_sqs::Client) -> Self {
        SqsReceiver::new(Arc::new(SqsQueueClient::new(sqs_client)))
    }

    pub fn containers(&self) -> &[Arc<ListenerContainer>] {
        &self.containers
    }

    /// Creates a container for `config` bound to `handler`.
    pub fn add_handler<H>(
        &mut self,
        name: impl Into<String>,
        config: ListenerConfig,
        handler: H,
    ) -> Arc<ListenerContainer>
    where
        H: MessageHandler + 'static,
    {
        let container = Arc::new(ListenerContainer::new(
            name,
            config,
            self.client.clone(),
            Arc::new(handler),
        ));
        self.containers.push(container.clone());
        container
    }

    /// Adds a listener whose handler is a plain async function.
    pub fn add_handler_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        config: ListenerConfig,
        handler_fn: F,
    ) -> Arc<ListenerContainer>
    where
        F: Fn(Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.add_handler(name, config, HandlerFn::new(handler_fn))
    }

    /// Adds a listener whose handler receives a clone of `shared_resources`
    /// with every message.
    pub fn add_handler_fn_with_shared<F, Fut, TShared>(
        &mut self,
        name: impl Into<String>,
        config: ListenerConfig,
        handler_fn: F,
        shared_resources: TShared,
    ) -> Arc<ListenerContainer>
    where
        F: Fn(Message, TShared) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
        TShared: Send + Sync + Clone + 'static,
    {
        self.add_handler(
            name,
            config,
            SharedHandlerFn::new(handler_fn, shared_resources),
        )
    }

    /// Starts every registered container.
    ///
    /// A container that fails to start does not prevent the others from
    /// starting; the failures are logged and returned.
    pub async fn start_all(&self) -> Vec<SqsListenerError> {
        let results = join_all(self.containers.iter().map(|c| c.start())).await;

        let mut failures = Vec::new();
        for (container, result) in self.containers.iter().zip(results) {
            if let Err(e) = result {
                error!(listener = container.name(), error = %e, "Failed to start listener");
                failures.push(e);
            }
        }
        info!(
            started = self.containers.len() - failures.len(),
            failed = failures.len(),
            "Listeners started"
        );
        failures
    }

    /// Stops every container concurrently. A container whose stop fails does
    /// not keep the others from stopping.
    pub async fn stop_all(&self) {
        let stops = self.containers.iter().map(|container| {
            let container = container.clone();
            tokio::spawn(async move { container.stop().await })
        });

        for (container, result) in self.containers.iter().zip(join_all(stops).await) {
            if let Err(e) = result {
                error!(listener = container.name(), error = %e, "Failed to stop listener");
            }
        }
    }

    /// Starts all containers, waits for `shutdown` to resolve, then stops them.
    ///
    /// Returns the start failures.
    pub async fn run_until_shutdown<S>(&self, shutdown: S) -> Vec<SqsListenerError>
    where
        S: Future<Output = ()>,
    {
        let failures = self.start_all().await;
        shutdown.await;
        info!("Shutdown signal received, stopping listeners");
        self.stop_all().await;
        failures
    }
}
