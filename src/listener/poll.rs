use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use super::executor::BoundedExecutor;
use super::worker::DispatchWorker;
use crate::client::QueueClient;
use crate::message::{QueueAddress, ReceiveRequest};

/// The receive-dispatch loop of one listener container.
///
/// Each iteration receives one batch, fans it out onto the executor and
/// waits for every dispatch of the batch before the next receive is issued,
/// so receives for one container never overlap.
pub(crate) struct PollLoop {
    pub(crate) listener_name: Arc<str>,
    pub(crate) client: Arc<dyn QueueClient>,
    pub(crate) queue_address: Arc<QueueAddress>,
    pub(crate) request: ReceiveRequest,
    pub(crate) executor: Arc<BoundedExecutor>,
    pub(crate) worker: DispatchWorker,
    pub(crate) receive_error_backoff: Duration,
}

impl PollLoop {
    /// Runs iterations until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// An iteration in progress when shutdown is signalled is dropped, which
    /// cancels an outstanding receive. Dispatches already handed to the
    /// executor keep running; the executor's own shutdown deals with them.
    pub(crate) async fn run(self, mut shutdown: watch::Receiver<bool>) {
        while !*shutdown.borrow_and_update() {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = self.iteration() => {}
            }
        }
        debug!(listener = %self.listener_name, "Poll loop exited");
    }

    async fn iteration(&self) {
        debug!(listener = %self.listener_name, "Fetching messages");
        let messages = match self.client.receive(&self.queue_address, &self.request).await {
            Ok(messages) => messages,
            Err(e) => {
                error!(
                    listener = %self.listener_name,
                    queue = %self.queue_address,
                    error = %e,
                    "Failed to receive messages"
                );
                tokio::time::sleep(self.receive_error_backoff).await;
                return;
            }
        };

        if messages.is_empty() {
            debug!(listener = %self.listener_name, "No messages received");
            return;
        }
        debug!(
            listener = %self.listener_name,
            count = messages.len(),
            "Received messages"
        );

        let mut completions = Vec::with_capacity(messages.len());
        for message in messages {
            let message_id = message.id.clone();
            let worker = self.worker.clone();
            match self
                .executor
                .submit(async move {
                    worker.dispatch(message).await;
                })
                .await
            {
                Ok(completion) => completions.push(completion.wait()),
                Err(e) => warn!(
                    listener = %self.listener_name,
                    message_id = %message_id,
                    error = %e,
                    "Could not schedule message, it will be redelivered after its visibility timeout"
                ),
            }
        }

        join_all(completions).await;
    }
}
