use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, warn};

use super::handler::MessageHandler;
use crate::client::QueueClient;
use crate::errors::HandlerError;
use crate::message::{Message, QueueAddress};
use crate::policy::{DeletionPolicy, HandlerOutcome};

/// What happened to one dispatched message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcome: HandlerOutcome,
    /// Whether the deletion policy asked for the message to be deleted.
    pub delete_attempted: bool,
    /// Whether the delete call succeeded.
    pub deleted: bool,
}

/// Runs the handler for one message at a time and reconciles the outcome
/// with the deletion policy. Cloned into every dispatch task of a container.
#[derive(Clone)]
pub struct DispatchWorker {
    listener_name: Arc<str>,
    client: Arc<dyn QueueClient>,
    handler: Arc<dyn MessageHandler>,
    deletion_policy: DeletionPolicy,
    queue_address: Arc<QueueAddress>,
}

impl DispatchWorker {
    pub fn new(
        listener_name: Arc<str>,
        client: Arc<dyn QueueClient>,
        handler: Arc<dyn MessageHandler>,
        deletion_policy: DeletionPolicy,
        queue_address: Arc<QueueAddress>,
    ) -> Self {
        DispatchWorker {
            listener_name,
            client,
            handler,
            deletion_policy,
            queue_address,
        }
    }

    /// Invokes the handler for `message`, then deletes it if the policy says so.
    ///
    /// Completes only after the delete call (if any) has resolved. Failures
    /// are logged, never returned: a message that is not deleted is
    /// redelivered once its visibility timeout expires.
    pub async fn dispatch(&self, message: Message) -> DispatchReport {
        let outcome = match self.invoke_handler(&message).await {
            Ok(()) => {
                debug!(
                    listener = %self.listener_name,
                    message_id = %message.id,
                    "Successfully handled message"
                );
                HandlerOutcome::Success
            }
            Err(e) => {
                error!(
                    listener = %self.listener_name,
                    queue = %self.queue_address,
                    message_id = %message.id,
                    body = %message.body,
                    error = %e,
                    "Failed to handle message"
                );
                HandlerOutcome::Error
            }
        };

        let delete_attempted = self.deletion_policy.should_delete(outcome);
        let deleted = delete_attempted && self.delete(&message).await;

        DispatchReport {
            outcome,
            delete_attempted,
            deleted,
        }
    }

    async fn invoke_handler(&self, message: &Message) -> Result<(), HandlerError> {
        match AssertUnwindSafe(self.handler.handle(message))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => Err(HandlerError::new(panic_message(panic.as_ref()))),
        }
    }

    async fn delete(&self, message: &Message) -> bool {
        match self
            .client
            .delete(&self.queue_address, &message.receipt_handle)
            .await
        {
            Ok(()) => {
                debug!(
                    listener = %self.listener_name,
                    message_id = %message.id,
                    "Deleted message"
                );
                true
            }
            Err(e) => {
                warn!(
                    listener = %self.listener_name,
                    queue = %self.queue_address,
                    message_id = %message.id,
                    error = %e,
                    "Failed to delete message, it will be redelivered after its visibility timeout"
                );
                false
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("handler panicked: {s}")
    } else {
        "handler panicked".to_string()
    }
}
