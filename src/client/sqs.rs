use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::{Message as SqsMessage, MessageSystemAttributeName};
use tracing::warn;

use super::QueueClient;
use crate::errors::QueueClientError;
use crate::message::{Message, QueueAddress, ReceiveRequest};

/// [`QueueClient`] backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct SqsQueueClient {
    sqs_client: aws_sdk_sqs::Client,
}

impl SqsQueueClient {
    pub fn new(sqs_client: aws_sdk_sqs::Client) -> Self {
        SqsQueueClient { sqs_client }
    }

    /// Builds the underlying SDK client from environment configuration.
    pub async fn from_env() -> Self {
        SqsQueueClient::new(super::create_sqs_client_from_env().await)
    }

    pub fn inner(&self) -> &aws_sdk_sqs::Client {
        &self.sqs_client
    }
}

fn transport_error(err: impl std::error::Error) -> QueueClientError {
    QueueClientError::Transport(DisplayErrorContext(err).to_string())
}

fn whole_seconds(duration: Duration) -> i32 {
    i32::try_from(duration.as_secs()).unwrap_or(i32::MAX)
}

/// Converts an SDK message, dropping deliveries that cannot be acknowledged.
fn convert_message(message: SqsMessage) -> Option<Message> {
    let Some(receipt_handle) = message.receipt_handle else {
        warn!(message_id = ?message.message_id, "Received a message without a receipt handle");
        return None;
    };

    let attributes = message
        .attributes
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (name.as_str().to_string(), value))
        .collect();

    let message_attributes: HashMap<String, String> = message
        .message_attributes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| value.string_value.map(|v| (name, v)))
        .collect();

    Some(Message {
        id: message.message_id.unwrap_or_default(),
        body: message.body.unwrap_or_default(),
        receipt_handle,
        attributes,
        message_attributes,
    })
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    async fn resolve_queue_address(
        &self,
        queue_name: &str,
    ) -> Result<QueueAddress, QueueClientError> {
        let output = self
            .sqs_client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(transport_error)?;

        output.queue_url().map(QueueAddress::from).ok_or_else(|| {
            QueueClientError::Transport(format!("no queue url returned for '{queue_name}'"))
        })
    }

    async fn receive(
        &self,
        address: &QueueAddress,
        request: &ReceiveRequest,
    ) -> Result<Vec<Message>, QueueClientError> {
        let output = self
            .sqs_client
            .receive_message()
            .queue_url(address.as_str())
            .max_number_of_messages(request.max_messages)
            .visibility_timeout(whole_seconds(request.visibility_timeout))
            .wait_time_seconds(whole_seconds(request.wait_time))
            .message_system_attribute_names(MessageSystemAttributeName::from("All"))
            .message_attribute_names("All")
            .send()
            .await
            .map_err(transport_error)?;

        Ok(output
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(convert_message)
            .collect())
    }

    async fn delete(
        &self,
        address: &QueueAddress,
        receipt_handle: &str,
    ) -> Result<(), QueueClientError> {
        self.sqs_client
            .delete_message()
            .queue_url(address.as_str())
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(transport_error)?;
        Ok(())
    }
}
