use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_sqs::config::{BehaviorVersion, SharedCredentialsProvider};

use crate::errors::QueueClientError;
use crate::message::{Message, QueueAddress, ReceiveRequest};

mod sqs;

pub use sqs::SqsQueueClient;

/// Transport operations a listener container needs from a queue.
///
/// Implementations must be cheap to share between the poll loop and every
/// dispatch worker of a container; they are held behind an `Arc`.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Resolves a queue name into the address used by `receive` and `delete`.
    async fn resolve_queue_address(
        &self,
        queue_name: &str,
    ) -> Result<QueueAddress, QueueClientError>;

    /// Receives up to `request.max_messages` messages. An empty batch is a
    /// valid result.
    async fn receive(
        &self,
        address: &QueueAddress,
        request: &ReceiveRequest,
    ) -> Result<Vec<Message>, QueueClientError>;

    /// Deletes one delivery of a message.
    async fn delete(
        &self,
        address: &QueueAddress,
        receipt_handle: &str,
    ) -> Result<(), QueueClientError>;
}

/// Creates an AWS SQS client using credentials and configuration from the environment.
///
/// This function loads AWS configuration from environment variables such as:
/// - `AWS_ACCESS_KEY_ID`
/// - `AWS_SECRET_ACCESS_KEY`
/// - `AWS_REGION`
/// - `AWS_PROFILE`
/// - `AWS_ENDPOINT_URL` / `AWS_ENDPOINT_URL_SQS`
///
/// # Example
///
/// ```rust,no_run
/// use sqs_listener::client::create_sqs_client_from_env;
///
/// #[tokio::main]
/// async fn main() {
///     let client = create_sqs_client_from_env().await;
///     // Use the client...
/// }
/// ```
pub async fn create_sqs_client_from_env() -> aws_sdk_sqs::Client {
    let config = aws_config::load_from_env().await;
    aws_sdk_sqs::Client::new(&config)
}

/// Creates an AWS SQS client with explicitly provided credentials and region.
///
/// Pass `endpoint_url` to talk to an SQS-compatible endpoint other than AWS,
/// such as a local emulator.
///
/// # Arguments
///
/// * `access_key_id` - The AWS access key ID
/// * `secret_access_key` - The AWS secret access key
/// * `region` - The AWS region (e.g., "us-east-1", "eu-west-1")
/// * `endpoint_url` - Optional endpoint override
///
/// # Example
///
/// ```rust,no_run
/// use sqs_listener::client::create_sqs_client_with_credentials;
///
/// let client = create_sqs_client_with_credentials(
///     "test",
///     "test",
///     "us-east-1",
///     Some("http://localhost:4566"),
/// );
/// ```
pub fn create_sqs_client_with_credentials(
    access_key_id: &str,
    secret_access_key: &str,
    region: &str,
    endpoint_url: Option<&str>,
) -> aws_sdk_sqs::Client {
    let credentials = aws_sdk_sqs::config::Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "sqs-listener",
    );

    let mut builder = aws_sdk_sqs::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .credentials_provider(SharedCredentialsProvider::new(credentials));

    if let Some(endpoint_url) = endpoint_url {
        builder = builder.endpoint_url(endpoint_url);
    }

    aws_sdk_sqs::Client::from_conf(builder.build())
}
