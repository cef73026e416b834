//! Runs against a real SQS endpoint (AWS or a local emulator).
//!
//! Configure through the environment or a `.env` file:
//! - `TEST_SQS_QUEUE_NAME` (required)
//! - `TEST_SQS_ENDPOINT_URL` (optional, e.g. `http://localhost:4566`)
//! - the usual `AWS_*` credentials and region
//!
//! Run with `cargo test --test integration_test -- --ignored`.

use sqs_listener::{
    DeletionPolicy, HandlerError, ListenerConfig, ListenerContainer, Message, SqsQueueClient,
    client,
};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;

async fn sqs_client() -> aws_sdk_sqs::Client {
    dotenvy::dotenv().ok();

    match env::var("TEST_SQS_ENDPOINT_URL") {
        Ok(endpoint) => client::create_sqs_client_with_credentials(
            &env::var("AWS_ACCESS_KEY_ID").unwrap_or_else(|_| "test".to_string()),
            &env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_else(|_| "test".to_string()),
            &env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            Some(&endpoint),
        ),
        Err(_) => client::create_sqs_client_from_env().await,
    }
}

#[tokio::test]
#[ignore = "requires a reachable SQS endpoint"]
async fn test_sqs_listener_receives_and_deletes() {
    let sqs = sqs_client().await;
    let queue_name = env::var("TEST_SQS_QUEUE_NAME").expect("TEST_SQS_QUEUE_NAME must be set");

    let queue_url = sqs
        .create_queue()
        .queue_name(&queue_name)
        .send()
        .await
        .expect("Failed to create test queue")
        .queue_url()
        .expect("queue url")
        .to_string();

    sqs.send_message()
        .queue_url(&queue_url)
        .message_body("test")
        .send()
        .await
        .expect("Failed to send test message");

    let received = Arc::new(Mutex::new(Vec::<String>::new()));
    let handler = {
        let received = received.clone();
        sqs_listener::SharedHandlerFn::new(
            |message: Message, received: Arc<Mutex<Vec<String>>>| async move {
                received.lock().await.push(message.body);
                Ok::<(), HandlerError>(())
            },
            received,
        )
    };

    let container = ListenerContainer::new(
        "integration-listener",
        ListenerConfig::new(&queue_name)
            .with_max_messages_per_poll(1)
            .with_poll_wait_time(Duration::from_secs(1))
            .with_deletion_policy(DeletionPolicy::OnSuccess),
        Arc::new(SqsQueueClient::new(sqs.clone())),
        Arc::new(handler),
    );
    container.start().await.expect("listener failed to start");

    let timeout_result = timeout(Duration::from_secs(30), async {
        loop {
            if !received.lock().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    })
    .await;

    container.stop().await;

    match timeout_result {
        Ok(_) => {
            assert_eq!(received.lock().await.first().map(String::as_str), Some("test"));
        }
        Err(_) => panic!("Test timed out waiting for the message"),
    }

    let remaining = sqs
        .receive_message()
        .queue_url(&queue_url)
        .wait_time_seconds(1)
        .send()
        .await
        .expect("Failed to receive remaining messages");
    assert!(remaining.messages().is_empty());
}
