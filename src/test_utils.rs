use crate::client::QueueClient;
use crate::errors::{HandlerError, QueueClientError};
use crate::listener::handler::{HandlerFn, MessageHandler};
use crate::message::{Message, QueueAddress, ReceiveRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) struct MockQueueClient {
    batches: Mutex<VecDeque<Vec<Message>>>,
    deleted: Mutex<Vec<String>>,
    receive_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_deletes: bool,
}

impl MockQueueClient {
    pub(crate) fn new() -> Self {
        Self {
            batches: Mutex::new(VecDeque::new()),
            deleted: Mutex::new(Vec::new()),
            receive_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            fail_deletes: false,
        }
    }

    pub(crate) fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::new()
        }
    }

    pub(crate) fn with_batch(self, batch: Vec<Message>) -> Self {
        self.batches.lock().unwrap().push_back(batch);
        self
    }

    pub(crate) fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub(crate) fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn receive_calls(&self) -> usize {
        self.receive_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueClient for MockQueueClient {
    async fn resolve_queue_address(
        &self,
        queue_name: &str,
    ) -> Result<QueueAddress, QueueClientError> {
        Ok(QueueAddress::new(format!(
            "https://sqs.local/000000000000/{queue_name}"
        )))
    }

    async fn receive(
        &self,
        _address: &QueueAddress,
        _request: &ReceiveRequest,
    ) -> Result<Vec<Message>, QueueClientError> {
        self.receive_calls.fetch_add(1, Ordering::SeqCst);
        let batch = self.batches.lock().unwrap().pop_front();
        match batch {
            Some(batch) => Ok(batch),
            None => {
                // stand-in for an empty long poll
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn delete(
        &self,
        _address: &QueueAddress,
        receipt_handle: &str,
    ) -> Result<(), QueueClientError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes {
            return Err(QueueClientError::Transport("delete refused".to_string()));
        }
        self.deleted.lock().unwrap().push(receipt_handle.to_string());
        Ok(())
    }
}

/// Handler that fails for messages whose body equals `bad_body`.
pub(crate) fn failing_on(bad_body: &'static str) -> impl MessageHandler {
    HandlerFn::new(move |message: Message| async move {
        if message.body == bad_body {
            Err(HandlerError::new(format!("cannot handle {bad_body}")))
        } else {
            Ok(())
        }
    })
}
