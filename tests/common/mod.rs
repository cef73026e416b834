#![allow(dead_code)]

use async_trait::async_trait;
use sqs_listener::{
    HandlerError, Message, MessageHandler, QueueAddress, QueueClient, QueueClientError,
    ReceiveRequest,
};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One scripted answer to a receive call.
pub enum ReceiveStep {
    Batch(Vec<Message>),
    Fail(&'static str),
}

/// In-memory queue client answering receives from a script, then with empty
/// long polls once the script is exhausted.
pub struct ScriptedQueueClient {
    script: Mutex<VecDeque<ReceiveStep>>,
    resolve_delay: Duration,
    resolve_error: Option<&'static str>,
    empty_poll_delay: Duration,
    fail_deletes: bool,
    receive_calls: AtomicUsize,
    resolve_calls: AtomicUsize,
    deleted: Mutex<Vec<String>>,
    requests: Mutex<Vec<ReceiveRequest>>,
}

impl ScriptedQueueClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            resolve_delay: Duration::ZERO,
            resolve_error: None,
            empty_poll_delay: Duration::from_millis(10),
            fail_deletes: false,
            receive_calls: AtomicUsize::new(0),
            resolve_calls: AtomicUsize::new(0),
            deleted: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then_batch(self, batch: Vec<Message>) -> Self {
        self.script.lock().unwrap().push_back(ReceiveStep::Batch(batch));
        self
    }

    pub fn then_fail(self, reason: &'static str) -> Self {
        self.script.lock().unwrap().push_back(ReceiveStep::Fail(reason));
        self
    }

    pub fn with_resolve_delay(mut self, delay: Duration) -> Self {
        self.resolve_delay = delay;
        self
    }

    pub fn with_resolve_error(mut self, reason: &'static str) -> Self {
        self.resolve_error = Some(reason);
        self
    }

    pub fn with_empty_poll_delay(mut self, delay: Duration) -> Self {
        self.empty_poll_delay = delay;
        self
    }

    pub fn with_failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn receive_calls(&self) -> usize {
        self.receive_calls.load(Ordering::SeqCst)
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<ReceiveRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn script_exhausted(&self) -> bool {
        self.script.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl QueueClient for ScriptedQueueClient {
    async fn resolve_queue_address(
        &self,
        queue_name: &str,
    ) -> Result<QueueAddress, QueueClientError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.resolve_delay).await;
        match self.resolve_error {
            Some(reason) => Err(QueueClientError::Transport(reason.to_string())),
            None => Ok(QueueAddress::new(format!(
                "http://localhost:4566/000000000000/{queue_name}"
            ))),
        }
    }

    async fn receive(
        &self,
        _address: &QueueAddress,
        request: &ReceiveRequest,
    ) -> Result<Vec<Message>, QueueClientError> {
        self.receive_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(*request);

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(ReceiveStep::Batch(batch)) => Ok(batch),
            Some(ReceiveStep::Fail(reason)) => {
                Err(QueueClientError::Transport(reason.to_string()))
            }
            None => {
                tokio::time::sleep(self.empty_poll_delay).await;
                Ok(Vec::new())
            }
        }
    }

    async fn delete(
        &self,
        _address: &QueueAddress,
        receipt_handle: &str,
    ) -> Result<(), QueueClientError> {
        if self.fail_deletes {
            return Err(QueueClientError::Transport("delete refused".to_string()));
        }
        self.deleted.lock().unwrap().push(receipt_handle.to_string());
        Ok(())
    }
}

/// Handler that records every invocation and the peak number of concurrent
/// invocations.
pub struct RecordingHandler {
    hold: Duration,
    failing_bodies: HashSet<String>,
    current: AtomicUsize,
    peak: AtomicUsize,
    handled: Mutex<Vec<String>>,
    completed: AtomicUsize,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self {
            hold: Duration::ZERO,
            failing_bodies: HashSet::new(),
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            handled: Mutex::new(Vec::new()),
            completed: AtomicUsize::new(0),
        }
    }

    /// Every invocation sleeps for `hold` before returning.
    pub fn holding(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    pub fn failing_on(mut self, body: &str) -> Self {
        self.failing_bodies.insert(body.to_string());
        self
    }

    pub fn handled(&self) -> Vec<String> {
        self.handled.lock().unwrap().clone()
    }

    pub fn in_flight(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageHandler for RecordingHandler {
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        self.handled.lock().unwrap().push(message.body.clone());
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.hold).await;

        self.current.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        if self.failing_bodies.contains(&message.body) {
            Err(HandlerError::new(format!("cannot handle {}", message.body)))
        } else {
            Ok(())
        }
    }
}

pub fn message(n: usize, body: &str) -> Message {
    Message::new(format!("id-{n}"), body, format!("rh-{n}"))
}

/// Polls `condition` until it holds, panicking after five seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met within 5s");
}
