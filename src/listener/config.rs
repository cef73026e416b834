use std::time::Duration;

use crate::errors::SqsListenerError;
use crate::message::ReceiveRequest;
use crate::policy::DeletionPolicy;

/// Upper bound SQS places on messages returned by one receive call.
pub const MAX_MESSAGES_PER_POLL: i32 = 10;
/// Longest long-poll wait SQS accepts.
pub const MAX_POLL_WAIT_TIME: Duration = Duration::from_secs(20);
/// Longest visibility timeout SQS accepts (12 hours).
pub const MAX_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(12 * 60 * 60);

/// Configuration for one listener container.
///
/// The container copies this on construction; it cannot be changed once the
/// container starts.
///
/// # Fields
/// - `queue_name`: Name of the queue, resolved to an address on start.
/// - `max_concurrency`: Maximum number of handler invocations in flight.
/// - `max_queued_tasks`: Maximum number of dispatches waiting for a free worker.
///   `None` lets the backlog grow with the batch size.
/// - `max_messages_per_poll`: The maximum number of messages to receive in a single request.
/// - `visibility_timeout`: How long received messages stay hidden from other receivers.
/// - `poll_wait_time`: The wait time for long polling.
/// - `deletion_policy`: When handled messages are deleted.
/// - `resolve_timeout`: Bound on queue address resolution during start.
/// - `shutdown_grace_period`: How long `stop` waits for in-flight dispatches.
/// - `receive_error_backoff`: Pause after a failed receive before polling again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    pub queue_name: String,
    pub max_concurrency: usize,
    pub max_queued_tasks: Option<usize>,
    pub max_messages_per_poll: i32,
    pub visibility_timeout: Duration,
    pub poll_wait_time: Duration,
    pub deletion_policy: DeletionPolicy,
    pub resolve_timeout: Duration,
    pub shutdown_grace_period: Duration,
    pub receive_error_backoff: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        ListenerConfig {
            queue_name: String::new(),
            max_concurrency: 10,
            max_queued_tasks: None,
            max_messages_per_poll: MAX_MESSAGES_PER_POLL,
            visibility_timeout: Duration::from_secs(30),
            poll_wait_time: MAX_POLL_WAIT_TIME,
            deletion_policy: DeletionPolicy::default(),
            resolve_timeout: Duration::from_secs(5),
            shutdown_grace_period: Duration::from_secs(10),
            receive_error_backoff: Duration::from_secs(1),
        }
    }
}

impl ListenerConfig {
    /// Creates a configuration for `queue_name` with default settings.
    pub fn new(queue_name: impl Into<String>) -> Self {
        ListenerConfig {
            queue_name: queue_name.into(),
            ..Default::default()
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_max_queued_tasks(mut self, max_queued_tasks: usize) -> Self {
        self.max_queued_tasks = Some(max_queued_tasks);
        self
    }

    pub fn with_max_messages_per_poll(mut self, max_messages_per_poll: i32) -> Self {
        self.max_messages_per_poll = max_messages_per_poll;
        self
    }

    pub fn with_visibility_timeout(mut self, visibility_timeout: Duration) -> Self {
        self.visibility_timeout = visibility_timeout;
        self
    }

    pub fn with_poll_wait_time(mut self, poll_wait_time: Duration) -> Self {
        self.poll_wait_time = poll_wait_time;
        self
    }

    pub fn with_deletion_policy(mut self, deletion_policy: DeletionPolicy) -> Self {
        self.deletion_policy = deletion_policy;
        self
    }

    pub fn with_resolve_timeout(mut self, resolve_timeout: Duration) -> Self {
        self.resolve_timeout = resolve_timeout;
        self
    }

    pub fn with_shutdown_grace_period(mut self, shutdown_grace_period: Duration) -> Self {
        self.shutdown_grace_period = shutdown_grace_period;
        self
    }

    pub fn with_receive_error_backoff(mut self, receive_error_backoff: Duration) -> Self {
        self.receive_error_backoff = receive_error_backoff;
        self
    }

    /// Checks the configuration against the limits the queue imposes.
    pub fn validate(&self) -> Result<(), SqsListenerError> {
        let invalid = |reason: String| Err(SqsListenerError::InvalidConfig(reason));

        if self.queue_name.trim().is_empty() {
            return invalid("queue name must not be empty".to_string());
        }
        if self.max_concurrency == 0 {
            return invalid("max_concurrency must be at least 1".to_string());
        }
        if self.max_queued_tasks == Some(0) {
            return invalid("max_queued_tasks must be at least 1 when set".to_string());
        }
        if !(1..=MAX_MESSAGES_PER_POLL).contains(&self.max_messages_per_poll) {
            return invalid(format!(
                "max_messages_per_poll must be between 1 and {MAX_MESSAGES_PER_POLL}, got {}",
                self.max_messages_per_poll
            ));
        }
        if self.poll_wait_time > MAX_POLL_WAIT_TIME {
            return invalid(format!(
                "poll_wait_time must not exceed {MAX_POLL_WAIT_TIME:?}, got {:?}",
                self.poll_wait_time
            ));
        }
        if self.visibility_timeout > MAX_VISIBILITY_TIMEOUT {
            return invalid(format!(
                "visibility_timeout must not exceed {MAX_VISIBILITY_TIMEOUT:?}, got {:?}",
                self.visibility_timeout
            ));
        }
        Ok(())
    }

    pub(crate) fn receive_request(&self) -> ReceiveRequest {
        ReceiveRequest {
            max_messages: self.max_messages_per_poll,
            visibility_timeout: self.visibility_timeout,
            wait_time: self.poll_wait_time,
        }
    }
}
