use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Error types for SQS listener container operations.
///
/// Only startup and lifecycle problems surface through this type. Receive,
/// handler and delete failures are recovered inside the container and are
/// only observable through logging.
#[derive(Debug, Error)]
pub enum SqsListenerError {
    /// The listener configuration is not usable.
    #[error("invalid listener configuration: {0}")]
    InvalidConfig(String),

    /// Queue address resolution did not complete within the start timeout.
    #[error("timed out resolving queue address for '{queue_name}' after {timeout:?}")]
    ResolveTimeout { queue_name: String, timeout: Duration },

    /// The queue client failed to resolve the queue address.
    #[error("failed to resolve queue address for '{queue_name}': {source}")]
    ResolveFailed {
        queue_name: String,
        #[source]
        source: QueueClientError,
    },

    #[error("listener '{0}' is already running")]
    AlreadyStarted(String),

    #[error("listener '{0}' has been stopped and cannot be restarted")]
    Stopped(String),
}

impl SqsListenerError {
    /// Returns `true` when the container could not start because its queue
    /// address could not be resolved.
    pub fn is_fatal_startup(&self) -> bool {
        matches!(
            self,
            SqsListenerError::ResolveTimeout { .. } | SqsListenerError::ResolveFailed { .. }
        )
    }
}

/// Errors reported by a [`QueueClient`](crate::client::QueueClient) implementation.
#[derive(Debug, Clone, Error)]
pub enum QueueClientError {
    #[error("queue transport error: {0}")]
    Transport(String),

    #[error("queue operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors returned when submitting work to a bounded executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// Every running and backlog slot is taken.
    #[error("task rejected: executor backlog is full")]
    Rejected,

    #[error("task rejected: executor is shutting down")]
    Closed,
}

/// Error returned by a message handler.
///
/// The container only logs it; what happens to the message afterwards is
/// decided by the listener's deletion policy.
#[derive(Debug, Clone, Error)]
pub struct HandlerError(String);

impl HandlerError {
    /// Creates a new `HandlerError` with the provided message.
    pub fn new(message: impl Into<String>) -> Self {
        HandlerError(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HandlerError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HandlerError::new(s))
    }
}

impl From<String> for HandlerError {
    fn from(s: String) -> Self {
        HandlerError::new(s)
    }
}

impl From<&str> for HandlerError {
    fn from(s: &str) -> Self {
        HandlerError::new(s)
    }
}
