use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// A message received from a queue.
///
/// The body and attributes are opaque to the listener container; only the
/// receipt handle is needed to delete this particular delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub body: String,
    /// Token identifying this delivery of the message.
    pub receipt_handle: String,
    /// System attributes such as `ApproximateReceiveCount`.
    pub attributes: HashMap<String, String>,
    /// User-defined message attributes that carry a string value.
    pub message_attributes: HashMap<String, String>,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        body: impl Into<String>,
        receipt_handle: impl Into<String>,
    ) -> Self {
        Message {
            id: id.into(),
            body: body.into(),
            receipt_handle: receipt_handle.into(),
            attributes: HashMap::new(),
            message_attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_message_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.message_attributes.insert(name.into(), value.into());
        self
    }
}

/// Resolved address of a queue, e.g. an SQS queue URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueAddress(String);

impl QueueAddress {
    pub fn new(address: impl Into<String>) -> Self {
        QueueAddress(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for QueueAddress {
    fn from(address: String) -> Self {
        QueueAddress(address)
    }
}

impl From<&str> for QueueAddress {
    fn from(address: &str) -> Self {
        QueueAddress(address.to_string())
    }
}

/// Parameters of a single receive call. Fixed for the lifetime of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveRequest {
    /// The maximum number of messages to receive in a single request (1-10).
    pub max_messages: i32,
    /// How long received messages stay hidden from other receivers.
    pub visibility_timeout: Duration,
    /// How long the receive call may wait for messages (long polling).
    pub wait_time: Duration,
}
