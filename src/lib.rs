//! # SQS Listener
//!
//! An asynchronous SQS listener container. Each listener continuously polls
//! one queue, dispatches received messages to a handler under a bounded
//! concurrency budget, and deletes messages according to a deletion policy.
//!
//! ## Features
//!
//! - Long polling with batch size, visibility timeout and wait time fixed per listener
//! - At most `max_concurrency` handler invocations in flight per listener,
//!   with an optional bounded backlog
//! - Deletion policies: `Always`, `OnSuccess`, `OnError`, `Never`
//! - Continue-on-error semantics: receive, handler and delete failures are
//!   logged and never stop the loop; undeleted messages are redelivered
//!   after their visibility timeout
//! - Graceful, idempotent shutdown with a grace period for in-flight work
//! - Trait-based handlers, plain async functions, or functions with a shared resource
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqs_listener::{client::create_sqs_client_from_env, DeletionPolicy, ListenerConfig, Message, SqsReceiver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut receiver = SqsReceiver::from_sqs_client(create_sqs_client_from_env().await);
//!
//!     receiver.add_handler_fn(
//!         "orders-listener",
//!         ListenerConfig::new("orders")
//!             .with_max_concurrency(8)
//!             .with_deletion_policy(DeletionPolicy::OnSuccess),
//!         |message: Message| async move {
//!             println!("Processing message: {}", message.body);
//!             Ok(())
//!         },
//!     );
//!
//!     let failures = receiver
//!         .run_until_shutdown(async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await;
//!     if let Some(e) = failures.into_iter().next() {
//!         return Err(e.into());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod errors;
pub mod listener;
pub mod message;
pub mod policy;
pub mod receiver;

#[cfg(test)]
mod test_utils;

pub use client::{QueueClient, SqsQueueClient};
pub use errors::{ExecutorError, HandlerError, QueueClientError, SqsListenerError};
pub use listener::{
    HandlerFn, ListenerConfig, ListenerContainer, MessageHandler, SharedHandlerFn,
};
pub use message::{Message, QueueAddress, ReceiveRequest};
pub use policy::{DeletionPolicy, HandlerOutcome};
pub use receiver::SqsReceiver;
