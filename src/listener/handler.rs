use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::message::Message;

/// Trait for message handlers bound to a listener container.
///
/// The container calls `handle` once per delivered message, possibly from
/// several workers at the same time. Returning `Err` (or panicking) counts as
/// a failed delivery; the listener's deletion policy decides whether the
/// message is deleted anyway.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: &Message) -> Result<(), HandlerError>;
}

#[async_trait]
impl<T> MessageHandler for Arc<T>
where
    T: MessageHandler + ?Sized,
{
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        (**self).handle(message).await
    }
}

/// Wraps an async function `Fn(Message) -> Future<Output = Result<(), HandlerError>>`.
///
/// # Example
///
/// ```rust
/// use sqs_listener::{HandlerFn, Message};
///
/// let handler = HandlerFn::new(|message: Message| async move {
///     println!("Processing message: {}", message.body);
///     Ok(())
/// });
/// ```
pub struct HandlerFn<F> {
    handler_fn: F,
}

impl<F, Fut> HandlerFn<F>
where
    F: Fn(Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    pub fn new(handler_fn: F) -> Self {
        HandlerFn { handler_fn }
    }
}

#[async_trait]
impl<F, Fut> MessageHandler for HandlerFn<F>
where
    F: Fn(Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        (self.handler_fn)(message.clone()).await
    }
}

/// Wraps an async function that also receives a clone of a shared resource,
/// such as a database pool or a counter, on every invocation.
///
/// # Type Parameters
///
/// * `F` - The message handler function type
/// * `TShared` - The type of shared resources passed to the handler
pub struct SharedHandlerFn<F, TShared> {
    handler_fn: F,
    shared_resources: TShared,
}

impl<F, Fut, TShared> SharedHandlerFn<F, TShared>
where
    F: Fn(Message, TShared) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    TShared: Send + Sync + Clone + 'static,
{
    pub fn new(handler_fn: F, shared_resources: TShared) -> Self {
        SharedHandlerFn {
            handler_fn,
            shared_resources,
        }
    }
}

#[async_trait]
impl<F, Fut, TShared> MessageHandler for SharedHandlerFn<F, TShared>
where
    F: Fn(Message, TShared) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    TShared: Send + Sync + Clone + 'static,
{
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        (self.handler_fn)(message.clone(), self.shared_resources.clone()).await
    }
}
