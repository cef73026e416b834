//! Listener containers: the poll-dispatch-delete loop for one queue.

pub mod config;
pub mod container;
pub mod executor;
pub mod handler;
mod poll;
pub mod worker;

pub use config::ListenerConfig;
pub use container::ListenerContainer;
pub use executor::{BoundedExecutor, TaskCompletion};
pub use handler::{HandlerFn, MessageHandler, SharedHandlerFn};
pub use worker::{DispatchReport, DispatchWorker};
