//! Runtime implementation for Runlet
//!
//! Implements the execution-host side of the serverless runtime protocol:
//! fetch an invocation from the control plane, run the configured handler,
//! report the outcome, repeat.

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod runtime;

pub use client::{Invocation, RuntimeApiClient};
pub use config::RuntimeConfig;
pub use context::Context;
pub use error::{ErrorDescriptor, HandlerError, InitError};
pub use handler::{handler_fn, Handler, HandlerRegistry};
pub use runtime::Runtime;
