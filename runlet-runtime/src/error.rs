//! Error types for the initialization and invocation paths
//!
//! Two disjoint classes: `InitError` is fatal (reported once, then the host
//! exits non-zero), `HandlerError` is scoped to a single invocation and
//! never terminates the loop.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::HANDLER_ENV;

/// Error type reported for any failure raised by a running handler.
pub const HANDLER_ERROR_TYPE: &str = "Runtime.HandlerError";

/// Error report format posted to the control plane
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    pub error_message: String,
    pub error_type: String,
    pub stack_trace: Vec<String>,
}

impl ErrorDescriptor {
    pub fn new(
        error_type: impl Into<String>,
        error_message: impl Into<String>,
        stack_trace: Vec<String>,
    ) -> Self {
        Self {
            error_message: error_message.into(),
            error_type: error_type.into(),
            stack_trace,
        }
    }
}

/// Fatal initialization failures
///
/// Each variant maps to a machine-readable `Runtime.*` error type. None of
/// these can self-heal within a process lifetime, so the host reports once
/// and exits.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("handler not defined in environment variable {HANDLER_ENV}")]
    MissingHandler,

    #[error("handler module `{0}` not registered")]
    MissingHandlerFile(String),

    #[error("handler method `{method}` not found in module `{module}`")]
    MissingHandlerMethod { module: String, method: String },
}

impl InitError {
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MissingHandler => "Runtime.MissingHandler",
            Self::MissingHandlerFile(_) => "Runtime.MissingHandlerFile",
            Self::MissingHandlerMethod { .. } => "Runtime.MissingHandlerMethod",
        }
    }

    pub fn descriptor(&self) -> ErrorDescriptor {
        ErrorDescriptor::new(self.error_type(), self.to_string(), Vec::new())
    }
}

/// Failure raised by a handler during one invocation
///
/// Carries the message plus an ordered stack of frames. Frames come from the
/// error's source chain; `descriptor` guarantees at least one frame so the
/// control plane always receives a usable trace.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    frames: Vec<String>,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            frames: Vec::new(),
        }
    }

    pub fn with_frames(message: impl Into<String>, frames: Vec<String>) -> Self {
        Self {
            message: message.into(),
            frames,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn descriptor(&self) -> ErrorDescriptor {
        let frames = if self.frames.is_empty() {
            vec![format!("at {}", self.message)]
        } else {
            self.frames.clone()
        };

        ErrorDescriptor::new(HANDLER_ERROR_TYPE, self.message.clone(), frames)
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        // The cause chain stands in for a stack trace: outermost error
        // first, root cause last.
        let frames = err.chain().map(|cause| format!("at {cause}")).collect();
        Self {
            message: err.to_string(),
            frames,
        }
    }
}
