//! Handler registration and resolution
//!
//! Handlers are compiled in and registered under `module.method` names
//! instead of being loaded from disk. The registry keeps two tiers of
//! modules; resolution searches the primary tier first, then the fallback
//! tier, and the first tier that contains the module wins the export
//! lookup.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::context::Context;
use crate::error::{HandlerError, InitError};

/// A user-supplied entry point, invoked once per work item.
///
/// `Ok(None)` is a legal success with an empty response payload.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn invoke(
        &self,
        payload: Value,
        context: Context,
    ) -> Result<Option<Value>, HandlerError>;
}

struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Value, Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Value>, HandlerError>> + Send,
{
    async fn invoke(
        &self,
        payload: Value,
        context: Context,
    ) -> Result<Option<Value>, HandlerError> {
        (self.f)(payload, context).await
    }
}

/// Wrap a plain async function as a [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn Handler>
where
    F: Fn(Value, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Value>, HandlerError>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

type ModuleExports = HashMap<String, Arc<dyn Handler>>;

/// Named handler modules, searched primary tier first
#[derive(Default)]
pub struct HandlerRegistry {
    primary: HashMap<String, ModuleExports>,
    fallback: HashMap<String, ModuleExports>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an export in the primary tier.
    pub fn register(&mut self, module: &str, export: &str, handler: Arc<dyn Handler>) {
        self.primary
            .entry(module.to_string())
            .or_default()
            .insert(export.to_string(), handler);
    }

    /// Register an export in the fallback tier. Only consulted when the
    /// primary tier has no module of that name.
    pub fn register_fallback(&mut self, module: &str, export: &str, handler: Arc<dyn Handler>) {
        self.fallback
            .entry(module.to_string())
            .or_default()
            .insert(export.to_string(), handler);
    }

    /// Resolve a `module.method` identifier into a handler.
    ///
    /// The module lookup decides which tier serves the export lookup: a
    /// primary module missing the export is `MissingHandlerMethod` even if
    /// a fallback module of the same name has it.
    pub fn resolve(&self, identifier: &str) -> Result<Arc<dyn Handler>, InitError> {
        // `module.method`; any further dot-separated segments are ignored.
        let mut segments = identifier.split('.');
        let module = segments.next().unwrap_or_default();
        let method = segments.next().unwrap_or_default();

        let exports = self
            .primary
            .get(module)
            .or_else(|| self.fallback.get(module))
            .ok_or_else(|| InitError::MissingHandlerFile(module.to_string()))?;

        exports
            .get(method)
            .cloned()
            .ok_or_else(|| InitError::MissingHandlerMethod {
                module: module.to_string(),
                method: method.to_string(),
            })
    }
}
