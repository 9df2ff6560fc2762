//! Built-in handler modules
//!
//! Handlers are compiled into the host and registered under `module.method`
//! names. Deployments embedding `runlet-runtime` build their own registry;
//! these are the ones the stock binary ships with.

use serde_json::json;

use runlet_runtime::{handler_fn, HandlerError, HandlerRegistry};

/// Registry of handlers compiled into this binary.
pub fn builtin_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    // Echoes the payload back, wrapped with invocation metadata.
    registry.register(
        "echo",
        "handler",
        handler_fn(|payload, context| async move {
            Ok(Some(json!({
                "requestId": context.aws_request_id,
                "functionName": context.function_name,
                "remainingTimeMs": context.remaining_time_in_millis(),
                "payload": payload,
            })))
        }),
    );

    // Always fails; useful for exercising the error-reporting path during
    // deployment bring-up.
    registry.register_fallback(
        "diagnostics",
        "fail",
        handler_fn(|_payload, _context| async move {
            Err(HandlerError::new("diagnostic failure requested"))
        }),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_resolve() {
        let registry = builtin_registry();

        assert!(registry.resolve("echo.handler").is_ok());
        assert!(registry.resolve("diagnostics.fail").is_ok());
        assert!(registry.resolve("echo.missing").is_err());
    }
}
