//! Per-invocation execution context

use crate::client::Invocation;
use crate::config::RuntimeConfig;

/// Context passed to the handler alongside the payload
///
/// Built fresh for every invocation from the invocation metadata and the
/// startup configuration snapshot; immutable once constructed.
#[derive(Debug, Clone)]
pub struct Context {
    pub aws_request_id: String,
    pub invoked_function_arn: String,
    pub trace_id: String,
    pub function_name: String,
    pub function_version: String,
    pub memory_limit_in_mb: String,
    pub log_group_name: String,
    pub log_stream_name: String,
    pub deadline_ms: i64,
}

impl Context {
    pub fn new(invocation: &Invocation, config: &RuntimeConfig) -> Self {
        Self {
            aws_request_id: invocation.request_id.clone(),
            invoked_function_arn: invocation.invoked_function_arn.clone(),
            trace_id: invocation.trace_id.clone(),
            function_name: config.function_name.clone(),
            function_version: config.function_version.clone(),
            memory_limit_in_mb: config.memory_limit_in_mb.clone(),
            log_group_name: config.log_group_name.clone(),
            log_stream_name: config.log_stream_name.clone(),
            deadline_ms: invocation.deadline_ms,
        }
    }

    /// Milliseconds until the platform kills this invocation.
    ///
    /// Recomputed against the clock on every call so handlers can poll it
    /// to self-impose timeouts. Goes negative once the deadline has passed.
    pub fn remaining_time_in_millis(&self) -> i64 {
        self.deadline_ms - chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn test_config() -> RuntimeConfig {
        RuntimeConfig {
            endpoint: "localhost:9001".to_string(),
            handler: Some("handler.process".to_string()),
            function_name: "demo".to_string(),
            function_version: "$LATEST".to_string(),
            memory_limit_in_mb: "128".to_string(),
            log_group_name: "/aws/lambda/demo".to_string(),
            log_stream_name: "2026/08/27/[$LATEST]abcdef".to_string(),
        }
    }

    fn test_invocation(deadline_ms: i64) -> Invocation {
        Invocation {
            request_id: "req-1".to_string(),
            deadline_ms,
            invoked_function_arn: "arn:aws:lambda:us-east-1:000000000000:function:demo"
                .to_string(),
            trace_id: "Root=1-abc".to_string(),
            payload: json!({"x": 1}),
        }
    }

    #[test]
    fn test_fields_copied_from_invocation_and_config() {
        let context = Context::new(&test_invocation(1_000), &test_config());

        assert_eq!(context.aws_request_id, "req-1");
        assert_eq!(context.function_name, "demo");
        assert_eq!(context.memory_limit_in_mb, "128");
        assert_eq!(context.deadline_ms, 1_000);
    }

    #[test]
    fn test_remaining_time_strictly_decreases() {
        let deadline = chrono::Utc::now().timestamp_millis() + 30_000;
        let context = Context::new(&test_invocation(deadline), &test_config());

        let first = context.remaining_time_in_millis();
        std::thread::sleep(Duration::from_millis(20));
        let second = context.remaining_time_in_millis();

        assert!(second < first);
    }
}
