//! Host configuration
//!
//! All ambient environment reads happen here, once, at startup. Every other
//! component receives a `RuntimeConfig` by reference and never touches the
//! process environment itself.

use std::env;
use thiserror::Error;

/// Control-plane endpoint (`host:port`), set by the platform.
pub const RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";
/// Handler identifier of the form `module.method`.
pub const HANDLER_ENV: &str = "LOCAL_HANDLER";

const FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";
const FUNCTION_VERSION_ENV: &str = "AWS_LAMBDA_FUNCTION_VERSION";
const MEMORY_SIZE_ENV: &str = "AWS_LAMBDA_FUNCTION_MEMORY_SIZE";
const LOG_GROUP_ENV: &str = "AWS_LAMBDA_LOG_GROUP_NAME";
const LOG_STREAM_ENV: &str = "AWS_LAMBDA_LOG_STREAM_NAME";

/// Protocol version prefix on every control-plane path.
const API_VERSION: &str = "2018-06-01";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("control-plane endpoint not defined in environment variable {0}")]
    MissingEndpoint(&'static str),
}

/// Snapshot of the host environment, captured once at startup.
///
/// The descriptive fields (function name, version, memory size, log group
/// and stream) are copied verbatim with no validation; an absent variable
/// propagates as an empty string, matching what the platform guarantees to
/// provide.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Control-plane address, `host:port`.
    pub endpoint: String,
    /// Raw handler identifier. `None` is fatal at initialization, not here.
    pub handler: Option<String>,
    pub function_name: String,
    pub function_version: String,
    pub memory_limit_in_mb: String,
    pub log_group_name: String,
    pub log_stream_name: String,
}

impl RuntimeConfig {
    /// Capture configuration from the process environment.
    ///
    /// Only the control-plane endpoint is required; without it there is
    /// nothing to report errors to, so this fails before any network
    /// activity.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = env::var(RUNTIME_API_ENV)
            .map_err(|_| ConfigError::MissingEndpoint(RUNTIME_API_ENV))?;

        Ok(Self {
            endpoint,
            handler: env::var(HANDLER_ENV).ok(),
            function_name: env::var(FUNCTION_NAME_ENV).unwrap_or_default(),
            function_version: env::var(FUNCTION_VERSION_ENV).unwrap_or_default(),
            memory_limit_in_mb: env::var(MEMORY_SIZE_ENV).unwrap_or_default(),
            log_group_name: env::var(LOG_GROUP_ENV).unwrap_or_default(),
            log_stream_name: env::var(LOG_STREAM_ENV).unwrap_or_default(),
        })
    }

    /// Base URL for all control-plane requests.
    pub fn base_url(&self) -> String {
        format!("http://{}/{}/runtime", self.endpoint, API_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        let config = RuntimeConfig {
            endpoint: "127.0.0.1:9001".to_string(),
            handler: Some("handler.process".to_string()),
            function_name: "demo".to_string(),
            function_version: "$LATEST".to_string(),
            memory_limit_in_mb: "128".to_string(),
            log_group_name: String::new(),
            log_stream_name: String::new(),
        };

        assert_eq!(
            config.base_url(),
            "http://127.0.0.1:9001/2018-06-01/runtime"
        );
    }

    // Environment mutation is process-global, so the from_env cases run as
    // one sequential test.
    #[test]
    fn test_from_env() {
        env::remove_var(RUNTIME_API_ENV);
        assert!(matches!(
            RuntimeConfig::from_env(),
            Err(ConfigError::MissingEndpoint(_))
        ));

        env::set_var(RUNTIME_API_ENV, "localhost:9001");
        env::set_var(HANDLER_ENV, "handler.process");
        env::set_var("AWS_LAMBDA_FUNCTION_NAME", "demo");
        env::remove_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE");

        let config = RuntimeConfig::from_env().unwrap();
        assert_eq!(config.endpoint, "localhost:9001");
        assert_eq!(config.handler.as_deref(), Some("handler.process"));
        assert_eq!(config.function_name, "demo");
        // Absent variables propagate as empty, never as errors.
        assert_eq!(config.memory_limit_in_mb, "");

        env::remove_var(RUNTIME_API_ENV);
        env::remove_var(HANDLER_ENV);
        env::remove_var("AWS_LAMBDA_FUNCTION_NAME");
    }
}
