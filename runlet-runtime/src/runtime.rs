//! The invocation processing loop
//!
//! Two phases: a one-shot cold start that resolves the configured handler,
//! then an unbounded sequential loop of fetch, invoke, report. Exactly one
//! invocation is in flight at any time; the loop never fetches again before
//! the previous outcome has been reported.

use std::convert::Infallible;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::client::{Invocation, RuntimeApiClient};
use crate::config::RuntimeConfig;
use crate::context::Context;
use crate::error::InitError;
use crate::handler::{Handler, HandlerRegistry};

/// The execution host
pub struct Runtime {
    client: RuntimeApiClient,
    config: RuntimeConfig,
    handler: Arc<dyn Handler>,
}

impl Runtime {
    /// Cold start: resolve the configured handler, exactly once per process.
    ///
    /// Every failure here is fatal. The caller is expected to report it via
    /// [`RuntimeApiClient::report_init_error`] and exit non-zero; resolution
    /// is never retried since configuration cannot change within a process
    /// lifetime.
    pub fn initialize(
        config: RuntimeConfig,
        registry: &HandlerRegistry,
    ) -> Result<Self, InitError> {
        info!("initializing runtime");

        let identifier = config.handler.as_deref().ok_or(InitError::MissingHandler)?;
        let handler = registry.resolve(identifier)?;

        info!(handler = %identifier, "initialization complete");

        Ok(Self {
            client: RuntimeApiClient::new(config.base_url()),
            config,
            handler,
        })
    }

    /// Run the processing loop. Never returns; only process-level
    /// termination by the platform ends it.
    pub async fn run(&self) -> Infallible {
        loop {
            debug!("waiting for next invocation");

            // A failed fetch is not fatal: log it and poll again. The
            // platform owns host health, not us.
            let invocation = match self.client.next_invocation().await {
                Ok(invocation) => invocation,
                Err(err) => {
                    warn!(error = %err, "failed to fetch next invocation");
                    continue;
                }
            };

            self.process(invocation).await;
        }
    }

    /// Run one invocation end-to-end: build the context, call the handler,
    /// report the outcome. A handler failure is reported and isolated to
    /// this one unit of work.
    async fn process(&self, invocation: Invocation) {
        let context = Context::new(&invocation, &self.config);
        let request_id = invocation.request_id;

        info!(request_id = %request_id, "invoking handler");

        match self.handler.invoke(invocation.payload, context).await {
            Ok(response) => {
                debug!(
                    request_id = %request_id,
                    has_response = response.is_some(),
                    "handler complete"
                );

                if let Err(err) = self
                    .client
                    .report_invocation_response(&request_id, response.as_ref())
                    .await
                {
                    warn!(request_id = %request_id, error = %err, "failed to report response");
                }
            }
            Err(handler_err) => {
                error!(request_id = %request_id, error = %handler_err, "handler failed");

                let descriptor = handler_err.descriptor();
                if let Err(err) = self
                    .client
                    .report_invocation_error(&request_id, &descriptor)
                    .await
                {
                    warn!(request_id = %request_id, error = %err, "failed to report error");
                }
            }
        }
    }
}
