//! Runlet - Custom serverless execution host
//!
//! Polls the control plane for invocations, dispatches each to the
//! configured handler, and reports outcomes. Initialization failures are
//! reported to the control plane once, then the process exits non-zero;
//! the processing loop itself never exits voluntarily.

mod handlers;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use runlet_runtime::{Runtime, RuntimeApiClient, RuntimeConfig};

#[derive(Parser, Debug)]
#[command(name = "runlet")]
#[command(about = "Custom serverless execution host", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUNLET_LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("runlet={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RuntimeConfig::from_env()?;
    info!(endpoint = %config.endpoint, "starting runlet");

    let registry = handlers::builtin_registry();

    let runtime = match Runtime::initialize(config.clone(), &registry) {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, error_type = err.error_type(), "initialization failed");

            // Best effort: the process exits 1 whether or not the control
            // plane hears about it.
            let client = RuntimeApiClient::new(config.base_url());
            if let Err(report_err) = client.report_init_error(&err.descriptor()).await {
                warn!(error = %report_err, "failed to report initialization error");
            }

            std::process::exit(1);
        }
    };

    // The loop has no normal exit.
    match runtime.run().await {}
}
