use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Install a global tracing subscriber for chain logging.
///
/// `RUST_LOG` wins over `log_level` when set. Calling this a second time
/// leaves the first subscriber in place and only logs a warning.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().compact())
            .with(filter)
            .try_init()
    };

    match installed {
        Ok(()) => tracing::info!(json = config.json, "chainstate telemetry initialized"),
        Err(e) => tracing::warn!("Telemetry already initialized: {}", e),
    }
    Ok(())
}

/// Generate an identifier linking all log lines of one chain run
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span carrying the chain's run id and the state it starts from
pub fn create_chain_span(operation: &str, run_id: &str, state: &str) -> tracing::Span {
    tracing::info_span!(
        "chain",
        operation = operation,
        run.id = run_id,
        state = state,
    )
}
