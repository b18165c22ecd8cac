use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::config::{Logging, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the configured filter directives when set.
pub fn init(config: &Logging) -> Result<(), TracingInitError> {
    let filter = make_env_filter(config);
    let console = match config.style {
        LoggingStyle::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LoggingStyle::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
        LoggingStyle::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    let registry = Registry::default()
        .with(console.with_filter(filter))
        .with(tracing_error::ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    Ok(())
}

fn make_env_filter(config: &Logging) -> EnvFilter {
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    EnvFilter::builder().parse_lossy(directives)
}
