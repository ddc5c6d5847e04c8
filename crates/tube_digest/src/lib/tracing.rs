use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Installs the global subscriber: bunyan JSON lines on stdout, filtered by
/// `RUST_LOG` (default `info`), with error events forwarded to sentry.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let formatting_layer = BunyanFormattingLayer::new(env!("CARGO_PKG_NAME").into(), std::io::stdout);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .with(sentry_tracing::layer());

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
