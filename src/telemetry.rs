use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, Registry, fmt::MakeWriter, layer::SubscriberExt};

use crate::error::BsError;

/// Bunyan JSON subscriber. `RUST_LOG` wins over `default_filter` when set.
pub fn get_subscriber<Sink>(
    name: String,
    default_filter: &str,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), BsError> {
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Non-blocking writer to a daily rolling file in `log_dir`, or to stdout.
/// Keep the guard alive for as long as logs should be flushed.
pub fn log_writer(log_dir: Option<&Path>, file_prefix: &str) -> (NonBlocking, WorkerGuard) {
    match log_dir {
        Some(dir) => tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_prefix)),
        None => tracing_appender::non_blocking(std::io::stdout()),
    }
}
