//! Console plus daily-rolling file logging.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `config.default_filter`. When a file prefix is set,
/// events are also written without ANSI colors to `<dir>/<prefix>.<date>`,
/// rolled daily. The returned guard flushes the file writer on drop and must
/// be held for the life of the process.
///
/// A second call leaves the first subscriber in place.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let (file_layer, guard) = match &config.file_prefix {
        Some(prefix) => {
            let appender = tracing_appender::rolling::daily(&config.dir, prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let if_installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .is_ok();
    if !if_installed {
        tracing::debug!("Global subscriber already installed; keeping it");
    }

    guard
}
