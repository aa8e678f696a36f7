// Logger initialization

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const SERVER_LOG_FILTER: &str = "docsum=debug,tower_http=debug,axum=debug";
pub const CLIENT_LOG_FILTER: &str = "docsum=warn";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `default_filter`. With `log_dir` set, output also goes
/// to a daily rolling file; keep the returned guard alive until exit or
/// buffered lines are lost.
pub fn init_logger(default_filter: &str, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "docsum.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
            None
        }
    }
}
