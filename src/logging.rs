use std::io;
use std::path::Path;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber: terse stderr output plus a daily rolling debug log.
///
/// `RUST_LOG` overrides the console filter. Safe to call once per process.
pub fn configure_logging(log_dir: &Path) {
    // Console stays quiet so rendered tables are readable
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,web_request=warn,query_cache=warn"));
    let console_log = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let file_appender = rolling::daily(log_dir, "smedash.log");
    let file_log = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::new("info,web_request=debug,query_cache=debug,reqwest=info"));

    tracing_subscriber::Registry::default()
        .with(console_log)
        .with(file_log)
        .init();
}
