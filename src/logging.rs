use std::io;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const TERMINAL_FILTER: &str = "warn,itihas=info,web_request=warn,result_cache=warn";
const FILE_FILTER: &str = "info,web_request=debug,result_cache=debug,hyper=info,reqwest=info";

/// Sets up stderr logging (overridable with `RUST_LOG`) plus a daily rolling
/// file under `logs/`.
///
/// Terminal output goes to stderr so `--json` output on stdout stays clean.
pub fn configure_logging() {
    let terminal_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(TERMINAL_FILTER));
    let terminal_log = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(terminal_filter);

    let file_appender = rolling::daily("logs", "itihas.log");
    let file_log = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::new(FILE_FILTER));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::Registry::default()
        .with(terminal_log)
        .with(file_log)
        .try_init();
}
