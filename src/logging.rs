// ── Logging ───────────────────────────────────────────────────────────────────
//
// The terminal host owns stdout, so tracing output goes to
// `<config dir>/spacemark.log` through a non-blocking writer.  Logging is
// best-effort: any failure here leaves the editor running without a log.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE: &str = "spacemark.log";

/// Build the filter: `SPACEMARK_LOG`, then `RUST_LOG`, then `default`.
fn env_filter(default: &str) -> EnvFilter {
    ["SPACEMARK_LOG", "RUST_LOG"]
        .iter()
        .find_map(|var| {
            let value = std::env::var(var).ok()?;
            EnvFilter::try_new(value).ok()
        })
        .or_else(|| EnvFilter::try_new(default).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the global subscriber writing into `dir`.
///
/// The returned guard flushes buffered lines when dropped; keep it alive for
/// the lifetime of `main`.
pub(crate) fn init(dir: Option<&Path>, default_level: &str) -> Option<WorkerGuard> {
    let dir = dir?;
    std::fs::create_dir_all(dir).ok()?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .ok()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %dir.join(LOG_FILE).display(),
        "spacemark logging initialized"
    );
    Some(guard)
}
