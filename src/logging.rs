//! File logging for the command line tool

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding `tracing` filter directives
pub const LOG_ENV: &str = "RELEASE_VERSIONS_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

/// Install a global subscriber writing to `log_path`
///
/// The returned guard flushes buffered lines when dropped, so keep it alive
/// for the lifetime of the process.
pub fn init(log_path: &Path) -> anyhow::Result<WorkerGuard> {
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log path {:?} has no file name", log_path))?;

    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(std::env::var(LOG_ENV).ok()))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(anyhow::Error::msg)?;

    Ok(guard)
}

fn build_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
