//! File-only tracing setup. The terminal belongs to the UI, so nothing is
//! logged unless a log file is configured.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Environment variable naming a log file when `--log-file` is absent.
pub const LOG_FILE_ENV: &str = "C3_LOG_FILE";

/// `--log-file` wins over `$C3_LOG_FILE`.
pub fn log_path(cli: Option<&Path>) -> Option<PathBuf> {
    cli.map(Path::to_path_buf)
        .or_else(|| std::env::var_os(LOG_FILE_ENV).map(PathBuf::from))
        .filter(|p| !p.as_os_str().is_empty())
}

/// Install the global subscriber writing to `path`, filtered by `RUST_LOG`
/// (default `info`). Without a path this is a no-op.
pub fn init(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "c3 starting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_path_wins() {
        let p = log_path(Some(Path::new("/tmp/c3.log")));
        assert_eq!(p, Some(PathBuf::from("/tmp/c3.log")));
    }

    #[test]
    fn empty_path_means_no_log() {
        assert_eq!(log_path(Some(Path::new(""))), None);
    }

    #[test]
    fn init_without_path_is_noop() {
        assert!(init(None).is_ok());
    }
}
