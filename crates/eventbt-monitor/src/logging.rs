//! Logging setup.

use std::ffi::OsStr;
use std::path::Path;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use tracing_appender::non_blocking::WorkerGuard;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Console output goes to stderr so
/// reports written to stdout stay machine readable. When `file` is given, a
/// plain-text copy of every event is appended to it through a non-blocking
/// writer; the returned guard must be held until exit or buffered lines are
/// lost.
pub fn setup_logging(
    level: &str,
    json: bool,
    file: Option<&Path>,
) -> Result<Option<WorkerGuard>, TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path.file_name().unwrap_or_else(|| OsStr::new("eventbt.log"));
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_file_layer_receives_events() {
        let dir = std::env::temp_dir().join(format!("eventbt-log-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.log");

        let guard = setup_logging("info", false, Some(&path)).unwrap();
        tracing::info!(steps = 3, "backtest complete");
        drop(guard);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("backtest complete"));

        // A second subscriber cannot be installed
        assert!(setup_logging("info", false, None).is_err());

        fs::remove_dir_all(&dir).ok();
    }
}
