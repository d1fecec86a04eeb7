use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILE_NAME: &str = "chat_danmaku.log";

/// Initialise logging.
///
/// Without `debug` the level is pinned to `info` even if `RUST_LOG` is set.
/// With `debug` the level is `debug` unless `RUST_LOG` says otherwise.
/// When `log_file` is given the output goes to that file instead of stderr.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    let level = if debug { "debug" } else { "info" };
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match log_file {
        Some(path) => {
            let (dir, name) = split_log_path(&path);
            if let Err(err) = std::fs::create_dir_all(&dir) {
                eprintln!("cannot create log directory {}: {err}", dir.display());
            }
            let appender = tracing_appender::rolling::never(dir, name);
            builder.with_writer(appender).with_ansi(false).try_init()
        }
        None => builder.try_init(),
    };
    if result.is_err() {
        tracing::debug!("logger already initialised");
    }
}

fn split_log_path(path: &Path) -> (PathBuf, PathBuf) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_NAME));
    (dir, name)
}

#[cfg(test)]
mod tests {
    use super::split_log_path;
    use std::path::{Path, PathBuf};

    #[test]
    fn bare_file_name_logs_to_working_directory() {
        let (dir, name) = split_log_path(Path::new("overlay.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, PathBuf::from("overlay.log"));
    }
}
