use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Keeps the polling thread alive. Dropping it stops the watch.
pub struct JsonWatcher {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl JsonWatcher {
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("json watcher thread panicked");
            }
        }
    }
}

impl Drop for JsonWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

fn stamp(path: &Path) -> Option<FileStamp> {
    let metadata = std::fs::metadata(path).ok()?;
    Some(FileStamp {
        modified: metadata.modified().ok(),
        len: metadata.len(),
    })
}

/// Call `callback` whenever the file at `path` is created, removed or
/// rewritten.
pub fn watch_json<F, P>(path: P, callback: F) -> io::Result<JsonWatcher>
where
    F: FnMut() + Send + 'static,
    P: AsRef<Path>,
{
    watch_json_with_interval(path, DEFAULT_POLL_INTERVAL, callback)
}

pub fn watch_json_with_interval<F, P>(
    path: P,
    interval: Duration,
    mut callback: F,
) -> io::Result<JsonWatcher>
where
    F: FnMut() + Send + 'static,
    P: AsRef<Path>,
{
    let path: PathBuf = path.as_ref().to_path_buf();
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = Arc::clone(&stop);
    let thread = thread::Builder::new()
        .name("json-watch".to_string())
        .spawn(move || {
            let mut last = stamp(&path);
            while !thread_stop.load(Ordering::SeqCst) {
                thread::sleep(interval);
                let current = stamp(&path);
                if current != last {
                    last = current;
                    tracing::debug!(path = %path.display(), "watched file changed");
                    callback();
                }
            }
        })?;
    Ok(JsonWatcher {
        stop,
        thread: Some(thread),
    })
}

#[cfg(test)]
mod tests {
    use super::watch_json_with_interval;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    #[test]
    fn callback_runs_when_file_appears() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("watched.json");
        let (tx, rx) = channel();
        let _watcher = watch_json_with_interval(&path, Duration::from_millis(10), move || {
            let _ = tx.send(());
        })
        .expect("watch");

        std::fs::write(&path, "{}").expect("write");
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }
}
