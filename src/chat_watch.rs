use crate::relay::{ChatToRelay, RelayHandle};
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const RECONNECT_INTERVAL: Duration = Duration::from_millis(2000);
pub const READ_INTERVAL: Duration = Duration::from_millis(250);

/// Follows a chat log file and yields every complete line appended to it.
///
/// Content present when the file is first found is skipped. If the file
/// shrinks it is read again from the start; if it disappears the tail waits
/// for it to come back.
pub struct ChatTail {
    path: PathBuf,
    file: Option<File>,
    offset: u64,
    partial: Vec<u8>,
}

impl ChatTail {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            offset: 0,
            partial: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.file.is_some()
    }

    /// (Re)connect to the chat file. Returns `true` when a new connection
    /// was made.
    pub fn scan(&mut self) -> Result<bool> {
        let metadata = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(_) => {
                if self.file.take().is_some() {
                    tracing::info!(path = %self.path.display(), "chat log disappeared");
                }
                return Ok(false);
            }
        };

        if self.file.is_some() {
            if metadata.len() < self.offset {
                tracing::info!(path = %self.path.display(), "chat log truncated, rereading");
                self.offset = 0;
                self.partial.clear();
            }
            return Ok(false);
        }

        let file = File::open(&self.path)
            .with_context(|| format!("open chat log {}", self.path.display()))?;
        self.offset = metadata.len();
        self.partial.clear();
        self.file = Some(file);
        tracing::info!(path = %self.path.display(), "connected to chat log");
        Ok(true)
    }

    /// Read whatever was appended since the last call and return the
    /// trimmed, non-empty complete lines.
    pub fn read_new_lines(&mut self) -> Result<Vec<String>> {
        let Some(file) = self.file.as_mut() else {
            return Ok(Vec::new());
        };
        file.seek(SeekFrom::Start(self.offset))
            .with_context(|| format!("seek chat log {}", self.path.display()))?;
        let mut buf = Vec::new();
        let read = file
            .read_to_end(&mut buf)
            .with_context(|| format!("read chat log {}", self.path.display()))?;
        self.offset += read as u64;
        self.partial.extend_from_slice(&buf);

        let mut lines = Vec::new();
        while let Some(pos) = self.partial.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.partial.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_owned());
            }
        }
        Ok(lines)
    }
}

/// Background thread that forwards new chat lines to the relay.
pub struct ChatWatcher {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ChatWatcher {
    pub fn start(path: impl Into<PathBuf>, relay: RelayHandle) -> Result<Self> {
        Self::with_intervals(path, relay, RECONNECT_INTERVAL, READ_INTERVAL)
    }

    pub fn with_intervals(
        path: impl Into<PathBuf>,
        relay: RelayHandle,
        reconnect_interval: Duration,
        read_interval: Duration,
    ) -> Result<Self> {
        let mut tail = ChatTail::new(path);
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        tracing::info!(path = %tail.path().display(), "chat watcher starting");
        let thread = thread::Builder::new()
            .name("chat-watch".to_string())
            .spawn(move || {
                let mut next_scan = Instant::now();
                while !thread_stop.load(Ordering::SeqCst) {
                    let now = Instant::now();
                    if now >= next_scan {
                        if let Err(err) = tail.scan() {
                            tracing::warn!("chat log scan failed: {err:#}");
                        }
                        next_scan = now + reconnect_interval;
                    }
                    match tail.read_new_lines() {
                        Ok(lines) => {
                            for text in lines {
                                relay.send(ChatToRelay::NewMessageData { text });
                            }
                        }
                        Err(err) => tracing::warn!("chat log read failed: {err:#}"),
                    }
                    thread::sleep(read_interval);
                }
            })
            .map_err(|err| anyhow!("failed to spawn chat watcher thread: {err}"))?;
        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        self.stop.store(true, Ordering::SeqCst);
        if thread.join().is_err() {
            tracing::error!("chat watcher thread panicked");
        }
        tracing::info!("chat watcher stopped");
    }
}

impl Drop for ChatWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Owns the optional chat watcher and follows the global enable switch.
pub struct ChatFeed {
    path: Option<PathBuf>,
    relay: RelayHandle,
    watcher: Option<ChatWatcher>,
}

impl ChatFeed {
    pub fn new(path: Option<PathBuf>, relay: RelayHandle) -> Self {
        Self {
            path,
            relay,
            watcher: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.as_ref().is_some_and(ChatWatcher::is_running)
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        if !enabled {
            if let Some(mut watcher) = self.watcher.take() {
                watcher.stop();
            }
            return Ok(());
        }
        if self.is_watching() {
            return Ok(());
        }
        let Some(path) = self.path.clone() else {
            tracing::debug!("no chat log configured");
            return Ok(());
        };
        self.watcher = Some(ChatWatcher::start(path, self.relay.clone())?);
        Ok(())
    }

    /// Point the feed at another file, restarting the watcher if it runs.
    pub fn set_path(&mut self, path: Option<PathBuf>) -> Result<()> {
        if self.path == path {
            return Ok(());
        }
        let was_watching = self.is_watching();
        self.set_enabled(false)?;
        self.path = path;
        self.set_enabled(was_watching)
    }
}
