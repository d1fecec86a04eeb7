//! Keeps the in-memory settings in step with the settings file.
//!
//! The file is the single source of truth. Edits made from the settings
//! window are written back to it; edits made by hand are picked up by the
//! watcher and handed to the UI thread through [`SettingsSync::poll`].

use crate::common::json_watch::{watch_json, JsonWatcher};
use crate::settings::Settings;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct SettingsSync {
    path: PathBuf,
    current: Settings,
    dirty: Arc<AtomicBool>,
    #[allow(dead_code)]
    watcher: Option<JsonWatcher>,
}

impl SettingsSync {
    /// Load the file (defaults when missing) and start watching it.
    pub fn start(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("using default settings: {err:#}");
                Settings::default()
            }
        };
        let dirty = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&dirty);
        let watcher = watch_json(&path, move || flag.store(true, Ordering::SeqCst))
            .map_err(|err| tracing::warn!("settings file will not be watched: {err}"))
            .ok();
        Ok(Self {
            path,
            current,
            dirty,
            watcher,
        })
    }

    /// Sync without a watcher. `poll` only reports changes made through
    /// [`SettingsSync::mark_dirty`].
    pub fn detached(path: impl Into<PathBuf>, current: Settings) -> Self {
        Self {
            path: path.into(),
            current,
            dirty: Arc::new(AtomicBool::new(false)),
            watcher: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> &Settings {
        &self.current
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Reload the file if it changed. Returns the new settings only when
    /// they differ from the current snapshot. A malformed file keeps the
    /// last good snapshot.
    pub fn poll(&mut self) -> Option<Settings> {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return None;
        }
        match Settings::load(&self.path) {
            Ok(settings) if settings != self.current => {
                tracing::info!("settings file changed");
                self.current = settings.clone();
                Some(settings)
            }
            Ok(_) => None,
            Err(err) => {
                tracing::warn!("ignoring malformed settings file: {err:#}");
                None
            }
        }
    }

    /// Persist `settings` and make them the current snapshot.
    pub fn save(&mut self, settings: Settings) -> Result<()> {
        settings
            .save(&self.path)
            .with_context(|| format!("save settings to {}", self.path.display()))?;
        self.current = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SettingsSync;
    use crate::settings::Settings;

    #[test]
    fn malformed_file_keeps_last_good_snapshot() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        let mut sync = SettingsSync::detached(&path, Settings::default());

        let mut edited = Settings::default();
        edited.hide_chat = true;
        edited.save(&path).expect("save");
        sync.mark_dirty();
        assert_eq!(sync.poll(), Some(edited.clone()));

        std::fs::write(&path, "{ not json").expect("write");
        sync.mark_dirty();
        assert_eq!(sync.poll(), None);
        assert_eq!(sync.current(), &edited);
    }

    #[test]
    fn unchanged_reload_is_not_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        let mut sync = SettingsSync::detached(&path, Settings::default());
        sync.save(Settings::default()).expect("save");
        sync.mark_dirty();
        assert_eq!(sync.poll(), None);
    }
}
