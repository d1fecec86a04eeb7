use crate::danmaku::config::DisplayConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "danmaku_settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Master switch. Turning it off stops both the renderer and the chat
    /// watcher.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Hide the chat side panel while the overlay is enabled.
    #[serde(default)]
    pub hide_chat: bool,
    /// When enabled the application initialises the logger at debug level
    /// and shows the stats HUD.
    #[serde(default, alias = "debug_mode")]
    pub debug_logging: bool,
    /// Optional log file. Logs go to stderr when unset.
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Chat log to tail for new lines. The first command line argument
    /// overrides it.
    #[serde(default)]
    pub chat_log_path: Option<String>,
    /// Position of the overlay window. If absent the window manager decides.
    #[serde(default)]
    pub overlay_pos: Option<(f32, f32)>,
    #[serde(default = "default_overlay_size")]
    pub overlay_size: (f32, f32),
    #[serde(default = "default_chat_panel_width")]
    pub chat_panel_width: f32,
}

fn default_enabled() -> bool {
    true
}

fn default_overlay_size() -> (f32, f32) {
    (1280.0, 720.0)
}

fn default_chat_panel_width() -> f32 {
    280.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            hide_chat: false,
            debug_logging: false,
            log_file: None,
            display: DisplayConfig::default(),
            chat_log_path: None,
            overlay_pos: None,
            overlay_size: default_overlay_size(),
            chat_panel_width: default_chat_panel_width(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing or empty file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("deserialize settings file {}", path.display()))?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create settings parent folder {}", parent.display()))?;
        }
        let mut sanitized = self.clone();
        sanitized.sanitize();
        let json = serde_json::to_string_pretty(&sanitized).context("serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("write settings file {}", path.display()))
    }

    pub fn sanitize(&mut self) {
        self.display.sanitize();
        if !(self.overlay_size.0 > 0.0 && self.overlay_size.1 > 0.0) {
            self.overlay_size = default_overlay_size();
        }
        if !self.chat_panel_width.is_finite() || self.chat_panel_width < 120.0 {
            self.chat_panel_width = default_chat_panel_width();
        }
    }

    /// The chat panel is hidden only while the overlay is on and the user
    /// asked for it.
    pub fn chat_panel_hidden(&self) -> bool {
        self.enabled && self.hide_chat
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn chat_log(&self) -> Option<PathBuf> {
        self.chat_log_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }
}

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}
