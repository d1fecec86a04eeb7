use crate::chat_watch::ChatFeed;
use crate::danmaku::host::{OverlayHost, TextMetrics};
use crate::danmaku::surface::SurfaceManager;
use crate::gui::chat_panel::ChatPanel;
use crate::relay::RelayToOverlay;
use crate::settings::Settings;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;

/// Glue between settings, the relay and the danmaku engine.
///
/// Holds no window-system state, so it can be driven by tests with fake
/// hosts.
pub struct OverlayController<R = StdRng> {
    relay_rx: Receiver<RelayToOverlay>,
    surface: SurfaceManager<R>,
    settings: Settings,
    chat_panel: ChatPanel,
    chat_feed: Option<ChatFeed>,
    relay_connected: bool,
}

impl OverlayController<StdRng> {
    pub fn new(relay_rx: Receiver<RelayToOverlay>, settings: Settings) -> Self {
        let surface = SurfaceManager::new(Arc::new(settings.display.clone()));
        Self::with_surface(relay_rx, settings, surface)
    }
}

impl<R: Rng> OverlayController<R> {
    pub fn with_surface(
        relay_rx: Receiver<RelayToOverlay>,
        settings: Settings,
        surface: SurfaceManager<R>,
    ) -> Self {
        let mut chat_panel = ChatPanel::default();
        chat_panel.set_hidden(settings.chat_panel_hidden());
        Self {
            relay_rx,
            surface,
            settings,
            chat_panel,
            chat_feed: None,
            relay_connected: true,
        }
    }

    pub fn with_chat_feed(mut self, feed: ChatFeed) -> Self {
        self.chat_feed = Some(feed);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn surface(&self) -> &SurfaceManager<R> {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut SurfaceManager<R> {
        &mut self.surface
    }

    pub fn chat_panel(&self) -> &ChatPanel {
        &self.chat_panel
    }

    pub fn chat_feed(&self) -> Option<&ChatFeed> {
        self.chat_feed.as_ref()
    }

    pub fn relay_connected(&self) -> bool {
        self.relay_connected
    }

    /// Bring the engine and the chat feed in line with `settings`.
    pub fn apply_settings(&mut self, settings: Settings, now: Instant, host: &mut dyn OverlayHost) {
        if settings.display != **self.surface.config() {
            self.surface
                .update_config(Arc::new(settings.display.clone()));
        }

        if settings.enabled {
            self.surface.start(now, host);
        } else {
            self.surface.stop(host);
        }

        if let Some(feed) = self.chat_feed.as_mut() {
            if settings.chat_log() != self.settings.chat_log() {
                if let Err(err) = feed.set_path(settings.chat_log()) {
                    tracing::warn!("failed to switch chat log: {err:#}");
                }
            }
            if let Err(err) = feed.set_enabled(settings.enabled) {
                tracing::warn!("failed to toggle chat watcher: {err:#}");
            }
        }

        self.chat_panel.set_hidden(settings.chat_panel_hidden());
        self.settings = settings;
    }

    /// Drain every pending relay message. Returns how many lines arrived.
    pub fn pump_relay_messages(&mut self, metrics: &dyn TextMetrics) -> usize {
        let mut received = 0;
        loop {
            match self.relay_rx.try_recv() {
                Ok(RelayToOverlay::AddDanmaku { text }) => {
                    received += 1;
                    self.chat_panel.push(&text);
                    self.surface.add_danmaku(&text, metrics);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.relay_connected {
                        tracing::warn!("relay disconnected; no more chat will arrive");
                    }
                    self.relay_connected = false;
                    break;
                }
            }
        }
        received
    }

    pub fn shutdown(&mut self, host: &mut dyn OverlayHost) {
        self.surface.stop(host);
        if let Some(feed) = self.chat_feed.as_mut() {
            if let Err(err) = feed.set_enabled(false) {
                tracing::warn!("failed to stop chat watcher: {err:#}");
            }
        }
    }
}
