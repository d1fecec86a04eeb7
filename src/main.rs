use anyhow::{anyhow, Result};
use chat_danmaku::chat_watch::ChatFeed;
use chat_danmaku::controller::OverlayController;
use chat_danmaku::gui::DanmakuOverlayApp;
use chat_danmaku::relay::Relay;
use chat_danmaku::settings::resolve_settings_path;
use chat_danmaku::settings_sync::SettingsSync;
use chat_danmaku::{i18n, logging};
use eframe::egui;
use std::path::PathBuf;

fn main() -> Result<()> {
    let settings_path = resolve_settings_path()?;
    let sync = SettingsSync::start(&settings_path)?;
    let settings = sync.current().clone();
    logging::init(settings.debug_logging, settings.log_file_path());
    tracing::info!(path = %settings_path.display(), "settings loaded");

    let relay = Relay::spawn()?;
    let overlay_rx = relay.subscribe();
    let chat_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.chat_log());
    if chat_path.is_none() {
        tracing::warn!("no chat log given; pass a path or set chat_log_path");
    }
    let feed = ChatFeed::new(chat_path, relay.handle());
    let controller = OverlayController::new(overlay_rx, settings.clone()).with_chat_feed(feed);
    let lang = i18n::system_language();

    let mut viewport = egui::ViewportBuilder::default()
        .with_title("Chat Danmaku")
        .with_inner_size([settings.overlay_size.0, settings.overlay_size.1])
        .with_transparent(true)
        .with_decorations(false)
        .with_always_on_top()
        .with_mouse_passthrough(true);
    if let Some((x, y)) = settings.overlay_pos {
        viewport = viewport.with_position([x, y]);
    }
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let result = eframe::run_native(
        "Chat Danmaku",
        native_options,
        Box::new(move |cc| {
            Box::new(DanmakuOverlayApp::new(&cc.egui_ctx, controller, sync, lang))
        }),
    );
    relay.shutdown();
    result.map_err(|err| anyhow!("overlay window failed: {err}"))
}
