pub mod chat_panel;
pub mod egui_host;
pub mod settings_window;

use crate::controller::OverlayController;
use crate::danmaku::host::SurfaceSize;
use crate::gui::egui_host::{host_rect, EguiCanvas, EguiHost, EguiMetrics};
use crate::gui::settings_window::SettingsWindow;
use crate::settings::Settings;
use crate::settings_sync::SettingsSync;
use eframe::egui;
use std::time::Instant;

/// Transparent click-through window that hosts the danmaku engine.
pub struct DanmakuOverlayApp {
    controller: OverlayController,
    sync: SettingsSync,
    host: EguiHost,
    settings_window: SettingsWindow,
    lang: &'static str,
    mouse_passthrough: Option<bool>,
    last_observed: Option<SurfaceSize>,
}

impl DanmakuOverlayApp {
    pub fn new(
        ctx: &egui::Context,
        controller: OverlayController,
        sync: SettingsSync,
        lang: &'static str,
    ) -> Self {
        let mut app = Self {
            controller,
            sync,
            host: EguiHost::new(ctx.clone()),
            settings_window: SettingsWindow::default(),
            lang,
            mouse_passthrough: None,
            last_observed: None,
        };
        let initial = app.sync.current().clone();
        app.controller.apply_settings(initial, Instant::now(), &mut app.host);
        app
    }

    fn apply(&mut self, settings: Settings, now: Instant) {
        self.settings_window.refresh(&settings);
        self.controller.apply_settings(settings, now, &mut self.host);
    }

    fn observe_player(&mut self, ctx: &egui::Context, now: Instant) {
        let rect = ctx.available_rect();
        let player = host_rect(rect);
        self.host.set_player(Some(player));

        let Some(mounted) = self.controller.surface().surface_size() else {
            self.last_observed = None;
            return;
        };
        let size = player.size();
        if size != mounted && self.last_observed != Some(size) {
            self.last_observed = Some(size);
            self.controller
                .surface_mut()
                .observe_resize(size, now, &mut self.host);
        }
    }

    fn draw_frames(&mut self, ctx: &egui::Context, now: Instant) {
        let frames = self.host.take_frames();
        if frames.is_empty() {
            return;
        }
        let rect = self
            .host
            .attached()
            .map(|r| {
                egui::Rect::from_min_size(egui::pos2(r.x, r.y), egui::vec2(r.width, r.height))
            })
            .unwrap_or_else(|| ctx.available_rect());
        let painter = ctx
            .layer_painter(egui::LayerId::new(
                egui::Order::Background,
                egui::Id::new("danmaku_surface"),
            ))
            .with_clip_rect(rect);
        let mut canvas = EguiCanvas::new(painter, rect);
        for token in frames {
            self.controller
                .surface_mut()
                .on_frame(token, now, Some(&mut canvas), &mut self.host);
        }
    }

    fn update_passthrough(&mut self, ctx: &egui::Context) {
        let wanted = !self.settings_window.open;
        if self.mouse_passthrough != Some(wanted) {
            ctx.send_viewport_cmd(egui::ViewportCommand::MousePassthrough(wanted));
            self.mouse_passthrough = Some(wanted);
        }
    }

    fn debug_hud(&self, ctx: &egui::Context) {
        let stats = self.controller.surface().stats();
        let lifecycle = self.controller.surface().lifecycle();
        egui::Area::new(egui::Id::new("danmaku_debug_hud"))
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(8.0, 8.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(egui::Color32::from_black_alpha(180))
                    .inner_margin(6.0)
                    .show(ui, |ui| {
                        let text = format!(
                            "{lifecycle:?}  live {}  lanes {}\nspawned {}  reaped {}  forced {}\nunlaned {}  dropped {}  recomputes {}\nframes {}  headless {}",
                            stats.live_items,
                            stats.lanes,
                            stats.spawned,
                            stats.reaped,
                            stats.forced_allocations,
                            stats.unlaned_spawns,
                            stats.dropped_intake,
                            stats.lane_recomputes,
                            stats.frames,
                            stats.frames_without_surface,
                        );
                        ui.label(
                            egui::RichText::new(text)
                                .monospace()
                                .color(egui::Color32::LIGHT_GREEN),
                        );
                    });
            });
    }
}

impl eframe::App for DanmakuOverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        if let Some(settings) = self.sync.poll() {
            self.apply(settings, now);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::F2)) {
            let current = self.controller.settings().clone();
            self.settings_window.toggle(&current);
        }

        let chat_width = self.controller.settings().chat_panel_width;
        self.controller.chat_panel().ui(ctx, chat_width, self.lang);

        self.observe_player(ctx, now);
        let metrics = EguiMetrics::new(ctx);
        self.controller.pump_relay_messages(&metrics);
        self.controller.surface_mut().tick(now, &mut self.host);
        self.draw_frames(ctx, now);

        if let Some(edited) = self.settings_window.ui(ctx, self.lang) {
            match self.sync.save(edited.clone()) {
                Ok(()) => self.settings_window.set_error(None),
                Err(err) => {
                    tracing::warn!("failed to save settings: {err:#}");
                    self.settings_window.set_error(Some(format!("{err:#}")));
                }
            }
            self.controller.apply_settings(edited, now, &mut self.host);
        }

        if self.controller.settings().debug_logging {
            self.debug_hud(ctx);
        }
        self.update_passthrough(ctx);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.shutdown(&mut self.host);
    }
}
