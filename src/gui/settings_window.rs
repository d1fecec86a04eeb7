use crate::danmaku::config::{DisplayConfig, VerticalBand};
use crate::i18n::translate;
use crate::settings::Settings;
use eframe::egui;

const FONT_FAMILIES: &[&str] = &["Arial, sans-serif", "sans-serif", "monospace"];

/// Settings form. Every edit is handed back to the caller, which saves it.
#[derive(Default)]
pub struct SettingsWindow {
    pub open: bool,
    draft: Settings,
    last_error: Option<String>,
}

impl SettingsWindow {
    pub fn toggle(&mut self, current: &Settings) {
        self.open = !self.open;
        if self.open {
            self.draft = current.clone();
            self.last_error = None;
        }
    }

    /// Keep the form in sync with changes made outside the window.
    pub fn refresh(&mut self, current: &Settings) {
        self.draft = current.clone();
    }

    pub fn set_error(&mut self, err: Option<String>) {
        self.last_error = err;
    }

    /// Show the window. Returns the edited settings when anything changed.
    pub fn ui(&mut self, ctx: &egui::Context, lang: &str) -> Option<Settings> {
        if !self.open {
            return None;
        }
        let mut open = self.open;
        let mut changed = false;
        egui::Window::new(translate("settings_title", lang))
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .default_width(320.0)
            .show(ctx, |ui| {
                if let Some(err) = self.last_error.as_ref() {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.separator();
                }

                changed |= ui
                    .checkbox(&mut self.draft.enabled, translate("enable_danmaku", lang))
                    .changed();
                changed |= ui
                    .checkbox(&mut self.draft.hide_chat, translate("hide_chat", lang))
                    .changed();
                ui.separator();

                changed |= display_form(ui, &mut self.draft.display, lang);

                ui.separator();
                changed |= ui
                    .checkbox(&mut self.draft.debug_logging, translate("debug_logging", lang))
                    .changed();
                if ui.button(translate("reset", lang)).clicked() {
                    self.draft.display = DisplayConfig::default();
                    changed = true;
                }
            });
        self.open = open;
        if changed {
            self.draft.sanitize();
            Some(self.draft.clone())
        } else {
            None
        }
    }
}

fn display_form(ui: &mut egui::Ui, display: &mut DisplayConfig, lang: &str) -> bool {
    let mut changed = false;
    egui::Grid::new("danmaku_display_grid")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label(translate("font_family", lang));
            egui::ComboBox::from_id_source("danmaku_font_family")
                .selected_text(display.font_family.clone())
                .show_ui(ui, |ui| {
                    for family in FONT_FAMILIES {
                        changed |= ui
                            .selectable_value(&mut display.font_family, (*family).to_owned(), *family)
                            .changed();
                    }
                });
            ui.end_row();

            ui.label(translate("font_size", lang));
            changed |= ui
                .add(egui::Slider::new(&mut display.font_size, 8.0..=200.0).step_by(1.0))
                .changed();
            ui.end_row();

            ui.label(translate("font_size_random", lang));
            changed |= ui
                .add(egui::Slider::new(&mut display.font_size_random, 0.0..=1.0))
                .changed();
            ui.end_row();

            ui.label(translate("speed", lang));
            changed |= ui
                .add(egui::Slider::new(&mut display.speed, 0.1..=20.0).logarithmic(true))
                .changed();
            ui.end_row();

            ui.label(translate("opacity", lang));
            changed |= ui
                .add(egui::Slider::new(&mut display.opacity, 0.0..=1.0))
                .changed();
            ui.end_row();

            ui.label(translate("position", lang));
            egui::ComboBox::from_id_source("danmaku_vertical_band")
                .selected_text(band_label(display.vertical_band, lang))
                .show_ui(ui, |ui| {
                    for band in [VerticalBand::All, VerticalBand::TopHalf, VerticalBand::BottomHalf] {
                        changed |= ui
                            .selectable_value(&mut display.vertical_band, band, band_label(band, lang))
                            .changed();
                    }
                });
            ui.end_row();
        });
    changed
}

fn band_label(band: VerticalBand, lang: &str) -> String {
    let key = match band {
        VerticalBand::All => "position_all",
        VerticalBand::TopHalf => "position_top",
        VerticalBand::BottomHalf => "position_bottom",
    };
    translate(key, lang)
}
