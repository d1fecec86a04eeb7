use crate::i18n::translate;
use chrono::{DateTime, Local};
use eframe::egui;
use std::collections::VecDeque;

pub const MAX_CHAT_LINES: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub timestamp: String,
    pub text: String,
}

/// Recent chat lines shown beside the overlay.
#[derive(Debug)]
pub struct ChatPanel {
    lines: VecDeque<ChatLine>,
    hidden: bool,
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self {
            lines: VecDeque::with_capacity(MAX_CHAT_LINES),
            hidden: false,
        }
    }
}

impl ChatPanel {
    pub fn push(&mut self, text: &str) {
        self.push_at(text, Local::now());
    }

    pub fn push_at(&mut self, text: &str, at: DateTime<Local>) {
        if self.lines.len() == MAX_CHAT_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(ChatLine {
            timestamp: at.format("%H:%M:%S").to_string(),
            text: text.to_owned(),
        });
    }

    pub fn lines(&self) -> impl Iterator<Item = &ChatLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn should_show(&self) -> bool {
        !self.hidden
    }

    pub fn ui(&self, ctx: &egui::Context, width: f32, lang: &str) {
        if !self.should_show() {
            return;
        }
        egui::SidePanel::right("chat_panel")
            .resizable(false)
            .exact_width(width)
            .frame(egui::Frame::none().fill(egui::Color32::from_black_alpha(160)))
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(translate("chat_title", lang))
                        .strong()
                        .color(egui::Color32::WHITE),
                );
                ui.separator();
                if self.lines.is_empty() {
                    ui.label(
                        egui::RichText::new(translate("chat_empty", lang))
                            .italics()
                            .color(egui::Color32::LIGHT_GRAY),
                    );
                    return;
                }
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for line in &self.lines {
                            ui.horizontal_wrapped(|ui| {
                                ui.label(
                                    egui::RichText::new(&line.timestamp)
                                        .monospace()
                                        .color(egui::Color32::GRAY),
                                );
                                ui.label(egui::RichText::new(&line.text).color(egui::Color32::WHITE));
                            });
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatPanel, MAX_CHAT_LINES};
    use chrono::{Local, TimeZone};

    #[test]
    fn keeps_only_most_recent_lines() {
        let mut panel = ChatPanel::default();
        for i in 0..MAX_CHAT_LINES + 5 {
            panel.push(&format!("line {i}"));
        }
        assert_eq!(panel.len(), MAX_CHAT_LINES);
        assert_eq!(panel.lines().next().map(|l| l.text.as_str()), Some("line 5"));
    }

    #[test]
    fn timestamps_use_wall_clock_format() {
        let mut panel = ChatPanel::default();
        let at = Local
            .with_ymd_and_hms(2024, 3, 1, 9, 5, 7)
            .single()
            .expect("unambiguous time");
        panel.push_at("hello", at);
        assert_eq!(panel.lines().next().map(|l| l.timestamp.as_str()), Some("09:05:07"));
    }
}
