use crate::danmaku::host::{
    DrawSurface, FontSpec, FrameToken, HostRect, OverlayHost, SurfaceSize, TextColor, TextMetrics,
    TextPaint,
};
use eframe::egui::{self, Align2, Color32, FontFamily, FontId, Pos2, Rect};
use std::time::Duration;

/// Share of the font size that sits above the baseline.
const ASCENT_RATIO: f32 = 0.8;

fn font_id(font: &FontSpec) -> FontId {
    let family = if font.family.to_ascii_lowercase().contains("monospace") {
        FontFamily::Monospace
    } else {
        FontFamily::Proportional
    };
    FontId::new(font.size_px as f32, family)
}

fn color(c: TextColor, alpha: f32) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b).gamma_multiply(alpha)
}

pub fn host_rect(rect: Rect) -> HostRect {
    HostRect {
        x: rect.min.x,
        y: rect.min.y,
        width: rect.width(),
        height: rect.height(),
    }
}

/// Window-system side of the overlay for the eframe app.
///
/// The "player" is the part of the window not covered by the chat panel;
/// it is refreshed every update before the engine is ticked.
pub struct EguiHost {
    ctx: egui::Context,
    player: Option<HostRect>,
    attached: Option<HostRect>,
    pending_frames: Vec<FrameToken>,
}

impl EguiHost {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            player: None,
            attached: None,
            pending_frames: Vec::new(),
        }
    }

    pub fn set_player(&mut self, rect: Option<HostRect>) {
        self.player = rect;
    }

    pub fn attached(&self) -> Option<HostRect> {
        self.attached
    }

    pub fn take_frames(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending_frames)
    }
}

impl OverlayHost for EguiHost {
    fn locate_player(&mut self) -> Option<HostRect> {
        self.player.filter(|rect| rect.width > 0.0 && rect.height > 0.0)
    }

    fn attach_surface(&mut self, rect: HostRect) {
        self.attached = Some(rect);
    }

    fn detach_surface(&mut self) {
        self.attached = None;
        self.pending_frames.clear();
        self.ctx.request_repaint();
    }

    fn request_frame(&mut self, token: FrameToken) {
        self.pending_frames.push(token);
        self.ctx.request_repaint();
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending_frames.retain(|pending| *pending != token);
    }

    fn schedule_wakeup(&mut self, after: Duration) {
        self.ctx.request_repaint_after(after);
    }
}

pub struct EguiMetrics<'a> {
    ctx: &'a egui::Context,
}

impl<'a> EguiMetrics<'a> {
    pub fn new(ctx: &'a egui::Context) -> Self {
        Self { ctx }
    }
}

impl TextMetrics for EguiMetrics<'_> {
    fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        let font_id = font_id(font);
        self.ctx
            .fonts(|fonts| fonts.layout_no_wrap(text.to_owned(), font_id, Color32::WHITE))
            .size()
            .x
    }
}

/// One frame of drawing onto an egui painter.
pub struct EguiCanvas {
    painter: egui::Painter,
    origin: Pos2,
    size: SurfaceSize,
    alpha: f32,
}

impl EguiCanvas {
    pub fn new(painter: egui::Painter, rect: Rect) -> Self {
        Self {
            painter,
            origin: rect.min,
            size: SurfaceSize::new(rect.width(), rect.height()),
            alpha: 1.0,
        }
    }
}

impl DrawSurface for EguiCanvas {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        // egui starts every frame from the transparent clear color.
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &FontSpec, paint: TextPaint) {
        let font_id = font_id(font);
        let top_left = self.origin + egui::vec2(x, y - font.size_px as f32 * ASCENT_RATIO);
        let w = paint.stroke_width * 0.5;
        if w > 0.0 {
            let stroke = color(paint.stroke, self.alpha);
            for (dx, dy) in [
                (-w, -w),
                (0.0, -w),
                (w, -w),
                (-w, 0.0),
                (w, 0.0),
                (-w, w),
                (0.0, w),
                (w, w),
            ] {
                self.painter.text(
                    top_left + egui::vec2(dx, dy),
                    Align2::LEFT_TOP,
                    text,
                    font_id.clone(),
                    stroke,
                );
            }
        }
        self.painter.text(
            top_left,
            Align2::LEFT_TOP,
            text,
            font_id,
            color(paint.fill, self.alpha),
        );
    }
}
