//! Capabilities the danmaku engine borrows from whatever hosts it.
//!
//! The engine never talks to a window system directly. A host supplies text
//! metrics, a drawing surface for the current frame, the location of the
//! player it overlays, and a way to ask for the next frame.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Screen rectangle of the player the overlay is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HostRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HostRect {
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub family: String,
    pub size_px: u32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size_px: u32) -> Self {
        Self {
            family: family.into(),
            size_px,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TextColor {
    pub const WHITE: TextColor = TextColor::rgb(255, 255, 255);
    pub const BLACK: TextColor = TextColor::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Outlined text: the stroke is painted first, the fill on top of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPaint {
    pub fill: TextColor,
    pub stroke: TextColor,
    pub stroke_width: f32,
}

impl Default for TextPaint {
    fn default() -> Self {
        Self {
            fill: TextColor::WHITE,
            stroke: TextColor::BLACK,
            stroke_width: 2.0,
        }
    }
}

pub trait TextMetrics {
    /// Width in pixels of `text` laid out on one line with `font`.
    fn measure(&self, text: &str, font: &FontSpec) -> f32;
}

/// A drawing surface for one frame.
///
/// `x` is the left edge of the text and `y` its baseline.
pub trait DrawSurface {
    fn size(&self) -> SurfaceSize;
    fn clear(&mut self);
    fn set_global_alpha(&mut self, alpha: f32);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &FontSpec, paint: TextPaint);
}

/// Handle for one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Window-system side of the overlay lifecycle.
pub trait OverlayHost {
    /// Look for the player to overlay. `None` means "not there yet".
    fn locate_player(&mut self) -> Option<HostRect>;
    /// Create the overlay surface and place it over `rect`.
    fn attach_surface(&mut self, rect: HostRect);
    /// Clear and remove the overlay surface.
    fn detach_surface(&mut self);
    /// Ask for one frame callback carrying `token`.
    fn request_frame(&mut self, token: FrameToken);
    /// Drop a previously requested frame callback if it has not run yet.
    fn cancel_frame(&mut self, token: FrameToken);
    /// Ask to be ticked again after `after`, even if no frame is pending.
    fn schedule_wakeup(&mut self, after: Duration);
}
