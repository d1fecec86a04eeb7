use serde::{Deserialize, Serialize};

const MIN_FONT_SIZE: f32 = 8.0;
const MAX_FONT_SIZE: f32 = 200.0;
const MIN_SPEED: f32 = 0.1;
const MAX_SPEED: f32 = 20.0;

/// Vertical region of the surface that lanes are allowed to occupy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalBand {
    #[default]
    All,
    #[serde(rename = "top", alias = "top_half", alias = "top-half")]
    TopHalf,
    #[serde(rename = "bottom", alias = "bottom_half", alias = "bottom-half")]
    BottomHalf,
}

impl VerticalBand {
    /// Returns the `(top, bottom)` pixel range of the band on a surface of
    /// the given height.
    pub fn range(self, surface_height: f32) -> (f32, f32) {
        match self {
            Self::All => (0.0, surface_height),
            Self::TopHalf => (0.0, surface_height / 2.0),
            Self::BottomHalf => (surface_height / 2.0, surface_height),
        }
    }
}

/// Display settings the danmaku engine reads on every intake and frame.
///
/// The engine only ever sees this through an `Arc` snapshot; a settings
/// change replaces the snapshot instead of mutating it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Fractional jitter applied to `font_size` per item (0.05 = ±5%).
    #[serde(default = "default_font_size_random")]
    pub font_size_random: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default, alias = "position")]
    pub vertical_band: VerticalBand,
}

fn default_font_family() -> String {
    "Arial, sans-serif".to_owned()
}

fn default_font_size() -> f32 {
    24.0
}

fn default_font_size_random() -> f32 {
    0.05
}

fn default_speed() -> f32 {
    1.0
}

fn default_opacity() -> f32 {
    1.0
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            font_size_random: default_font_size_random(),
            speed: default_speed(),
            opacity: default_opacity(),
            vertical_band: VerticalBand::All,
        }
    }
}

impl DisplayConfig {
    /// Clamp every numeric field into the range the engine can animate.
    pub fn sanitize(&mut self) {
        self.font_size = clamp_or(self.font_size, MIN_FONT_SIZE, MAX_FONT_SIZE, default_font_size());
        self.font_size_random = clamp_or(self.font_size_random, 0.0, 1.0, default_font_size_random());
        self.speed = clamp_or(self.speed, MIN_SPEED, MAX_SPEED, default_speed());
        self.opacity = clamp_or(self.opacity, 0.0, 1.0, default_opacity());
        if self.font_family.trim().is_empty() {
            self.font_family = default_font_family();
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }

    /// True when switching from `self` to `next` invalidates lane geometry.
    pub fn changes_lane_geometry(&self, next: &DisplayConfig) -> bool {
        self.font_size != next.font_size || self.vertical_band != next.vertical_band
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayConfig, VerticalBand};

    #[test]
    fn band_accepts_short_and_long_names() {
        let top: VerticalBand = serde_json::from_str("\"top\"").expect("top");
        let top_half: VerticalBand = serde_json::from_str("\"top_half\"").expect("top_half");
        let bottom: VerticalBand = serde_json::from_str("\"bottom-half\"").expect("bottom-half");
        assert_eq!(top, VerticalBand::TopHalf);
        assert_eq!(top_half, VerticalBand::TopHalf);
        assert_eq!(bottom, VerticalBand::BottomHalf);
        assert_eq!(
            serde_json::to_string(&VerticalBand::BottomHalf).expect("serialize"),
            "\"bottom\""
        );
    }

    #[test]
    fn band_ranges_split_surface_in_half() {
        assert_eq!(VerticalBand::All.range(720.0), (0.0, 720.0));
        assert_eq!(VerticalBand::TopHalf.range(720.0), (0.0, 360.0));
        assert_eq!(VerticalBand::BottomHalf.range(720.0), (360.0, 720.0));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: DisplayConfig = serde_json::from_str(r#"{"font_size": 30}"#).expect("parse");
        assert_eq!(cfg.font_size, 30.0);
        assert_eq!(cfg.font_family, "Arial, sans-serif");
        assert_eq!(cfg.vertical_band, VerticalBand::All);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let cfg = DisplayConfig {
            font_family: "  ".into(),
            font_size: 0.0,
            font_size_random: 3.0,
            speed: f32::NAN,
            opacity: -1.0,
            vertical_band: VerticalBand::All,
        }
        .sanitized();
        assert_eq!(cfg.font_size, 8.0);
        assert_eq!(cfg.font_size_random, 1.0);
        assert_eq!(cfg.speed, 1.0);
        assert_eq!(cfg.opacity, 0.0);
        assert_eq!(cfg.font_family, "Arial, sans-serif");
    }

    #[test]
    fn only_size_and_band_change_geometry() {
        let base = DisplayConfig::default();
        let faster = DisplayConfig {
            speed: 3.0,
            opacity: 0.5,
            ..base.clone()
        };
        let bigger = DisplayConfig {
            font_size: 32.0,
            ..base.clone()
        };
        assert!(!base.changes_lane_geometry(&faster));
        assert!(base.changes_lane_geometry(&bigger));
    }
}
