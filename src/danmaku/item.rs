use crate::danmaku::config::DisplayConfig;
use crate::danmaku::host::{DrawSurface, FontSpec, TextMetrics, TextPaint};
use crate::danmaku::lanes::{Allocation, ItemId, LaneRef, LaneSet};
use rand::Rng;

/// One scrolling line of chat text.
///
/// Size, speed and width are fixed when the item is spawned; only `x`
/// changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DanmakuItem {
    id: ItemId,
    text: String,
    font: FontSpec,
    speed: f32,
    x: f32,
    y: f32,
    width: f32,
    lane: Option<LaneRef>,
}

/// Result of spawning an item, with how its lane was picked.
#[derive(Debug, Clone, PartialEq)]
pub struct Spawned {
    pub item: DanmakuItem,
    pub allocation: Option<Allocation>,
}

impl DanmakuItem {
    /// Build an item entering from the right edge and claim a lane for it.
    pub fn spawn<R: Rng>(
        id: ItemId,
        text: &str,
        config: &DisplayConfig,
        surface_width: f32,
        lanes: &mut LaneSet,
        metrics: &dyn TextMetrics,
        rng: &mut R,
    ) -> Spawned {
        let spread = config.font_size_random.clamp(0.0, 1.0);
        let variation = (1.0 - spread) + rng.gen::<f32>() * spread * 2.0;
        let font_size_px = (config.font_size * variation).floor().max(1.0) as u32;
        let speed = config.speed * (0.95 + rng.gen::<f32>() * 0.3) + rng.gen::<f32>() * 0.3;

        let font = FontSpec::new(config.font_family.clone(), font_size_px);
        let width = metrics.measure(text, &font);
        let mut item = Self::with_geometry(id, text, font, speed, surface_width, width);

        let allocation = lanes.find_best_lane(surface_width, rng);
        if let Some(allocation) = allocation {
            item.lane = lanes.claim(allocation.index(), id, item.right_edge());
        }
        item.y = lanes.y_for(item.lane);
        Spawned { item, allocation }
    }

    /// Build an item with explicit geometry and no lane.
    pub fn with_geometry(
        id: ItemId,
        text: &str,
        font: FontSpec,
        speed: f32,
        x: f32,
        width: f32,
    ) -> Self {
        Self {
            id,
            text: text.to_owned(),
            font,
            speed,
            x,
            y: crate::danmaku::lanes::FALLBACK_Y,
            width,
            lane: None,
        }
    }

    /// Move left by one step and, while this item is still its lane's
    /// newest occupant, drag the lane's trailing edge along.
    pub fn advance(&mut self, lanes: &mut LaneSet) {
        self.x -= self.speed;
        if let Some(lane) = self.lane {
            lanes.follow(lane, self.id, self.right_edge());
        }
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        surface.draw_text(&self.text, self.x, self.y, &self.font, TextPaint::default());
    }

    pub fn is_done(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn right_edge(&self) -> f32 {
        self.x + self.width
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn font_size_px(&self) -> u32 {
        self.font.size_px
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn lane(&self) -> Option<LaneRef> {
        self.lane
    }
}

#[cfg(test)]
mod tests {
    use super::DanmakuItem;
    use crate::danmaku::config::{DisplayConfig, VerticalBand};
    use crate::danmaku::host::{FontSpec, TextMetrics};
    use crate::danmaku::lanes::{ItemId, LaneSet, FALLBACK_Y};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct CharWidth;

    impl TextMetrics for CharWidth {
        fn measure(&self, text: &str, font: &FontSpec) -> f32 {
            text.chars().count() as f32 * font.size_px as f32 * 0.5
        }
    }

    #[test]
    fn jitter_stays_inside_configured_bounds() {
        let config = DisplayConfig {
            font_size: 20.0,
            font_size_random: 0.5,
            speed: 2.0,
            ..DisplayConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let mut lanes = LaneSet::compute(720.0, VerticalBand::All, config.font_size, 1);
        for i in 0..200 {
            let spawned = DanmakuItem::spawn(
                ItemId(i),
                "hello",
                &config,
                1280.0,
                &mut lanes,
                &CharWidth,
                &mut rng,
            );
            let item = spawned.item;
            assert!((10..=30).contains(&item.font_size_px()));
            assert!(item.speed() >= 2.0 * 0.95 && item.speed() <= 2.0 * 1.25 + 0.3);
            assert_eq!(item.x(), 1280.0);
            assert_eq!(item.width(), 5.0 * item.font_size_px() as f32 * 0.5);
        }
    }

    #[test]
    fn zero_jitter_keeps_exact_font_size() {
        let config = DisplayConfig {
            font_size: 24.0,
            font_size_random: 0.0,
            ..DisplayConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut lanes = LaneSet::default();
        let spawned = DanmakuItem::spawn(
            ItemId(1),
            "abc",
            &config,
            800.0,
            &mut lanes,
            &CharWidth,
            &mut rng,
        );
        assert_eq!(spawned.item.font_size_px(), 24);
        assert_eq!(spawned.allocation, None);
        assert_eq!(spawned.item.y(), FALLBACK_Y);
    }

    #[test]
    fn zero_width_item_finishes_once_past_left_edge() {
        let mut lanes = LaneSet::default();
        let mut item =
            DanmakuItem::with_geometry(ItemId(1), "", FontSpec::new("Arial", 24), 400.0, 1000.0, 0.0);
        assert!(!item.is_done());
        item.advance(&mut lanes);
        item.advance(&mut lanes);
        assert_eq!(item.x(), 200.0);
        assert!(!item.is_done());
        item.advance(&mut lanes);
        assert_eq!(item.x(), -200.0);
        assert!(item.is_done());
    }
}
