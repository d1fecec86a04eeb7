use chat_danmaku::danmaku::config::{DisplayConfig, VerticalBand};
use chat_danmaku::danmaku::host::{FontSpec, TextMetrics};
use chat_danmaku::danmaku::item::DanmakuItem;
use chat_danmaku::danmaku::lanes::{Allocation, ItemId, LaneSet, SAFE_MARGIN_PX};
use chat_danmaku::danmaku::render_loop::RenderLoop;
use rand::rngs::StdRng;
use rand::SeedableRng;

struct FixedWidth(f32);

impl TextMetrics for FixedWidth {
    fn measure(&self, _text: &str, _font: &FontSpec) -> f32 {
        self.0
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn full_band_on_720_with_font_24_has_17_lanes() {
    let lanes = LaneSet::compute(720.0, VerticalBand::All, 24.0, 1);
    let ys = lanes.geometry();
    assert_eq!(ys.len(), 17);
    for (i, y) in ys.iter().enumerate() {
        assert!(close(*y, 38.4 * (i + 1) as f32), "lane {i} at {y}");
    }
    assert!(close(ys[16], 652.8));
    assert!(ys.iter().all(|y| !close(*y, 691.2)));
}

#[test]
fn top_half_keeps_lanes_above_the_middle() {
    let lanes = LaneSet::compute(720.0, VerticalBand::TopHalf, 24.0, 1);
    assert_eq!(lanes.len(), 8);
    assert!(lanes.geometry().iter().all(|y| *y < 360.0));
}

#[test]
fn same_size_gives_same_geometry() {
    let first = LaneSet::compute(1080.0, VerticalBand::All, 30.0, 1);
    let second = LaneSet::compute(1080.0, VerticalBand::All, 30.0, 2);
    assert_eq!(first.geometry(), second.geometry());
    assert_eq!(first.lane_height(), second.lane_height());
}

#[test]
fn fallback_takes_the_only_lane() {
    let mut lanes = LaneSet::compute(80.0, VerticalBand::All, 24.0, 1);
    assert_eq!(lanes.len(), 1);
    lanes.claim(0, ItemId(1), 1000.0 + 200.0);
    let mut rng = StdRng::seed_from_u64(7);
    assert_eq!(
        lanes.find_best_lane(1000.0, &mut rng),
        Some(Allocation::Forced(0))
    );
}

#[test]
fn fallback_prefers_lane_closest_to_clearing() {
    let mut lanes = LaneSet::compute(720.0, VerticalBand::All, 24.0, 1);
    for index in 0..lanes.len() {
        lanes.claim(index, ItemId(index as u64), 1500.0);
    }
    lanes.claim(5, ItemId(99), 990.0);
    lanes.claim(9, ItemId(100), 990.0);
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(
        lanes.find_best_lane(1000.0, &mut rng),
        Some(Allocation::Forced(5))
    );
}

#[test]
fn every_intake_moves_its_lane_edge_to_the_new_item() {
    let config = DisplayConfig::default();
    let width = 1000.0;
    let metrics = FixedWidth(150.0);
    let mut lanes = LaneSet::compute(720.0, VerticalBand::All, config.font_size, 1);
    let mut rng = StdRng::seed_from_u64(42);

    for n in 0..40u64 {
        let before: Vec<f32> = lanes.lanes().iter().map(|l| l.trailing_edge_x).collect();
        let spawned = DanmakuItem::spawn(
            ItemId(n),
            "hello",
            &config,
            width,
            &mut lanes,
            &metrics,
            &mut rng,
        );
        let allocation = spawned.allocation.expect("lanes exist");
        let index = allocation.index();
        let lane = &lanes.lanes()[index];
        assert_eq!(lane.trailing_edge_x, spawned.item.right_edge());
        assert_eq!(lane.occupant, Some(ItemId(n)));
        assert_eq!(spawned.item.y(), lane.y);
        if let Allocation::Clear(_) = allocation {
            assert!(before[index] < width - SAFE_MARGIN_PX);
            assert!(lane.trailing_edge_x >= width);
            assert!(lane.trailing_edge_x > before[index]);
        }
    }
}

#[test]
fn only_the_newest_item_drags_a_shared_lane() {
    let config = DisplayConfig {
        font_size_random: 0.0,
        ..DisplayConfig::default()
    };
    let metrics = FixedWidth(200.0);
    let mut lanes = LaneSet::compute(80.0, VerticalBand::All, config.font_size, 1);
    let mut rng = StdRng::seed_from_u64(5);
    let mut render = RenderLoop::new();

    for n in 1..=5u64 {
        let spawned = DanmakuItem::spawn(
            ItemId(n),
            &format!("line {n}"),
            &config,
            1000.0,
            &mut lanes,
            &metrics,
            &mut rng,
        );
        assert_eq!(spawned.allocation.map(|a| a.index()), Some(0));
        render.push(spawned.item);
    }
    assert_eq!(lanes.lanes()[0].occupant, Some(ItemId(5)));

    let mut surface = NullSurface;
    render.tick(Some(&mut surface), 1.0, &mut lanes);

    let newest = render
        .items()
        .iter()
        .find(|item| item.id() == ItemId(5))
        .expect("newest still live");
    assert_eq!(lanes.lanes()[0].trailing_edge_x, newest.right_edge());
    for item in render.items().iter().filter(|item| item.id() != ItemId(5)) {
        let mut scratch = lanes.clone();
        assert!(!scratch.follow(item.lane().expect("laned"), item.id(), 0.0));
    }
}

#[test]
fn zero_width_item_is_done_only_once_it_passes_the_left_edge() {
    let mut lanes = LaneSet::default();
    let mut item = DanmakuItem::with_geometry(
        ItemId(1),
        "",
        FontSpec::new("Arial", 24),
        500.0,
        1000.0,
        0.0,
    );
    assert!(!item.is_done());
    item.advance(&mut lanes);
    item.advance(&mut lanes);
    assert_eq!(item.x(), 0.0);
    assert!(!item.is_done());
    item.advance(&mut lanes);
    assert!(item.is_done());
}

struct NullSurface;

impl chat_danmaku::danmaku::host::DrawSurface for NullSurface {
    fn size(&self) -> chat_danmaku::danmaku::host::SurfaceSize {
        chat_danmaku::danmaku::host::SurfaceSize::new(1000.0, 80.0)
    }
    fn clear(&mut self) {}
    fn set_global_alpha(&mut self, _alpha: f32) {}
    fn draw_text(
        &mut self,
        _text: &str,
        _x: f32,
        _y: f32,
        _font: &FontSpec,
        _paint: chat_danmaku::danmaku::host::TextPaint,
    ) {
    }
}
