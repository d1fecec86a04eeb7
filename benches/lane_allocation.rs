use chat_danmaku::danmaku::config::{DisplayConfig, VerticalBand};
use chat_danmaku::danmaku::host::{DrawSurface, FontSpec, SurfaceSize, TextMetrics, TextPaint};
use chat_danmaku::danmaku::item::DanmakuItem;
use chat_danmaku::danmaku::lanes::{ItemId, LaneSet};
use chat_danmaku::danmaku::render_loop::RenderLoop;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

struct CharWidth;

impl TextMetrics for CharWidth {
    fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size_px as f32 * 0.6
    }
}

struct NullSurface;

impl DrawSurface for NullSurface {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(1920.0, 1080.0)
    }
    fn clear(&mut self) {}
    fn set_global_alpha(&mut self, _alpha: f32) {}
    fn draw_text(&mut self, _text: &str, _x: f32, _y: f32, _font: &FontSpec, _paint: TextPaint) {}
}

fn bench_spawn(c: &mut Criterion) {
    let config = DisplayConfig::default();
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("spawn_1k_on_1080p", |b| {
        b.iter(|| {
            let mut lanes = LaneSet::compute(1080.0, VerticalBand::All, config.font_size, 1);
            for n in 0..1_000u64 {
                DanmakuItem::spawn(
                    ItemId(n),
                    "888888 nice play",
                    &config,
                    1920.0,
                    &mut lanes,
                    &CharWidth,
                    &mut rng,
                );
            }
        })
    });
}

fn bench_advance(c: &mut Criterion) {
    let config = DisplayConfig::default();
    let mut rng = StdRng::seed_from_u64(2);
    let mut lanes = LaneSet::compute(1080.0, VerticalBand::All, config.font_size, 1);
    let mut render = RenderLoop::new();
    for n in 0..500u64 {
        let spawned = DanmakuItem::spawn(
            ItemId(n),
            "scrolling text",
            &config,
            1_000_000.0,
            &mut lanes,
            &CharWidth,
            &mut rng,
        );
        render.push(spawned.item);
    }
    let mut surface = NullSurface;
    c.bench_function("tick_500_items", |b| {
        b.iter(|| render.tick(Some(&mut surface), 1.0, &mut lanes))
    });
}

criterion_group!(benches, bench_spawn, bench_advance);
criterion_main!(benches);
