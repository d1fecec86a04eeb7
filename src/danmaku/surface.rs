use crate::danmaku::config::DisplayConfig;
use crate::danmaku::host::{
    DrawSurface, FrameToken, HostRect, OverlayHost, SurfaceSize, TextMetrics,
};
use crate::danmaku::item::DanmakuItem;
use crate::danmaku::lanes::{ItemId, LaneSet};
use crate::danmaku::render_loop::{FrameTask, RenderLoop};
use crate::danmaku::resize::{ResizeThrottle, RESIZE_THROTTLE};
use crate::danmaku::state::{can_transition, SurfaceLifecycle};
use crate::danmaku::stats::{DanmakuStats, DanmakuStatsSnapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const PLAYER_RETRY_INTERVAL: Duration = Duration::from_millis(1000);

struct MountedSurface {
    host_rect: HostRect,
    size: SurfaceSize,
    lanes: LaneSet,
    render: RenderLoop,
    resize: ResizeThrottle,
    frames: FrameTask,
}

enum SurfaceState {
    Stopped,
    Searching { next_probe: Instant },
    Mounted(Box<MountedSurface>),
}

impl SurfaceState {
    fn lifecycle(&self) -> SurfaceLifecycle {
        match self {
            Self::Stopped => SurfaceLifecycle::Stopped,
            Self::Searching { .. } => SurfaceLifecycle::Searching,
            Self::Mounted(_) => SurfaceLifecycle::Mounted,
        }
    }
}

/// Owns the overlay surface and everything animated on it.
///
/// All methods are expected to be called from the host's UI thread; the
/// manager is never shared.
pub struct SurfaceManager<R = StdRng> {
    state: SurfaceState,
    config: Arc<DisplayConfig>,
    rng: R,
    next_item_id: u64,
    lane_generation: u64,
    last_frame_token: u64,
    stats: DanmakuStats,
}

impl SurfaceManager<StdRng> {
    pub fn new(config: Arc<DisplayConfig>) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> SurfaceManager<R> {
    pub fn with_rng(config: Arc<DisplayConfig>, rng: R) -> Self {
        Self {
            state: SurfaceState::Stopped,
            config,
            rng,
            next_item_id: 1,
            lane_generation: 0,
            last_frame_token: 0,
            stats: DanmakuStats::default(),
        }
    }

    pub fn lifecycle(&self) -> SurfaceLifecycle {
        self.state.lifecycle()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle().is_running()
    }

    pub fn config(&self) -> &Arc<DisplayConfig> {
        &self.config
    }

    pub fn start(&mut self, now: Instant, host: &mut dyn OverlayHost) {
        if self.is_running() {
            return;
        }
        tracing::info!("danmaku renderer starting");
        self.transition(SurfaceState::Searching { next_probe: now });
        self.probe_player(now, host);
    }

    /// Tear everything down. Items on screen are discarded, not paused.
    pub fn stop(&mut self, host: &mut dyn OverlayHost) {
        match std::mem::replace(&mut self.state, SurfaceState::Stopped) {
            SurfaceState::Stopped => {}
            SurfaceState::Searching { .. } => {
                tracing::info!("danmaku renderer stopped while searching for player");
            }
            SurfaceState::Mounted(mut mounted) => {
                mounted.frames.cancel(host);
                self.last_frame_token = mounted.frames.last_token();
                mounted.render.clear();
                mounted.resize.reset();
                host.detach_surface();
                tracing::info!("danmaku renderer stopped");
            }
        }
    }

    /// Drive the timers: player retries and closed resize windows.
    pub fn tick(&mut self, now: Instant, host: &mut dyn OverlayHost) {
        let probe_due = matches!(
            self.state,
            SurfaceState::Searching { next_probe } if now >= next_probe
        );
        if probe_due {
            self.probe_player(now, host);
        } else {
            self.apply_due_resize(now);
        }
    }

    /// Handle a frame callback previously requested with `token`.
    ///
    /// Returns `false` when the token is stale or the manager is not
    /// mounted; nothing is drawn and nothing is rescheduled in that case.
    pub fn on_frame(
        &mut self,
        token: FrameToken,
        now: Instant,
        surface: Option<&mut dyn DrawSurface>,
        host: &mut dyn OverlayHost,
    ) -> bool {
        self.apply_due_resize(now);
        let SurfaceState::Mounted(mounted) = &mut self.state else {
            return false;
        };
        let mounted = &mut **mounted;
        if !mounted.frames.accept(token) {
            tracing::trace!(?token, "ignoring stale frame");
            return false;
        }

        let outcome = mounted
            .render
            .tick(surface, self.config.opacity, &mut mounted.lanes);
        self.stats.record_frame(outcome.reaped, outcome.skipped);
        mounted.frames.reschedule(host);
        true
    }

    pub fn observe_resize(&mut self, size: SurfaceSize, now: Instant, host: &mut dyn OverlayHost) {
        let SurfaceState::Mounted(mounted) = &mut self.state else {
            return;
        };
        if mounted.resize.observe(size, now) {
            host.schedule_wakeup(RESIZE_THROTTLE);
        }
    }

    /// Queue `text` as a new item. Dropped when no surface is mounted.
    pub fn add_danmaku(&mut self, text: &str, metrics: &dyn TextMetrics) -> Option<ItemId> {
        let SurfaceState::Mounted(mounted) = &mut self.state else {
            self.stats.record_dropped_intake();
            tracing::debug!("dropping danmaku, surface not mounted");
            return None;
        };

        let id = ItemId(self.next_item_id);
        self.next_item_id = self.next_item_id.wrapping_add(1);
        let spawned = DanmakuItem::spawn(
            id,
            text,
            &self.config,
            mounted.size.width,
            &mut mounted.lanes,
            metrics,
            &mut self.rng,
        );
        self.stats.record_spawn(
            spawned.allocation.is_some_and(|a| a.is_forced()),
            spawned.item.lane().is_some(),
        );
        mounted.render.push(spawned.item);
        Some(id)
    }

    /// Swap in a new config snapshot. Lane geometry is rebuilt only when
    /// the font size or band changed; everything else is read per frame.
    pub fn update_config(&mut self, config: Arc<DisplayConfig>) {
        let rebuild = self.config.changes_lane_geometry(&config);
        self.config = config;
        if rebuild {
            self.recompute_lanes();
        }
    }

    pub fn lanes(&self) -> Option<&LaneSet> {
        match &self.state {
            SurfaceState::Mounted(mounted) => Some(&mounted.lanes),
            _ => None,
        }
    }

    pub fn items(&self) -> &[DanmakuItem] {
        match &self.state {
            SurfaceState::Mounted(mounted) => mounted.render.items(),
            _ => &[],
        }
    }

    pub fn surface_size(&self) -> Option<SurfaceSize> {
        match &self.state {
            SurfaceState::Mounted(mounted) => Some(mounted.size),
            _ => None,
        }
    }

    pub fn host_rect(&self) -> Option<HostRect> {
        match &self.state {
            SurfaceState::Mounted(mounted) => Some(mounted.host_rect),
            _ => None,
        }
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        match &self.state {
            SurfaceState::Mounted(mounted) => mounted.frames.pending(),
            _ => None,
        }
    }

    pub fn stats(&self) -> DanmakuStatsSnapshot {
        let lanes = self.lanes().map(LaneSet::len).unwrap_or(0);
        self.stats.snapshot(self.items().len(), lanes)
    }

    fn probe_player(&mut self, now: Instant, host: &mut dyn OverlayHost) {
        match host.locate_player() {
            Some(rect) => self.mount(rect, host),
            None => {
                tracing::debug!("player not found, retrying");
                self.state = SurfaceState::Searching {
                    next_probe: now + PLAYER_RETRY_INTERVAL,
                };
                host.schedule_wakeup(PLAYER_RETRY_INTERVAL);
            }
        }
    }

    fn mount(&mut self, rect: HostRect, host: &mut dyn OverlayHost) {
        host.attach_surface(rect);
        let size = rect.size();
        let lanes = self.next_lane_set(size.height);
        self.stats.record_lane_recompute();
        let mut mounted = Box::new(MountedSurface {
            host_rect: rect,
            size,
            lanes,
            render: RenderLoop::new(),
            resize: ResizeThrottle::default(),
            frames: FrameTask::continuing_from(self.last_frame_token),
        });
        mounted.frames.start(host);
        tracing::info!(
            width = size.width,
            height = size.height,
            lanes = mounted.lanes.len(),
            "danmaku surface mounted"
        );
        self.transition(SurfaceState::Mounted(mounted));
    }

    fn apply_due_resize(&mut self, now: Instant) {
        let SurfaceState::Mounted(mounted) = &mut self.state else {
            return;
        };
        let Some(size) = mounted.resize.take_due(now) else {
            return;
        };
        mounted.size = size;
        mounted.host_rect.width = size.width;
        mounted.host_rect.height = size.height;
        tracing::debug!(width = size.width, height = size.height, "surface resized");
        self.recompute_lanes();
    }

    fn recompute_lanes(&mut self) {
        let height = match &self.state {
            SurfaceState::Mounted(mounted) => mounted.size.height,
            _ => return,
        };
        let lanes = self.next_lane_set(height);
        if let SurfaceState::Mounted(mounted) = &mut self.state {
            mounted.lanes = lanes;
            self.stats.record_lane_recompute();
        }
    }

    fn next_lane_set(&mut self, height: f32) -> LaneSet {
        self.lane_generation = self.lane_generation.wrapping_add(1);
        LaneSet::compute(
            height,
            self.config.vertical_band,
            self.config.font_size,
            self.lane_generation,
        )
    }

    fn transition(&mut self, next: SurfaceState) {
        let from = self.state.lifecycle();
        let to = next.lifecycle();
        if !can_transition(from, to) {
            tracing::warn!(?from, ?to, "unexpected danmaku surface transition");
        }
        self.state = next;
    }
}
