#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DanmakuStatsSnapshot {
    pub live_items: usize,
    pub lanes: usize,
    pub spawned: u64,
    pub reaped: u64,
    pub forced_allocations: u64,
    pub unlaned_spawns: u64,
    pub dropped_intake: u64,
    pub lane_recomputes: u64,
    pub frames: u64,
    pub frames_without_surface: u64,
}

/// Running counters for the debug HUD.
#[derive(Debug, Clone, Default)]
pub struct DanmakuStats {
    spawned: u64,
    reaped: u64,
    forced_allocations: u64,
    unlaned_spawns: u64,
    dropped_intake: u64,
    lane_recomputes: u64,
    frames: u64,
    frames_without_surface: u64,
}

impl DanmakuStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_spawn(&mut self, forced: bool, laned: bool) {
        self.spawned = self.spawned.saturating_add(1);
        if forced {
            self.forced_allocations = self.forced_allocations.saturating_add(1);
        }
        if !laned {
            self.unlaned_spawns = self.unlaned_spawns.saturating_add(1);
        }
    }

    pub fn record_dropped_intake(&mut self) {
        self.dropped_intake = self.dropped_intake.saturating_add(1);
    }

    pub fn record_lane_recompute(&mut self) {
        self.lane_recomputes = self.lane_recomputes.saturating_add(1);
    }

    pub fn record_frame(&mut self, reaped: usize, skipped: bool) {
        self.frames = self.frames.saturating_add(1);
        self.reaped = self.reaped.saturating_add(reaped as u64);
        if skipped {
            self.frames_without_surface = self.frames_without_surface.saturating_add(1);
        }
    }

    pub fn snapshot(&self, live_items: usize, lanes: usize) -> DanmakuStatsSnapshot {
        DanmakuStatsSnapshot {
            live_items,
            lanes,
            spawned: self.spawned,
            reaped: self.reaped,
            forced_allocations: self.forced_allocations,
            unlaned_spawns: self.unlaned_spawns,
            dropped_intake: self.dropped_intake,
            lane_recomputes: self.lane_recomputes,
            frames: self.frames,
            frames_without_surface: self.frames_without_surface,
        }
    }
}
