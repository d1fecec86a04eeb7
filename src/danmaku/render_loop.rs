use crate::danmaku::host::{DrawSurface, FrameToken, OverlayHost};
use crate::danmaku::item::DanmakuItem;
use crate::danmaku::lanes::LaneSet;

/// Cancellable chain of frame callbacks.
///
/// Only the most recently requested token is honoured, so a callback that
/// was already queued when the task got cancelled does nothing.
#[derive(Debug, Default)]
pub struct FrameTask {
    next_token: u64,
    pending: Option<FrameToken>,
    running: bool,
}

impl FrameTask {
    /// A task whose tokens continue after `last_token`, so tokens from an
    /// earlier task are never mistaken for this one's.
    pub fn continuing_from(last_token: u64) -> Self {
        Self {
            next_token: last_token,
            ..Self::default()
        }
    }

    pub fn last_token(&self) -> u64 {
        self.next_token
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Start the chain and request its first frame.
    pub fn start(&mut self, host: &mut dyn OverlayHost) {
        self.running = true;
        self.reschedule(host);
    }

    /// Consume `token` if it is the frame this task is waiting for.
    pub fn accept(&mut self, token: FrameToken) -> bool {
        if !self.running || self.pending != Some(token) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Request the next frame unless the task was cancelled meanwhile.
    pub fn reschedule(&mut self, host: &mut dyn OverlayHost) -> bool {
        if !self.running || self.pending.is_some() {
            return false;
        }
        self.next_token = self.next_token.wrapping_add(1);
        let token = FrameToken(self.next_token);
        self.pending = Some(token);
        host.request_frame(token);
        true
    }

    pub fn cancel(&mut self, host: &mut dyn OverlayHost) {
        self.running = false;
        if let Some(token) = self.pending.take() {
            host.cancel_frame(token);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub drawn: usize,
    pub reaped: usize,
    /// The frame ran without a drawing surface and did nothing.
    pub skipped: bool,
}

/// The live set of items and the per-frame advance/draw/reap pass.
#[derive(Debug, Default)]
pub struct RenderLoop {
    items: Vec<DanmakuItem>,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: DanmakuItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[DanmakuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Run one frame.
    ///
    /// Items are visited newest first so that removing one by index never
    /// skips the next.
    pub fn tick(
        &mut self,
        surface: Option<&mut dyn DrawSurface>,
        opacity: f32,
        lanes: &mut LaneSet,
    ) -> TickOutcome {
        let Some(surface) = surface else {
            return TickOutcome {
                skipped: true,
                ..TickOutcome::default()
            };
        };

        surface.clear();
        surface.set_global_alpha(opacity);

        let mut outcome = TickOutcome::default();
        let mut i = self.items.len();
        while i > 0 {
            i -= 1;
            let item = &mut self.items[i];
            item.advance(lanes);
            item.render(surface);
            outcome.drawn += 1;
            if item.is_done() {
                self.items.remove(i);
                outcome.reaped += 1;
            }
        }
        outcome
    }
}
