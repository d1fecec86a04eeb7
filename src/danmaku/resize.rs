use crate::danmaku::host::SurfaceSize;
use std::time::{Duration, Instant};

pub const RESIZE_THROTTLE: Duration = Duration::from_millis(150);

/// Coalesces bursts of resize observations.
///
/// The first observation after a quiet period opens a window; observations
/// inside the window only replace the pending size. When the window closes
/// the latest size is released exactly once.
#[derive(Debug, Clone, Default)]
pub struct ResizeThrottle {
    pending: Option<SurfaceSize>,
    deadline: Option<Instant>,
}

impl ResizeThrottle {
    /// Record a size. Returns `true` when this observation opened a new
    /// window, so the caller knows to arrange a wake-up.
    pub fn observe(&mut self, size: SurfaceSize, now: Instant) -> bool {
        self.pending = Some(size);
        if self.deadline.is_none() {
            self.deadline = Some(now + RESIZE_THROTTLE);
            return true;
        }
        false
    }

    /// Take the pending size if its window has closed.
    pub fn take_due(&mut self, now: Instant) -> Option<SurfaceSize> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{ResizeThrottle, RESIZE_THROTTLE};
    use crate::danmaku::host::SurfaceSize;
    use std::time::{Duration, Instant};

    #[test]
    fn burst_releases_only_the_last_size() {
        let start = Instant::now();
        let mut throttle = ResizeThrottle::default();
        assert!(throttle.observe(SurfaceSize::new(800.0, 450.0), start));
        assert!(!throttle.observe(
            SurfaceSize::new(900.0, 500.0),
            start + Duration::from_millis(40)
        ));
        assert!(!throttle.observe(
            SurfaceSize::new(1280.0, 720.0),
            start + Duration::from_millis(120)
        ));

        assert_eq!(throttle.take_due(start + Duration::from_millis(149)), None);
        assert_eq!(
            throttle.take_due(start + RESIZE_THROTTLE),
            Some(SurfaceSize::new(1280.0, 720.0))
        );
        assert_eq!(throttle.take_due(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn new_window_opens_after_release() {
        let start = Instant::now();
        let mut throttle = ResizeThrottle::default();
        throttle.observe(SurfaceSize::new(800.0, 450.0), start);
        throttle.take_due(start + RESIZE_THROTTLE);
        let later = start + Duration::from_millis(500);
        assert!(throttle.observe(SurfaceSize::new(640.0, 360.0), later));
        assert_eq!(throttle.deadline(), Some(later + RESIZE_THROTTLE));
    }
}
