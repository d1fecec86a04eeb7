#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceLifecycle {
    Stopped,
    Searching,
    Mounted,
}

impl SurfaceLifecycle {
    pub fn is_running(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

pub fn can_transition(from: SurfaceLifecycle, to: SurfaceLifecycle) -> bool {
    matches!(
        (from, to),
        (SurfaceLifecycle::Stopped, SurfaceLifecycle::Searching)
            | (SurfaceLifecycle::Searching, SurfaceLifecycle::Mounted)
            | (SurfaceLifecycle::Searching, SurfaceLifecycle::Stopped)
            | (SurfaceLifecycle::Mounted, SurfaceLifecycle::Stopped)
    ) || from == to
}
