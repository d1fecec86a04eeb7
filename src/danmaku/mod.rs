pub mod config;
pub mod host;
pub mod item;
pub mod lanes;
pub mod render_loop;
pub mod resize;
pub mod state;
pub mod stats;
pub mod surface;

pub use config::{DisplayConfig, VerticalBand};
pub use host::{
    DrawSurface, FontSpec, FrameToken, HostRect, OverlayHost, SurfaceSize, TextColor,
    TextMetrics, TextPaint,
};
pub use item::DanmakuItem;
pub use lanes::{Allocation, ItemId, Lane, LaneRef, LaneSet};
pub use state::SurfaceLifecycle;
pub use surface::SurfaceManager;
