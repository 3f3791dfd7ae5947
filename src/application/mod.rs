pub mod config;
pub mod frame_renderer;
pub mod region_flash;
pub mod session;
pub mod timeline;

pub use config::VisualizationConfig;
pub use frame_renderer::{FrameRenderer, MarkerSprite, MarkerSurface};
pub use region_flash::{RegionFill, RegionFlashLayer, Rgb};
pub use session::{SessionSnapshot, TickReport, VisualizationSession};
pub use timeline::{TimelineFrame, TimelineLayout, TimelineSurface};
