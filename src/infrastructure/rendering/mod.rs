pub mod canvas_renderer;

pub use canvas_renderer::{
    BACKGROUND_COLOR, BoundaryPainter, CanvasMarkerSurface, CanvasTimelineSurface, feature_paths, prepare_canvas,
};
