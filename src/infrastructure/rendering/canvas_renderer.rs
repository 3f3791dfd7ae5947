use crate::application::config::SideColors;
use crate::application::frame_renderer::{MarkerSprite, MarkerSurface};
use crate::application::region_flash::RegionFill;
use crate::application::timeline::{TimelineFrame, TimelineSurface};
use crate::domain::{
    errors::{AppError, RenderingResult},
    geography::BoundaryPaths,
    logging::{LogComponent, get_logger},
    screen::ScreenPoint,
    trades::Side,
};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Path2d};

pub const BACKGROUND_COLOR: &str = "#181818";
const BOUNDARY_FILL: &str = "#262626";
const BOUNDARY_STROKE: &str = "#565656";
const TRACK_COLOR: &str = "#2e2e2e";
const PROGRESS_COLOR: &str = "#FFFFFF";
const BAR_COLOR: &str = "#565656";
const BAR_ALPHA: f64 = 0.5;
const BAR_GAP: f64 = 4.0;
const LABEL_FONT: &str = "12px Inter, sans-serif";

/// Sizes `canvas` and returns its 2D context.
pub fn prepare_canvas(
    canvas: &HtmlCanvasElement,
    width: f64,
    height: f64,
) -> RenderingResult<CanvasRenderingContext2d> {
    canvas.set_width(width.max(0.0).round() as u32);
    canvas.set_height(height.max(0.0).round() as u32);
    canvas
        .get_context("2d")
        .map_err(|_| AppError::RenderingError("Failed to get 2D context".to_string()))?
        .ok_or_else(|| AppError::RenderingError("Canvas has no 2D context".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| AppError::RenderingError("Failed to cast to 2D context".to_string()))
}

/// One retained `Path2d` per boundary feature, in feature order; `None`
/// for features with nothing to draw.
pub fn feature_paths(boundary: &BoundaryPaths) -> RenderingResult<Vec<Option<Path2d>>> {
    boundary
        .features()
        .iter()
        .map(|feature| {
            if feature.rings.is_empty() {
                return Ok(None);
            }
            Path2d::new_with_path_string(&feature.svg_path())
                .map(Some)
                .map_err(|_| AppError::RenderingError(format!("Invalid path for {}", feature.name)))
        })
        .collect()
}

/// Draws the boundary once, as retained `Path2d` objects.
pub struct BoundaryPainter {
    context: CanvasRenderingContext2d,
    offset: ScreenPoint,
    paths: Vec<Path2d>,
}

impl BoundaryPainter {
    pub fn new(
        canvas: &HtmlCanvasElement,
        width: f64,
        height: f64,
        offset: ScreenPoint,
        boundary: &BoundaryPaths,
    ) -> RenderingResult<Self> {
        let context = prepare_canvas(canvas, width, height)?;
        let paths = feature_paths(boundary)?.into_iter().flatten().collect();
        Ok(Self { context, offset, paths })
    }

    pub fn paint(&self) -> RenderingResult<()> {
        let ctx = &self.context;
        let canvas_width = ctx.canvas().map(|c| c.width() as f64).unwrap_or(0.0);
        let canvas_height = ctx.canvas().map(|c| c.height() as f64).unwrap_or(0.0);
        ctx.set_fill_style_str(BACKGROUND_COLOR);
        ctx.fill_rect(0.0, 0.0, canvas_width, canvas_height);

        ctx.save();
        ctx.translate(self.offset.x, self.offset.y)
            .map_err(|_| AppError::RenderingError("translate failed".to_string()))?;
        ctx.set_fill_style_str(BOUNDARY_FILL);
        ctx.set_stroke_style_str(BOUNDARY_STROKE);
        ctx.set_line_width(0.5);
        for path in &self.paths {
            ctx.fill_with_path_2d(path);
            ctx.stroke_with_path(path);
        }
        ctx.restore();

        get_logger().debug(
            LogComponent::Infrastructure("BoundaryPainter"),
            &format!("Painted {} boundary paths", self.paths.len()),
        );
        Ok(())
    }
}

/// Marker canvas, cleared and redrawn every animation frame with `screen`
/// compositing. Region flashes are filled underneath, over the boundary.
pub struct CanvasMarkerSurface {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    offset: ScreenPoint,
    regions: Vec<Option<Path2d>>,
}

impl CanvasMarkerSurface {
    pub fn new(
        canvas: &HtmlCanvasElement,
        width: f64,
        height: f64,
        offset: ScreenPoint,
    ) -> RenderingResult<Self> {
        let context = prepare_canvas(canvas, width, height)?;
        Ok(Self { context, width, height, offset, regions: Vec::new() })
    }

    /// Keeps the feature shapes so flashed regions can be filled.
    pub fn with_regions(mut self, boundary: &BoundaryPaths) -> RenderingResult<Self> {
        self.regions = feature_paths(boundary)?;
        Ok(self)
    }

    fn fill_circle(&self, x: f64, y: f64, radius: f64) {
        if radius <= 0.0 {
            return;
        }
        self.context.begin_path();
        if self.context.arc(x, y, radius, 0.0, TAU).is_ok() {
            self.context.fill();
        }
    }
}

impl MarkerSurface for CanvasMarkerSurface {
    fn clear(&mut self) {
        let _ = self.context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.context.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_markers(&mut self, sprites: &[MarkerSprite], colors: &SideColors) {
        let ctx = &self.context;
        ctx.save();
        let _ = ctx.set_global_composite_operation("screen");
        let _ = ctx.translate(self.offset.x, self.offset.y);

        // One fill style per side keeps state changes down on busy frames.
        for side in [Side::Buy, Side::Sell] {
            ctx.set_fill_style_str(colors.color_for(side));
            for sprite in sprites.iter().filter(|sprite| sprite.side == side) {
                if let Some(halo) = sprite.halo {
                    ctx.set_global_alpha(halo.alpha);
                    self.fill_circle(sprite.x, sprite.y, halo.radius);
                }
                ctx.set_global_alpha(sprite.alpha);
                self.fill_circle(sprite.x, sprite.y, sprite.radius);
            }
        }

        ctx.restore();
    }

    fn fill_regions(&mut self, fills: &[RegionFill]) {
        let ctx = &self.context;
        ctx.save();
        let _ = ctx.translate(self.offset.x, self.offset.y);
        for fill in fills {
            if let Some(Some(path)) = self.regions.get(fill.feature) {
                ctx.set_fill_style_str(&fill.color.to_css());
                ctx.fill_with_path_2d(path);
            }
        }
        ctx.restore();
    }
}

/// Timeline canvas: track, progress, revealed histogram bars, handle and labels.
pub struct CanvasTimelineSurface {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    track_x: f64,
    track_y: f64,
}

impl CanvasTimelineSurface {
    /// `track_width` is centred in a canvas `width` wide; the bars get
    /// `max_bar_height` of room above the track.
    pub fn new(
        canvas: &HtmlCanvasElement,
        width: f64,
        height: f64,
        track_width: f64,
        max_bar_height: f64,
    ) -> RenderingResult<Self> {
        let context = prepare_canvas(canvas, width, height)?;
        Ok(Self {
            context,
            width,
            height,
            track_x: ((width - track_width) / 2.0).max(0.0),
            track_y: max_bar_height + BAR_GAP,
        })
    }

    /// Converts a canvas-relative pointer x to a track-relative x.
    pub fn track_x(&self, canvas_x: f64) -> f64 {
        canvas_x - self.track_x
    }

    fn label(&self, text: &str, x: f64, y: f64, align: &str) {
        self.context.set_text_align(align);
        let _ = self.context.fill_text(text, x, y);
    }
}

impl TimelineSurface for CanvasTimelineSurface {
    fn draw_timeline(&mut self, frame: &TimelineFrame) {
        let ctx = &self.context;
        ctx.clear_rect(0.0, 0.0, self.width, self.height);
        ctx.save();
        let _ = ctx.translate(self.track_x, self.track_y);

        ctx.set_global_alpha(BAR_ALPHA);
        ctx.set_fill_style_str(BAR_COLOR);
        for bar in &frame.bars {
            ctx.fill_rect(bar.x, -bar.height - BAR_GAP, bar.width, bar.height);
        }
        ctx.set_global_alpha(1.0);

        let track = frame.track;
        ctx.set_fill_style_str(TRACK_COLOR);
        ctx.fill_rect(track.x, track.y, track.width, track.height);
        ctx.set_fill_style_str(PROGRESS_COLOR);
        ctx.fill_rect(track.x, track.y, frame.progress_width, track.height);

        ctx.set_fill_style_str(if frame.dragging { "#cccccc" } else { PROGRESS_COLOR });
        ctx.begin_path();
        if ctx.arc(frame.handle_x, track.height / 2.0, frame.handle_radius, 0.0, TAU).is_ok() {
            ctx.fill();
        }

        ctx.set_font(LABEL_FONT);
        let label_y = track.height + 18.0;
        self.label(&frame.start_label, 0.0, label_y, "start");
        self.label(&frame.end_label, track.width, label_y, "end");
        self.label(&frame.current_label, frame.handle_x, label_y + 18.0, "center");

        ctx.restore();
    }
}
