use crate::application::config::VisualizationConfig;
use crate::application::session::VisualizationSession;
use crate::domain::{
    errors::{AppError, DataResult},
    geography::{Projection, RegionIndex},
    logging::{LogComponent, get_logger},
    trades::MinuteHistogram,
};
use crate::infrastructure::{
    http::{LoadProgress, TradeDataClient},
    rendering::{BoundaryPainter, CanvasMarkerSurface, CanvasTimelineSurface},
    runtime::BrowserSession,
};
use crate::view_state::ViewLayout;
use web_sys::HtmlCanvasElement;

/// The three stacked canvases a map is drawn into.
#[derive(Clone)]
pub struct MapCanvases {
    pub boundary: HtmlCanvasElement,
    pub markers: HtmlCanvasElement,
    pub timeline: HtmlCanvasElement,
}

/// Current `innerWidth`/`innerHeight`.
pub fn viewport_size() -> DataResult<(f64, f64)> {
    let window =
        web_sys::window().ok_or_else(|| AppError::RenderingError("No window".to_string()))?;
    let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Ok((read(window.inner_width()), read(window.inner_height())))
}

/// Fetches both datasets, paints the boundary and wires up a ready-to-start
/// `BrowserSession`. Playback is started here only when `autoplay` is set.
pub async fn load_map<F>(
    config: VisualizationConfig,
    canvases: MapCanvases,
    width: f64,
    viewport_height: f64,
    on_progress: F,
) -> DataResult<BrowserSession>
where
    F: FnMut(LoadProgress),
{
    config.validate()?;
    let layout = ViewLayout::new(width, viewport_height, &config.layout);
    let client = TradeDataClient::new(&config.data.trades_url, &config.data.boundary_url);

    let boundary = client.load_boundary().await?;
    let index = client.load_trades(on_progress).await?;

    let projection = Projection::fit(&boundary, layout.padded_width, layout.padded_height)?;
    let paths = projection.project_boundary(&boundary);
    let offset = layout.map_offset();

    BoundaryPainter::new(&canvases.boundary, layout.width, layout.map_height, offset, &paths)?
        .paint()?;
    let markers = CanvasMarkerSurface::new(&canvases.markers, layout.width, layout.map_height, offset)?
        .with_regions(&paths)?;

    let track_width = paths
        .bounds()
        .map(|bounds| bounds.width)
        .filter(|width| *width > 0.0)
        .unwrap_or(layout.padded_width);
    let timeline = CanvasTimelineSurface::new(
        &canvases.timeline,
        layout.width,
        layout.timeline_height,
        track_width,
        config.timeline.max_bar_height,
    )?;

    let histogram = MinuteHistogram::from_index(&index);
    get_logger().info(
        LogComponent::Presentation("load_map"),
        &format!(
            "Map ready: {} features, {} buckets, peak {} trades/min",
            boundary.len(),
            index.bucket_count(),
            histogram.max_count()
        ),
    );

    let autoplay = config.playback.autoplay;
    let session = VisualizationSession::new(index, histogram, projection, layout, config)
        .with_track_width(track_width)
        .with_regions(RegionIndex::from_boundary(&boundary));
    let browser = BrowserSession::new(session, markers, timeline, canvases.timeline);
    if autoplay {
        browser.start();
    }
    Ok(browser)
}
