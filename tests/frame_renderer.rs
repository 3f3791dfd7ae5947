use muhurat_trade_map::application::config::{RadiusMode, RendererConfig, SideColors};
use muhurat_trade_map::application::frame_renderer::{FrameRenderer, MarkerSprite, MarkerSurface};
use muhurat_trade_map::domain::geography::{BoundaryCollection, Projection};
use muhurat_trade_map::domain::trades::{GeoPoint, Side, TradeEvent};

const SQUARE: &str = r#"{"type": "Feature", "properties": {"name": "Square"},
    "geometry": {"type": "Polygon", "coordinates": [[[70, 10], [90, 10], [90, 30], [70, 30], [70, 10]]]}}"#;

fn projection() -> Projection {
    let boundary = BoundaryCollection::from_json_str(SQUARE).unwrap();
    Projection::fit(&boundary, 400.0, 400.0).unwrap()
}

#[derive(Default)]
struct RecordingSurface {
    clears: usize,
    frames: Vec<Vec<MarkerSprite>>,
}

impl MarkerSurface for RecordingSurface {
    fn clear(&mut self) {
        self.clears += 1;
    }

    fn draw_markers(&mut self, sprites: &[MarkerSprite], _colors: &SideColors) {
        self.frames.push(sprites.to_vec());
    }
}

fn events(count: usize) -> Vec<TradeEvent> {
    (0..count)
        .map(|i| TradeEvent::at(12.0 + i as f64, 72.0 + i as f64, if i % 2 == 0 { Side::Buy } else { Side::Sell }))
        .collect()
}

#[test]
fn markers_shrink_and_fade_then_disappear() {
    let mut renderer = FrameRenderer::new(RendererConfig::default());
    assert_eq!(renderer.spawn_bucket(&events(1), &projection(), 0.0), 1);

    let fresh = renderer.advance(0.0);
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].radius, 3.0);
    assert_eq!(fresh[0].alpha, 1.0);
    let halo = fresh[0].halo.unwrap();
    assert_eq!((halo.radius, halo.alpha), (12.0, 0.1));

    let half = renderer.advance(6_000.0);
    assert!((half[0].radius - 1.5).abs() < 1e-9);
    assert!((half[0].alpha - 0.5).abs() < 1e-9);
    assert!((half[0].halo.unwrap().radius - 6.0).abs() < 1e-9);
    // The halo fades along with its marker.
    assert!((half[0].halo.unwrap().alpha - 0.05).abs() < 1e-9);

    assert!(renderer.advance(12_000.0).is_empty());
    assert_eq!(renderer.active_count(), 0);
    assert_eq!(renderer.spawned_total(), 1);
}

#[test]
fn render_frame_reports_when_nothing_is_left() {
    let mut renderer = FrameRenderer::new(RendererConfig::default());
    let mut surface = RecordingSurface::default();
    renderer.spawn_bucket(&events(4), &projection(), 100.0);

    assert!(renderer.render_frame(200.0, &mut surface));
    assert_eq!(surface.frames[0].len(), 4);
    assert!(!renderer.render_frame(100.0 + 12_000.0 + 16.0, &mut surface));
    assert_eq!(surface.clears, 2);
    assert_eq!(surface.frames.len(), 1);
}

#[test]
fn events_without_a_usable_location_are_skipped() {
    let mut renderer = FrameRenderer::new(RendererConfig::default());
    let events = vec![
        TradeEvent::new(None, Side::Buy, None),
        TradeEvent::at(f64::NAN, 80.0, Side::Sell),
        TradeEvent::at(95.0, 80.0, Side::Sell),
        TradeEvent::at(20.0, 80.0, Side::Sell),
    ];
    assert_eq!(renderer.spawn_bucket(&events, &projection(), 0.0), 1);
}

#[test]
fn clipping_drops_markers_outside_the_draw_box() {
    let far = vec![TradeEvent::at(-30.0, 150.0, Side::Buy)];

    let mut clipped = FrameRenderer::new(RendererConfig::default());
    assert_eq!(clipped.spawn_bucket(&far, &projection(), 0.0), 0);

    let config = RendererConfig { clip_to_draw_area: false, ..RendererConfig::default() };
    let mut unclipped = FrameRenderer::new(config);
    assert_eq!(unclipped.spawn_bucket(&far, &projection(), 0.0), 1);
}

#[test]
fn density_cap_keeps_one_marker_per_cell() {
    let config = RendererConfig { density_cell_px: Some(50.0), ..RendererConfig::default() };
    let mut renderer = FrameRenderer::new(config);
    let stacked: Vec<TradeEvent> = (0..10).map(|_| TradeEvent::at(20.0, 80.0, Side::Buy)).collect();
    assert_eq!(renderer.spawn_bucket(&stacked, &projection(), 0.0), 1);
    assert_eq!(renderer.active_count(), 1);
}

#[test]
fn amount_scaled_radius() {
    let config = RendererConfig { radius_mode: RadiusMode::amount_log(), halo: None, ..RendererConfig::default() };
    let mut renderer = FrameRenderer::new(config);
    let events = vec![TradeEvent::new(Some(GeoPoint::new(20.0, 80.0)), Side::Buy, Some(123_499.0))];
    renderer.spawn_bucket(&events, &projection(), 0.0);

    let sprite = renderer.advance(0.0)[0];
    assert!((sprite.radius - 14.0).abs() < 1e-9);
    assert_eq!(sprite.halo, None);
}

#[test]
fn clear_removes_live_markers_but_keeps_the_total() {
    let mut renderer = FrameRenderer::new(RendererConfig::default());
    renderer.spawn_bucket(&events(3), &projection(), 0.0);
    renderer.clear();
    assert_eq!(renderer.active_count(), 0);
    assert_eq!(renderer.spawned_total(), 3);
}
