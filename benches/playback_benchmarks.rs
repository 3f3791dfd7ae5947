use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use muhurat_trade_map::application::config::RendererConfig;
use muhurat_trade_map::application::frame_renderer::FrameRenderer;
use muhurat_trade_map::domain::geography::{BoundaryCollection, Projection};
use muhurat_trade_map::domain::trades::{BucketKey, MinuteHistogram, Side, TradeEvent, TradeEventIndex};
use std::hint::black_box;
use std::time::Duration;

const INDIA_BOX: &str = r#"{"type": "Feature", "properties": {"name": "Box"},
    "geometry": {"type": "Polygon", "coordinates": [[[68, 8], [97, 8], [97, 37], [68, 37], [68, 8]]]}}"#;

/// Flat trade records spread over a one-hour session.
fn generate_trade_json(count: usize) -> String {
    let records: Vec<String> = (0..count)
        .map(|i| {
            let timestamp = 1_730_467_800_000_u64 + (i as u64 * 3_600_000 / count as u64);
            let latitude = 8.0 + (i as f64 * 0.37).sin().abs() * 29.0;
            let longitude = 68.0 + (i as f64 * 0.73).cos().abs() * 29.0;
            let side = if i % 3 == 0 { "S" } else { "B" };
            format!(
                r#"{{"timestamp": {}, "location": {{"latitude": "{:.4}", "longitude": {:.4}}}, "buy_sell": "{}"}}"#,
                timestamp, latitude, longitude, side
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

fn generate_events(count: usize) -> Vec<TradeEvent> {
    (0..count)
        .map(|i| {
            let latitude = 8.0 + (i as f64 * 0.37).sin().abs() * 29.0;
            let longitude = 68.0 + (i as f64 * 0.73).cos().abs() * 29.0;
            TradeEvent::at(latitude, longitude, if i % 2 == 0 { Side::Buy } else { Side::Sell })
        })
        .collect()
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");
    group.measurement_time(Duration::from_secs(10));

    for count in [1_000, 10_000, 50_000] {
        let json = generate_trade_json(count);
        group.bench_with_input(BenchmarkId::new("from_json", count), &json, |b, json| {
            b.iter(|| {
                let index = TradeEventIndex::from_json_str(black_box(json)).unwrap();
                black_box(MinuteHistogram::from_index(&index))
            });
        });
    }
    group.finish();
}

fn bench_marker_advance(c: &mut Criterion) {
    let boundary = BoundaryCollection::from_json_str(INDIA_BOX).unwrap();
    let projection = Projection::fit(&boundary, 1200.0, 900.0).unwrap();
    let mut group = c.benchmark_group("marker_advance");

    for count in [1_000, 10_000, 40_000] {
        let events = generate_events(count);
        group.bench_with_input(BenchmarkId::new("spawn_and_fade", count), &events, |b, events| {
            b.iter(|| {
                let mut renderer = FrameRenderer::new(RendererConfig::default());
                renderer.spawn_bucket(events, &projection, 0.0);
                // Sixty frames of one second of playback.
                for frame in 0..60 {
                    black_box(renderer.advance(f64::from(frame) * 16.7));
                }
            });
        });
    }
    group.finish();
}

fn bench_seek(c: &mut Criterion) {
    let index = TradeEventIndex::from_events(
        (0..100_000u64).map(|i| (BucketKey::from(i * 1_000), TradeEvent::at(20.0, 78.0, Side::Buy))),
    );
    c.bench_function("nearest_key_100k", |b| {
        b.iter(|| black_box(index.nearest_key(black_box(49_999_500.0))))
    });
}

criterion_group!(benches, bench_index_build, bench_marker_advance, bench_seek);
criterion_main!(benches);
