use muhurat_trade_map::application::config::TimelineConfig;
use muhurat_trade_map::application::timeline::{TimelineFrame, TimelineLayout};
use muhurat_trade_map::domain::playback::ScrubPreview;
use muhurat_trade_map::domain::trades::{BucketKey, MinuteHistogram, Side, TradeEvent, TradeEventIndex};

fn histogram() -> MinuteHistogram {
    let stamps = [0, 10_000, 60_000, 120_000, 120_000, 125_000, 130_000];
    let index = TradeEventIndex::from_events(
        stamps.iter().map(|ms| (BucketKey::from(*ms), TradeEvent::at(20.0, 78.0, Side::Buy))),
    );
    MinuteHistogram::from_index(&index)
}

fn layout() -> TimelineLayout {
    TimelineLayout::new(
        100.0,
        &histogram(),
        BucketKey::from(0),
        BucketKey::from(120_000),
        TimelineConfig::default(),
    )
}

fn describe(frame: &TimelineFrame) -> String {
    let mut lines: Vec<String> = frame
        .bars
        .iter()
        .map(|bar| format!("bar {} x={} w={} h={}", bar.minute, bar.x, bar.width, bar.height))
        .collect();
    lines.push(format!(
        "progress={} handle={} dragging={}",
        frame.progress_width, frame.handle_x, frame.dragging
    ));
    lines.push(format!("{} | {} | {}", frame.start_label, frame.end_label, frame.current_label));
    lines.join("\n")
}

#[test]
fn bars_are_revealed_up_to_the_current_minute() {
    let frame = layout().frame(BucketKey::from(60_000), None);
    insta::assert_snapshot!(describe(&frame), @r"
    bar 0 x=0 w=49 h=25
    bar 60000 x=50 w=49 h=12.5
    progress=50 handle=50 dragging=false
    5:30 AM | 5:32 AM | 5:31:00 AM
    ");
}

#[test]
fn every_bar_shows_at_the_end() {
    let layout = layout();
    assert_eq!(layout.bars().len(), 3);
    assert_eq!(layout.revealed_bars(BucketKey::from(120_000)).len(), 3);
    assert_eq!(layout.bars()[2].height, 50.0);
    assert_eq!(layout.bars()[2].x, 100.0);
}

#[test]
fn drag_preview_moves_handle_and_label_only() {
    let preview = ScrubPreview { fraction: 0.25, handle_x: 25.0, time: 30_000.0 };
    let frame = layout().frame(BucketKey::from(0), Some(preview));
    insta::assert_snapshot!(describe(&frame), @r"
    bar 0 x=0 w=49 h=25
    progress=0 handle=25 dragging=true
    5:30 AM | 5:32 AM | 5:30:30 AM
    ");
}

#[test]
fn single_bucket_range_has_one_full_width_bar() {
    let index = TradeEventIndex::from_events([(BucketKey::from(5_000), TradeEvent::at(20.0, 78.0, Side::Sell))]);
    let histogram = MinuteHistogram::from_index(&index);
    let layout = TimelineLayout::new(
        80.0,
        &histogram,
        BucketKey::from(5_000),
        BucketKey::from(5_000),
        TimelineConfig::default(),
    );
    let frame = layout.frame(BucketKey::from(5_000), None);
    assert_eq!(frame.bars.len(), 1);
    assert_eq!(frame.bars[0].width, 79.0);
    assert_eq!(frame.progress_width, 0.0);
}

#[test]
fn padding_insets_bar_positions() {
    let config = TimelineConfig { histogram_padding: 10.0, ..TimelineConfig::default() };
    let layout = TimelineLayout::new(100.0, &histogram(), BucketKey::from(0), BucketKey::from(120_000), config);
    let xs: Vec<f64> = layout.bars().iter().map(|bar| bar.x).collect();
    assert_eq!(xs, vec![10.0, 50.0, 90.0]);
    // Two minutes share the 80 px between the paddings.
    assert!(layout.bars().iter().all(|bar| bar.width == 39.0));
}

#[test]
fn narrow_tracks_keep_bars_visible() {
    let layout = TimelineLayout::new(
        10.0,
        &histogram(),
        BucketKey::from(0),
        BucketKey::from(120_000),
        TimelineConfig::default(),
    );
    assert!(layout.bars().iter().all(|bar| bar.width >= 1.0));
}
