use muhurat_trade_map::domain::playback::{Debouncer, ScrubGesture, Scrubber};

fn gesture() -> ScrubGesture {
    ScrubGesture::new(Scrubber::new(200.0), (0.0, 10_000.0), 150.0)
}

#[test]
fn pointer_maps_to_clamped_fraction_and_time() {
    let scrubber = Scrubber::new(200.0);
    assert_eq!(scrubber.fraction_at(50.0), 0.25);
    assert_eq!(scrubber.fraction_at(-20.0), 0.0);
    assert_eq!(scrubber.fraction_at(500.0), 1.0);
    assert_eq!(scrubber.handle_x(0.25), 50.0);
    assert_eq!(scrubber.time_at(0.25, 1000.0, 5000.0), 2000.0);
}

#[test]
fn zero_width_track_pins_to_start() {
    let scrubber = Scrubber::new(0.0);
    assert_eq!(scrubber.fraction_at(10.0), 0.0);
}

#[test]
fn debouncer_keeps_only_the_latest_value() {
    let mut debouncer = Debouncer::new(150.0);
    debouncer.schedule(1, 0.0);
    debouncer.schedule(2, 100.0);
    assert_eq!(debouncer.poll(200.0), None);
    assert_eq!(debouncer.deadline(), Some(250.0));
    assert_eq!(debouncer.poll(250.0), Some(2));
    assert!(!debouncer.is_pending());
    assert_eq!(debouncer.poll(1000.0), None);
}

#[test]
fn cancelled_debounce_never_fires() {
    let mut debouncer = Debouncer::new(150.0);
    debouncer.schedule("seek", 0.0);
    debouncer.cancel();
    assert_eq!(debouncer.poll(500.0), None);
}

#[test]
fn drag_previews_without_committing() {
    let mut gesture = gesture();
    assert_eq!(gesture.pointer_move(20.0, 0.0), None);

    let preview = gesture.pointer_down(100.0);
    assert_eq!(preview.fraction, 0.5);
    assert_eq!(preview.time, 5000.0);
    assert!(gesture.is_dragging());

    let moved = gesture.pointer_move(150.0, 10.0).unwrap();
    assert_eq!(moved.handle_x, 150.0);
    assert_eq!(gesture.preview(), Some(moved));
    assert_eq!(gesture.poll(100.0), None);
    assert_eq!(gesture.pending_deadline(), Some(160.0));
}

#[test]
fn release_commits_immediately_and_drops_pending_debounce() {
    let mut gesture = gesture();
    gesture.pointer_down(0.0);
    gesture.pointer_move(40.0, 0.0);
    let commit = gesture.pointer_up(60.0).unwrap();
    assert_eq!(commit.fraction, 0.3);
    assert!(!gesture.is_dragging());
    assert_eq!(gesture.preview(), None);
    assert_eq!(gesture.poll(10_000.0), None);
    assert_eq!(gesture.pointer_up(60.0), None);
}

#[test]
fn paused_drag_commits_after_the_quiet_period() {
    let mut gesture = gesture();
    gesture.pointer_down(0.0);
    gesture.pointer_move(50.0, 1000.0);
    assert_eq!(gesture.poll(1149.0), None);
    assert_eq!(gesture.poll(1150.0).map(|c| c.fraction), Some(0.25));
    assert!(gesture.is_dragging());
}

#[test]
fn clicks_are_debounced() {
    let mut gesture = gesture();
    gesture.click(20.0, 0.0);
    gesture.click(180.0, 50.0);
    assert_eq!(gesture.poll(150.0), None);
    assert_eq!(gesture.poll(200.0).map(|c| c.fraction), Some(0.9));
}

#[test]
fn reset_forgets_everything() {
    let mut gesture = gesture();
    gesture.pointer_down(10.0);
    gesture.pointer_move(30.0, 0.0);
    gesture.reset();
    assert!(!gesture.is_dragging());
    assert_eq!(gesture.pending_deadline(), None);
    assert_eq!(gesture.preview(), None);
}
