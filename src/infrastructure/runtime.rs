use crate::application::frame_renderer::MarkerSurface;
use crate::application::session::{TickReport, VisualizationSession};
use crate::application::timeline::TimelineSurface;
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::trades::BucketKey;
use crate::event_utils::PointerListeners;
use crate::global_state::{active_markers, clock_state, current_bucket, is_dragging};
use crate::infrastructure::rendering::{CanvasMarkerSurface, CanvasTimelineSurface};
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::{Interval, Timeout};
use leptos::{SignalGetUntracked, SignalSet};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use web_sys::HtmlCanvasElement;

/// Pointer-downs farther than this many handle radii from the handle are
/// treated as clicks on the track rather than drags.
const HANDLE_GRAB_RADII: f64 = 2.0;

/// `performance.now()`, the same clock `requestAnimationFrame` stamps frames with.
pub fn now_ms() -> f64 {
    web_sys::window().and_then(|window| window.performance()).map(|p| p.now()).unwrap_or(0.0)
}

struct Runtime {
    session: VisualizationSession,
    markers: CanvasMarkerSurface,
    timeline: CanvasTimelineSurface,
    timeline_canvas: HtmlCanvasElement,
    interval: Option<Interval>,
    frame: Option<AnimationFrame>,
    debounce: Option<Timeout>,
    pointer: Option<PointerListeners>,
    /// Set when a drag ends; the browser follows it with a `click` that must not seek again.
    swallow_click: bool,
}

impl Runtime {
    fn draw_timeline(&mut self) {
        if let Some(frame) = self.session.timeline_frame() {
            self.timeline.draw_timeline(&frame);
        }
    }

    fn publish(&self) {
        let snapshot = self.session.snapshot();
        if clock_state().get_untracked() != snapshot.state {
            clock_state().set(snapshot.state);
        }
        if current_bucket().get_untracked() != snapshot.current {
            current_bucket().set(snapshot.current);
        }
    }

    fn track_x(&self, client_x: f64) -> f64 {
        let left = self.timeline_canvas.get_bounding_client_rect().left();
        self.timeline.track_x(client_x - left)
    }
}

/// Browser driver for a `VisualizationSession`: owns the tick interval, the
/// animation-frame loop, the scrub debounce timeout and the canvases.
/// Callbacks hold only a `Weak` to the shared state, and never keep a borrow
/// while scheduling.
pub struct BrowserSession {
    inner: Rc<RefCell<Runtime>>,
}

impl BrowserSession {
    pub fn new(
        session: VisualizationSession,
        markers: CanvasMarkerSurface,
        timeline: CanvasTimelineSurface,
        timeline_canvas: HtmlCanvasElement,
    ) -> Self {
        let inner = Rc::new(RefCell::new(Runtime {
            session,
            markers,
            timeline,
            timeline_canvas,
            interval: None,
            frame: None,
            debounce: None,
            pointer: None,
            swallow_click: false,
        }));
        Self { inner }
    }

    /// Starts playback: an immediate tick, then one every `tick_interval_ms`.
    pub fn start(&self) {
        let started = self.inner.borrow_mut().session.start();
        self.attach_pointer_listeners();
        if started {
            start_ticking(&self.inner);
        } else {
            self.inner.borrow_mut().draw_timeline();
        }
    }

    /// Plays again from the first bucket once playback has finished.
    pub fn replay(&self) {
        let restarted = self.inner.borrow_mut().session.restart();
        if restarted {
            start_ticking(&self.inner);
        }
    }

    fn attach_pointer_listeners(&self) {
        let move_weak = Rc::downgrade(&self.inner);
        let up_weak = Rc::downgrade(&self.inner);
        let listeners = PointerListeners::attach(
            move |event| {
                if let Some(inner) = move_weak.upgrade() {
                    on_pointer_move(&inner, event.client_x() as f64);
                }
            },
            move |event| {
                if let Some(inner) = up_weak.upgrade() {
                    on_pointer_up(&inner, event.client_x() as f64);
                }
            },
        );
        self.inner.borrow_mut().pointer = Some(listeners);
    }

    /// `pointerdown` on the timeline canvas. Starts a drag only when the
    /// pointer lands on the handle.
    pub fn pointer_down(&self, client_x: f64) -> bool {
        let mut runtime = self.inner.borrow_mut();
        let x = runtime.track_x(client_x);
        let Some(frame) = runtime.session.timeline_frame() else {
            return false;
        };
        if (x - frame.handle_x).abs() > frame.handle_radius * HANDLE_GRAB_RADII {
            return false;
        }
        if runtime.session.pointer_down(x).is_none() {
            return false;
        }
        runtime.draw_timeline();
        is_dragging().set(true);
        true
    }

    /// `click` on the timeline track: seeks once the debounce settles.
    pub fn click(&self, client_x: f64) {
        let now = now_ms();
        let scheduled = {
            let mut runtime = self.inner.borrow_mut();
            if std::mem::take(&mut runtime.swallow_click) || runtime.session.is_dragging() {
                false
            } else {
                let x = runtime.track_x(client_x);
                runtime.session.click(x, now).is_some()
            }
        };
        if scheduled {
            schedule_debounce(&self.inner, now);
        }
    }

    pub fn seek_fraction(&self, fraction: f64) -> Option<BucketKey> {
        let key = self.inner.borrow_mut().session.seek_fraction(fraction, now_ms());
        after_seek(&self.inner);
        key
    }

    pub fn snapshot(&self) -> crate::application::session::SessionSnapshot {
        self.inner.borrow().session.snapshot()
    }

    /// Stops every timer, frame and listener and clears the markers.
    pub fn teardown(&self) {
        let mut runtime = self.inner.borrow_mut();
        runtime.interval = None;
        runtime.frame = None;
        runtime.debounce = None;
        runtime.pointer = None;
        runtime.session.teardown();
        runtime.markers.clear();
        is_dragging().set(false);
        active_markers().set(0);
        get_logger().debug(LogComponent::Infrastructure("BrowserSession"), "Torn down");
    }
}

fn start_ticking(inner: &Rc<RefCell<Runtime>>) {
    on_tick(inner);
    let interval_ms = inner.borrow().session.config().playback.tick_interval_ms;
    let weak = Rc::downgrade(inner);
    let interval = Interval::new(interval_ms, move || {
        if let Some(inner) = weak.upgrade() {
            on_tick(&inner);
        }
    });
    inner.borrow_mut().interval = Some(interval);
}

fn on_tick(inner: &Rc<RefCell<Runtime>>) {
    let report: TickReport = {
        let mut runtime = inner.borrow_mut();
        let report = runtime.session.on_tick(now_ms());
        runtime.draw_timeline();
        runtime.publish();
        if report.finished {
            runtime.interval = None;
        }
        report
    };
    if report.needs_frames() {
        ensure_frame_loop(inner);
    }
}

fn ensure_frame_loop(inner: &Rc<RefCell<Runtime>>) {
    if inner.borrow().frame.is_some() {
        return;
    }
    schedule_frame(inner);
}

fn schedule_frame(inner: &Rc<RefCell<Runtime>>) {
    let weak: Weak<RefCell<Runtime>> = Rc::downgrade(inner);
    let handle = request_animation_frame(move |timestamp| {
        if let Some(inner) = weak.upgrade() {
            on_frame(&inner, timestamp);
        }
    });
    inner.borrow_mut().frame = Some(handle);
}

fn on_frame(inner: &Rc<RefCell<Runtime>>, timestamp: f64) {
    let keep_going = {
        let mut runtime = inner.borrow_mut();
        runtime.frame = None;
        let Runtime { session, markers, .. } = &mut *runtime;
        let keep_going = session.on_frame(timestamp, markers);
        let count = session.renderer().active_count();
        if active_markers().get_untracked() != count {
            active_markers().set(count);
        }
        keep_going
    };
    if keep_going {
        schedule_frame(inner);
    }
}

fn on_pointer_move(inner: &Rc<RefCell<Runtime>>, client_x: f64) {
    let now = now_ms();
    let moved = {
        let mut runtime = inner.borrow_mut();
        let x = runtime.track_x(client_x);
        let moved = runtime.session.pointer_move(x, now).is_some();
        if moved {
            runtime.draw_timeline();
        }
        moved
    };
    if moved {
        schedule_debounce(inner, now);
    }
}

fn on_pointer_up(inner: &Rc<RefCell<Runtime>>, client_x: f64) {
    let landed = {
        let mut runtime = inner.borrow_mut();
        let x = runtime.track_x(client_x);
        let landed = runtime.session.pointer_up(x, now_ms());
        if landed.is_some() {
            runtime.debounce = None;
            runtime.swallow_click = true;
        }
        landed
    };
    if landed.is_some() {
        is_dragging().set(false);
        after_seek(inner);
    }
}

/// (Re)arms the debounce timeout for the session's pending scrub.
fn schedule_debounce(inner: &Rc<RefCell<Runtime>>, now: f64) {
    let Some(deadline) = inner.borrow().session.scrub_deadline() else {
        return;
    };
    let delay = (deadline - now).max(0.0).ceil() as u32;
    let weak = Rc::downgrade(inner);
    let timeout = Timeout::new(delay, move || {
        if let Some(inner) = weak.upgrade() {
            let landed = inner.borrow_mut().session.poll_scrub(now_ms());
            if landed.is_some() {
                after_seek(&inner);
            }
        }
    });
    inner.borrow_mut().debounce = Some(timeout);
}

fn after_seek(inner: &Rc<RefCell<Runtime>>) {
    {
        let mut runtime = inner.borrow_mut();
        runtime.draw_timeline();
        runtime.publish();
    }
    ensure_frame_loop(inner);
}
