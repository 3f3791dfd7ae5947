use leptos::ev::EventDescriptor;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event};

#[derive(Clone, Debug)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false }
    }
}

/// A window listener that is removed when dropped.
pub struct WindowListener {
    event_name: String,
    callback: Closure<dyn FnMut(Event)>,
    capture: bool,
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback_and_bool(
                &self.event_name,
                self.callback.as_ref().unchecked_ref(),
                self.capture,
            );
        }
    }
}

pub fn listen_window<E>(
    event: E,
    options: &EventOptions,
    mut cb: impl FnMut(E::EventType) + 'static,
) -> WindowListener
where
    E: EventDescriptor + 'static,
    E::EventType: JsCast,
{
    let opts = AddEventListenerOptions::new();
    opts.set_passive(options.passive);
    opts.set_capture(options.capture);

    let event_name = event.name().into_owned();
    let callback = Closure::wrap(Box::new(move |ev: Event| {
        cb(ev.unchecked_into::<E::EventType>());
    }) as Box<dyn FnMut(Event)>);

    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            &event_name,
            callback.as_ref().unchecked_ref(),
            &opts,
        );
    }

    WindowListener { event_name, callback, capture: options.capture }
}

/// Window-level pointer move/up listeners for timeline dragging, so a drag
/// keeps tracking after the pointer leaves the canvas. Moves outside a drag
/// are ignored by the gesture itself. Must not be dropped from inside one of
/// its own callbacks.
pub struct PointerListeners {
    _move: WindowListener,
    _up: WindowListener,
}

impl PointerListeners {
    pub fn attach(
        on_move: impl FnMut(web_sys::PointerEvent) + 'static,
        on_up: impl FnMut(web_sys::PointerEvent) + 'static,
    ) -> Self {
        let options = EventOptions::default();
        Self {
            _move: listen_window(leptos::ev::pointermove, &options, on_move),
            _up: listen_window(leptos::ev::pointerup, &options, on_up),
        }
    }
}
