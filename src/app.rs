use futures::future::{AbortHandle, Abortable};
use leptos::html::Canvas;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    application::config::VisualizationConfig,
    domain::{
        logging::{LogComponent, get_logger},
        playback::ClockState,
        trades::BucketKey,
    },
    global_state::{
        active_markers, clock_state, current_bucket, is_loading, load_error, load_percent, logs,
        logs_paused,
    },
    infrastructure::runtime::BrowserSession,
    log_error,
    presentation::bootstrap::{MapCanvases, load_map, viewport_size},
    time_utils::format_hour_minute_second,
};

/// Root component: the trade map with its loading overlay.
#[component]
pub fn App(
    #[prop(optional)] config: Option<VisualizationConfig>,
    #[prop(optional)] debug_console: bool,
) -> impl IntoView {
    let config = config.unwrap_or_default();

    view! {
        <style>
            {r#"
            .trade-map-app {
                background: #181818;
                color: #ffffff;
                font-family: Inter, -apple-system, BlinkMacSystemFont, sans-serif;
                min-height: 100vh;
            }

            .map-stack {
                position: relative;
            }

            .map-stack canvas {
                display: block;
            }

            .map-stack .overlay {
                position: absolute;
                top: 0;
                left: 0;
                pointer-events: none;
            }

            .timeline-canvas {
                cursor: pointer;
                touch-action: none;
            }

            .loading {
                position: absolute;
                inset: 0;
                display: flex;
                align-items: center;
                justify-content: center;
                font-size: 14px;
                color: #cccccc;
            }

            .map-status {
                font-size: 12px;
                color: #a0a0a0;
                text-align: center;
                padding: 8px;
            }

            .debug-console {
                background: #101010;
                border-top: 1px solid #2e2e2e;
                font-family: monospace;
                font-size: 11px;
                max-height: 200px;
                overflow-y: auto;
                padding: 8px;
            }

            .debug-btn {
                background: #2e2e2e;
                border: none;
                color: #ffffff;
                margin-left: 8px;
                padding: 2px 8px;
            }
            "#}
        </style>
        <div class="trade-map-app">
            <MapView config=config />
            <Show when=move || debug_console>
                <DebugConsole />
            </Show>
        </div>
    }
}

/// Boundary, marker and timeline canvases plus the session driving them.
#[component]
fn MapView(config: VisualizationConfig) -> impl IntoView {
    let utc_offset_minutes = config.timeline.utc_offset_minutes;
    let boundary_ref = create_node_ref::<Canvas>();
    let markers_ref = create_node_ref::<Canvas>();
    let timeline_ref = create_node_ref::<Canvas>();

    let browser: Rc<RefCell<Option<BrowserSession>>> = Rc::new(RefCell::new(None));
    let (abort_handle, abort_registration) = AbortHandle::new_pair();
    let registration = Rc::new(RefCell::new(Some(abort_registration)));

    {
        let browser = browser.clone();
        create_effect(move |_| {
            let (Some(boundary), Some(markers), Some(timeline)) =
                (boundary_ref.get(), markers_ref.get(), timeline_ref.get())
            else {
                return;
            };
            // Runs once: the registration is consumed by the first load.
            let Some(registration) = registration.borrow_mut().take() else {
                return;
            };
            let canvases = MapCanvases {
                boundary: (*boundary).clone(),
                markers: (*markers).clone(),
                timeline: (*timeline).clone(),
            };
            let config = config.clone();
            let browser = browser.clone();
            spawn_local(async move {
                let load = async move {
                    let (width, height) = viewport_size()?;
                    load_map(config, canvases, width, height, |progress| {
                        load_percent().set(progress.percent());
                    })
                    .await
                };
                match Abortable::new(load, registration).await {
                    Ok(Ok(session)) => {
                        browser.borrow_mut().replace(session);
                        load_error().set(None);
                    }
                    Ok(Err(error)) => {
                        log_error!(LogComponent::Presentation("MapView"), "Map failed to load: {}", error);
                        load_error().set(Some(error.to_string()));
                    }
                    Err(_) => {
                        get_logger().debug(LogComponent::Presentation("MapView"), "Load aborted");
                    }
                }
                is_loading().set(false);
            });
        });
    }

    {
        let browser = browser.clone();
        on_cleanup(move || {
            abort_handle.abort();
            if let Some(session) = browser.borrow_mut().take() {
                session.teardown();
            }
        });
    }

    let on_pointer_down = {
        let browser = browser.clone();
        move |event: web_sys::PointerEvent| {
            if let Some(session) = browser.borrow().as_ref() {
                if session.pointer_down(event.client_x() as f64) {
                    event.prevent_default();
                }
            }
        }
    };

    let on_click = {
        let browser = browser.clone();
        move |event: web_sys::MouseEvent| {
            if let Some(session) = browser.borrow().as_ref() {
                session.click(event.client_x() as f64);
            }
        }
    };

    let on_replay = move |_: web_sys::MouseEvent| {
        if let Some(session) = browser.borrow().as_ref() {
            session.replay();
        }
    };

    view! {
        <div class="map-stack">
            <canvas node_ref=boundary_ref />
            <canvas class="overlay" node_ref=markers_ref />
            <Show when=move || is_loading().get()>
                <LoadingIndicator />
            </Show>
        </div>
        <canvas
            class="timeline-canvas"
            node_ref=timeline_ref
            on:pointerdown=on_pointer_down
            on:click=on_click
        />
        <div class="map-status">
            {move || {
                status_line(
                    clock_state().get(),
                    current_bucket().get(),
                    active_markers().get(),
                    utc_offset_minutes,
                )
            }}
            <Show when=move || clock_state().get() == ClockState::Finished>
                <button class="debug-btn" on:click=on_replay.clone()>"Replay"</button>
            </Show>
        </div>
    }
}

fn status_line(
    state: ClockState,
    current: Option<BucketKey>,
    markers: usize,
    utc_offset_minutes: i32,
) -> String {
    match current {
        Some(key) => format!(
            "{} · {} · {} markers",
            state,
            format_hour_minute_second(key.as_f64(), utc_offset_minutes),
            markers
        ),
        None => state.to_string(),
    }
}

/// Percentage while the trade file streams in; indeterminate without a length.
#[component]
fn LoadingIndicator() -> impl IntoView {
    view! {
        <div class="loading">
            {move || match load_percent().get() {
                Some(percent) => format!("Loading trades… {}%", percent),
                None => "Loading trades…".to_string(),
            }}
        </div>
    }
}

/// On-page view of the log lines mirrored by the console logger.
#[component]
fn DebugConsole() -> impl IntoView {
    let is_paused = logs_paused();

    view! {
        <div class="debug-console">
            <div>
                <span>"Log"</span>
                <button
                    class="debug-btn"
                    on:click=move |_| {
                        is_paused.update(|paused| *paused = !*paused);
                        get_logger().info(
                            LogComponent::Presentation("DebugConsole"),
                            if is_paused.get_untracked() { "Logging paused" } else { "Logging resumed" },
                        );
                    }
                >
                    {move || if is_paused.get() { "Resume" } else { "Pause" }}
                </button>
                <button class="debug-btn" on:click=move |_| logs().set(Vec::new())>
                    "Clear"
                </button>
            </div>
            <For
                each=move || logs().get().into_iter().enumerate()
                key=|(index, line)| (*index, line.clone())
                children=move |(_, line)| view! { <div class="log-line">{line}</div> }
            />
        </div>
    }
}
