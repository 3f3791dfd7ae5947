use futures::future::{AbortHandle, Abortable};
use js_sys::Promise;
use leptos::SignalSet;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlCanvasElement;

use crate::application::config::VisualizationConfig;
use crate::domain::logging::{LogComponent, get_logger};
use crate::global_state::{is_loading, load_percent};
use crate::infrastructure::runtime::BrowserSession;
use crate::presentation::bootstrap::{MapCanvases, load_map, viewport_size};

/// JavaScript handle for hosts that drive the map without the Leptos view.
///
/// ```js
/// const map = new MuhuratMapApi(JSON.stringify({ playback: { autoplay: false } }));
/// await map.load(boundaryCanvas, markerCanvas, timelineCanvas);
/// map.start();
/// ```
#[wasm_bindgen]
pub struct MuhuratMapApi {
    config: VisualizationConfig,
    session: Rc<RefCell<Option<BrowserSession>>>,
    pending_load: Option<AbortHandle>,
}

#[wasm_bindgen]
impl MuhuratMapApi {
    /// `config_json` may be omitted or partial; missing fields take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<MuhuratMapApi, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => VisualizationConfig::from_json(json)?,
            _ => VisualizationConfig::default(),
        };
        Ok(Self { config, session: Rc::new(RefCell::new(None)), pending_load: None })
    }

    #[wasm_bindgen(js_name = defaultConfig)]
    pub fn default_config() -> Result<String, JsValue> {
        serde_json::to_string(&VisualizationConfig::default())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Fetches the datasets and prepares the canvases. Resolves with the
    /// session snapshot as JSON. Any previous session is torn down first.
    pub fn load(
        &mut self,
        boundary: HtmlCanvasElement,
        markers: HtmlCanvasElement,
        timeline: HtmlCanvasElement,
    ) -> Promise {
        self.teardown();
        let (handle, registration) = AbortHandle::new_pair();
        self.pending_load = Some(handle);

        let config = self.config.clone();
        let slot = self.session.clone();
        let canvases = MapCanvases { boundary, markers, timeline };
        future_to_promise(async move {
            is_loading().set(true);
            let load = async move {
                let (width, height) = viewport_size()?;
                load_map(config, canvases, width, height, |progress| {
                    load_percent().set(progress.percent());
                })
                .await
            };
            let outcome = Abortable::new(load, registration).await;
            is_loading().set(false);
            match outcome {
                Ok(Ok(session)) => {
                    let snapshot = serde_json::to_string(&session.snapshot())
                        .map_err(|e| JsValue::from_str(&e.to_string()))?;
                    slot.borrow_mut().replace(session);
                    Ok(JsValue::from_str(&snapshot))
                }
                Ok(Err(error)) => {
                    get_logger().error(
                        LogComponent::Presentation("MuhuratMapApi"),
                        &format!("Load failed: {}", error),
                    );
                    Err(error.into())
                }
                Err(_) => Err(JsValue::from_str("load aborted")),
            }
        })
    }

    /// Starts playback when loaded with `autoplay: false`.
    pub fn start(&self) {
        if let Some(session) = self.session.borrow().as_ref() {
            session.start();
        }
    }

    pub fn replay(&self) {
        if let Some(session) = self.session.borrow().as_ref() {
            session.replay();
        }
    }

    /// Jumps to the bucket nearest `fraction` of the time range; returns its key.
    #[wasm_bindgen(js_name = seekFraction)]
    pub fn seek_fraction(&self, fraction: f64) -> Option<f64> {
        let session = self.session.borrow();
        session.as_ref()?.seek_fraction(fraction).map(|key| key.as_f64())
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, client_x: f64) -> bool {
        self.session.borrow().as_ref().is_some_and(|session| session.pointer_down(client_x))
    }

    pub fn click(&self, client_x: f64) {
        if let Some(session) = self.session.borrow().as_ref() {
            session.click(client_x);
        }
    }

    /// Playback state as JSON, or `null` before `load` resolves.
    pub fn snapshot(&self) -> Result<Option<String>, JsValue> {
        self.session
            .borrow()
            .as_ref()
            .map(|session| serde_json::to_string(&session.snapshot()))
            .transpose()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Cancels a pending load, stops timers and listeners and clears markers.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending_load.take() {
            handle.abort();
        }
        if let Some(session) = self.session.borrow_mut().take() {
            session.teardown();
        }
    }
}

impl Drop for MuhuratMapApi {
    fn drop(&mut self) {
        self.teardown();
    }
}
