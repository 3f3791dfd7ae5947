use crate::domain::{
    errors::{AppError, NetworkResult},
    geography::BoundaryCollection,
    logging::{LogComponent, get_logger},
    trades::TradeEventIndex,
};
use gloo::net::http::{Request, Response};
use js_sys::{Reflect, Uint8Array};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::ReadableStreamDefaultReader;

/// Bytes received so far, against `Content-Length` when the server sent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LoadProgress {
    pub received: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    /// Completed share in `[0, 1]`; `None` while the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(0) => Some(1.0),
            Some(total) => Some((self.received as f64 / total as f64).min(1.0)),
            None => None,
        }
    }

    /// Whole percent for the loading indicator.
    pub fn percent(&self) -> Option<u8> {
        self.fraction().map(|fraction| (fraction * 100.0).round() as u8)
    }
}

/// Single-GET loader for the trade and boundary datasets.
#[derive(Clone, Debug)]
pub struct TradeDataClient {
    trades_url: String,
    boundary_url: String,
}

impl TradeDataClient {
    pub fn new(trades_url: impl Into<String>, boundary_url: impl Into<String>) -> Self {
        Self { trades_url: trades_url.into(), boundary_url: boundary_url.into() }
    }

    pub async fn load_trades<F>(&self, on_progress: F) -> NetworkResult<TradeEventIndex>
    where
        F: FnMut(LoadProgress),
    {
        let bytes = fetch_with_progress(&self.trades_url, on_progress).await?;
        let index = TradeEventIndex::from_json_slice(&bytes)?;
        get_logger().info(
            LogComponent::Infrastructure("TradeDataClient"),
            &format!(
                "Loaded {} trades in {} buckets from {}",
                index.total_events(),
                index.bucket_count(),
                self.trades_url
            ),
        );
        Ok(index)
    }

    pub async fn load_boundary(&self) -> NetworkResult<BoundaryCollection> {
        let bytes = fetch_with_progress(&self.boundary_url, |_| {}).await?;
        BoundaryCollection::from_json_slice(&bytes)
    }
}

/// GET `url`, reporting progress as body chunks arrive. The body is returned
/// whole once the stream ends.
pub async fn fetch_with_progress<F>(url: &str, mut on_progress: F) -> NetworkResult<Vec<u8>>
where
    F: FnMut(LoadProgress),
{
    get_logger().debug(
        LogComponent::Infrastructure("TradeDataClient"),
        &format!("Fetching {}", url),
    );

    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to send request: {:?}", e)))?;

    if !response.ok() {
        return Err(AppError::NetworkError(format!(
            "HTTP error: {} - {}",
            response.status(),
            response.status_text()
        )));
    }

    let total = response
        .headers()
        .get("content-length")
        .and_then(|value| value.trim().parse::<u64>().ok());
    let mut progress = LoadProgress { received: 0, total };
    on_progress(progress);

    let Some(stream) = response.body() else {
        return read_whole(response, progress, on_progress).await;
    };

    let reader: ReadableStreamDefaultReader = stream.get_reader().unchecked_into();
    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    loop {
        let chunk = JsFuture::from(reader.read()).await.map_err(js_error)?;
        let done = Reflect::get(&chunk, &JsValue::from_str("done"))
            .map_err(js_error)?
            .as_bool()
            .unwrap_or(true);
        if done {
            break;
        }
        let value = Reflect::get(&chunk, &JsValue::from_str("value")).map_err(js_error)?;
        let array = Uint8Array::new(&value);
        bytes.extend_from_slice(&array.to_vec());

        progress.received = bytes.len() as u64;
        on_progress(progress);
    }

    Ok(bytes)
}

async fn read_whole<F>(response: Response, mut progress: LoadProgress, mut on_progress: F) -> NetworkResult<Vec<u8>>
where
    F: FnMut(LoadProgress),
{
    let bytes = response
        .binary()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to read body: {:?}", e)))?;
    progress.received = bytes.len() as u64;
    on_progress(progress);
    Ok(bytes)
}

fn js_error(value: JsValue) -> AppError {
    AppError::NetworkError(format!("Stream read failed: {:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fraction() {
        assert_eq!(LoadProgress { received: 50, total: Some(200) }.fraction(), Some(0.25));
        assert_eq!(LoadProgress { received: 10, total: None }.fraction(), None);
        assert_eq!(LoadProgress { received: 300, total: Some(200) }.percent(), Some(100));
        assert_eq!(LoadProgress { received: 0, total: Some(0) }.percent(), Some(100));
    }
}
