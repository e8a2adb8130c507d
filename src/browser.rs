#![cfg(target_arch = "wasm32")]

use std::time::Duration;

use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::transport::{HttpResponse, NetworkError, Timer, Transport};
use crate::wire::GenerateContentRequest;

/// `fetch` through `gloo-net`. There is no timeout beyond the browser's own.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn post(
        &self,
        url: &str,
        body: &GenerateContentRequest,
    ) -> Result<HttpResponse, NetworkError> {
        let response = Request::post(url)
            .json(body)
            .map_err(|error| NetworkError::new(error.to_string()))?
            .send()
            .await
            .map_err(|error| NetworkError::new(error.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| NetworkError::new(error.to_string()))?;

        Ok(HttpResponse::new(status, text))
    }
}

/// `setTimeout` wrapped in a promise.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    async fn sleep(&self, duration: Duration) {
        let millis = duration.as_millis().min(i32::MAX as u128) as i32;

        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = leptos::window()
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
            if scheduled.is_err() {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });

        let _ = JsFuture::from(promise).await;
    }
}
