//! Browser-backed implementations of the collaborator traits.

use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::set_timeout_with_handle;
use serde_json::Value;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, Response};

use crate::error::ApiError;
use crate::services::{FileLike, Method, Navigator, RequestClient, Scheduler, TaskHandle};

impl FileLike for web_sys::File {
    fn name(&self) -> String {
        web_sys::File::name(self)
    }

    fn size(&self) -> u64 {
        web_sys::Blob::size(self) as u64
    }
}

fn js_error(e: JsValue) -> ApiError {
    ApiError::Network(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// `window.fetch` with cookies attached to every backend call.
pub struct FetchClient {
    api_base: String,
}

impl FetchClient {
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, url: &str, init: &RequestInit) -> Result<Response, ApiError> {
        let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
        let request = Request::new_with_str_and_init(url, init).map_err(js_error)?;
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?;
        value
            .dyn_into::<Response>()
            .map_err(|_| ApiError::Network("fetch did not return a Response".into()))
    }

    async fn read_text(response: &Response) -> Result<String, ApiError> {
        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        Ok(text.as_string().unwrap_or_default())
    }
}

impl RequestClient for FetchClient {
    type File = web_sys::File;

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.api_base, path);
        debug!("{} {}", method.as_str(), url);

        let init = RequestInit::new();
        init.set_method(method.as_str());
        init.set_credentials(RequestCredentials::Include);
        if let Some(body) = body {
            let headers = Headers::new().map_err(js_error)?;
            headers
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
            init.set_headers(&headers);
            init.set_body(&JsValue::from_str(&serde_json::to_string(&body)?));
        }

        let response = self.fetch(&url, &init).await?;
        let text = Self::read_text(&response).await?;
        if !response.ok() {
            return Err(ApiError::from_response(response.status(), &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn put_file(&self, url: &str, file: &web_sys::File) -> Result<(), ApiError> {
        debug!("PUT {} ({} bytes)", url, FileLike::size(file));

        let init = RequestInit::new();
        init.set_method(Method::Put.as_str());
        let content_type = file.type_();
        if !content_type.is_empty() {
            let headers = Headers::new().map_err(js_error)?;
            headers.set("Content-Type", &content_type).map_err(js_error)?;
            init.set_headers(&headers);
        }
        init.set_body(file);

        let response = self.fetch(url, &init).await?;
        if response.ok() {
            Ok(())
        } else {
            let text = Self::read_text(&response).await.unwrap_or_default();
            Err(ApiError::from_response(response.status(), &text))
        }
    }
}

/// In-app navigation through the router; full-page loads through `location`.
pub struct BrowserNavigator {
    navigate: Rc<dyn Fn(&str)>,
}

impl BrowserNavigator {
    pub fn new(navigate: impl Fn(&str) + 'static) -> Self {
        Self {
            navigate: Rc::new(navigate),
        }
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        (self.navigate)(path);
    }

    fn redirect(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            warn!("No window to redirect to {}", url);
            return;
        };
        if let Err(e) = window.location().set_href(url) {
            warn!("Redirect to {} failed: {:?}", url, e);
        }
    }
}

pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
        match set_timeout_with_handle(task, delay) {
            Ok(handle) => TaskHandle::new(move || handle.clear()),
            Err(e) => {
                warn!("Failed to schedule task: {:?}", e);
                TaskHandle::detached()
            }
        }
    }
}
