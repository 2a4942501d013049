//! Trait forwarding onto the live `window.mantle` object.

use async_trait::async_trait;
use bridge_api::{
    AppBridge, BridgeError, EventHandler, EventSubscription, FetchRequest, FetchResponse,
    MantleOrganization, MantleUser, NewWindowOptions, Result, SaveBarOptions, ToastStatus,
};
use js_sys::{Array, Function, Object, Promise, Reflect};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::error::{js_error_message, upstream};

/// Handle to the host-provided bridge object. Cloning clones the JS
/// reference, not the object; the object itself belongs to the host page.
#[derive(Debug, Clone)]
pub struct WebAppBridge {
    raw: Object,
}

impl WebAppBridge {
    pub(crate) fn from_object(raw: Object) -> Self {
        Self { raw }
    }

    /// The underlying JS object, for interop the typed surface doesn't cover.
    pub fn raw(&self) -> &Object {
        &self.raw
    }

    fn get(&self, name: &str) -> Option<JsValue> {
        Reflect::get(self.raw.as_ref(), &JsValue::from_str(name))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    }

    fn method(&self, name: &str) -> Option<Function> {
        self.get(name)?.dyn_into::<Function>().ok()
    }

    /// Fire-and-forget call: a missing method or a throw is logged, never
    /// surfaced, matching the command semantics of the contract.
    fn command(&self, name: &str, args: &[&JsValue]) {
        let Some(function) = self.method(name) else {
            warn!(method = name, "bridge method missing");
            return;
        };
        let this: &JsValue = self.raw.as_ref();
        let result = match args {
            [] => function.call0(this),
            [a] => function.call1(this, a),
            [a, b] => function.call2(this, a, b),
            _ => {
                let list = Array::new();
                for arg in args {
                    list.push(arg);
                }
                function.apply(this, &list)
            }
        };
        if let Err(err) = result {
            warn!(method = name, error = %js_error_message(&err), "bridge call threw");
        }
    }

    /// Await a promise-returning bridge method, preserving rejections.
    async fn call_async(&self, name: &str, args: &[&JsValue]) -> Result<JsValue> {
        let function = self.method(name).ok_or_else(|| {
            BridgeError::UpstreamRejected(format!("bridge method {name} is not available"))
        })?;
        let this: &JsValue = self.raw.as_ref();
        let returned = match args {
            [] => function.call0(this),
            [a] => function.call1(this, a),
            [a, b] => function.call2(this, a, b),
            _ => {
                let list = Array::new();
                for arg in args {
                    list.push(arg);
                }
                function.apply(this, &list)
            }
        }
        .map_err(upstream)?;

        // Promise::resolve tolerates methods that return a plain value.
        JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(upstream)
    }

    fn fetch_init(request: &FetchRequest) -> Object {
        let init = Object::new();
        let _ = Reflect::set(
            &init,
            &JsValue::from_str("method"),
            &JsValue::from_str(request.method.as_str()),
        );
        if !request.headers.is_empty() {
            let headers = Object::new();
            for (name, value) in &request.headers {
                let _ = Reflect::set(
                    &headers,
                    &JsValue::from_str(name),
                    &JsValue::from_str(value),
                );
            }
            let _ = Reflect::set(&init, &JsValue::from_str("headers"), &headers);
        }
        if let Some(body) = &request.body {
            let _ = Reflect::set(&init, &JsValue::from_str("body"), &JsValue::from_str(body));
        }
        init
    }
}

#[async_trait(?Send)]
impl AppBridge for WebAppBridge {
    fn initialized(&self) -> Option<bool> {
        // `initialized` is the handshake flag; `isReady` is the older name.
        // A bridge exposing neither has no readiness protocol at all.
        self.get("initialized")
            .and_then(|value| value.as_bool())
            .or_else(|| self.get("isReady").and_then(|value| value.as_bool()))
    }

    async fn get_user(&self) -> Result<MantleUser> {
        let value = self.call_async("getUser", &[]).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|err| BridgeError::UpstreamRejected(err.to_string()))
    }

    async fn get_organization(&self) -> Result<MantleOrganization> {
        let value = self.call_async("getOrganization", &[]).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|err| BridgeError::UpstreamRejected(err.to_string()))
    }

    async fn get_session_token(&self) -> Result<String> {
        let value = self.call_async("getSessionToken", &[]).await?;
        value.as_string().ok_or_else(|| {
            BridgeError::UpstreamRejected("session token was not a string".to_string())
        })
    }

    fn redirect(&self, url: &str) {
        self.command("redirect", &[&JsValue::from_str(url)]);
    }

    fn set_path(&self, path: &str) {
        self.command("setPath", &[&JsValue::from_str(path)]);
    }

    fn open_in_new_tab(&self, url: &str) {
        self.command("openInNewTab", &[&JsValue::from_str(url)]);
    }

    fn open_in_new_window(&self, url: &str, options: NewWindowOptions) {
        let options = serde_wasm_bindgen::to_value(&options).unwrap_or(JsValue::UNDEFINED);
        self.command("openInNewWindow", &[&JsValue::from_str(url), &options]);
    }

    fn show_toast(&self, message: &str, status: ToastStatus) {
        self.command(
            "showToast",
            &[
                &JsValue::from_str(message),
                &JsValue::from_str(status.as_str()),
            ],
        );
    }

    fn show_modal(&self, id: &str) {
        self.command("showModal", &[&JsValue::from_str(id)]);
    }

    fn hide_modal(&self, id: &str) {
        self.command("hideModal", &[&JsValue::from_str(id)]);
    }

    fn show_save_bar(&self, options: SaveBarOptions) {
        if options.message.is_some() {
            let options = serde_wasm_bindgen::to_value(&options).unwrap_or(JsValue::UNDEFINED);
            self.command("setSaveBarOptions", &[&options]);
        }
        self.command("showSaveBar", &[]);
    }

    fn hide_save_bar(&self) {
        self.command("hideSaveBar", &[]);
    }

    async fn authenticated_fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let init = Self::fetch_init(&request);
        let value = self
            .call_async(
                "authenticatedFetch",
                &[&JsValue::from_str(&request.url), &init],
            )
            .await?;

        let response: web_sys::Response = value.dyn_into().map_err(|value| {
            BridgeError::UpstreamRejected(format!(
                "authenticatedFetch returned a non-Response value: {value:?}"
            ))
        })?;
        let status = response.status();
        let body = match response.text() {
            Ok(text) => JsFuture::from(text)
                .await
                .map_err(upstream)?
                .as_string()
                .unwrap_or_default(),
            Err(err) => return Err(upstream(err)),
        };

        Ok(FetchResponse { status, body })
    }

    fn subscribe(&self, event: &str, handler: EventHandler) -> Result<EventSubscription> {
        let on = self.method("on").ok_or_else(|| {
            BridgeError::UpstreamRejected("bridge does not support event subscription".to_string())
        })?;
        let off = self.method("off");

        let callback = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            let value = if payload.is_undefined() || payload.is_null() {
                None
            } else {
                serde_wasm_bindgen::from_value::<serde_json::Value>(payload).ok()
            };
            handler(value);
        });

        on.call2(self.raw.as_ref(), &JsValue::from_str(event), callback.as_ref())
            .map_err(upstream)?;

        let raw = self.raw.clone();
        let event = event.to_string();
        Ok(EventSubscription::new(Box::new(move || {
            if let Some(off) = off {
                let _ = off.call2(raw.as_ref(), &JsValue::from_str(&event), callback.as_ref());
            }
            // Dropping the closure invalidates the JS-side function.
            drop(callback);
        })))
    }
}
