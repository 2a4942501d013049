//! JsValue-to-error conversion that keeps the original message.

use bridge_api::BridgeError;
use wasm_bindgen::{JsCast, JsValue};

/// Best-effort extraction of a human-readable message from a thrown JS value.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

/// A rejected bridge call, message intact.
pub(crate) fn upstream(value: JsValue) -> BridgeError {
    BridgeError::UpstreamRejected(js_error_message(&value))
}
