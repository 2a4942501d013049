//! Lookup of the well-known window globals.

use bridge_api::{HostScope, LegacySlot};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::bridge::WebAppBridge;
use crate::error::js_error_message;

/// Global the bridge script installs its instance under.
const PRIMARY_GLOBAL: &str = "mantle";

/// Older global that may hold an instance or a constructor.
const LEGACY_GLOBAL: &str = "MantleAppBridge";

/// `HostScope` over the real `window`. Stateless: every call re-reads the
/// globals, so a reloaded bridge script is picked up immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebHostScope;

impl WebHostScope {
    pub fn new() -> Self {
        Self
    }

    fn global(name: &str) -> Option<JsValue> {
        let window = web_sys::window()?;
        Reflect::get(window.as_ref(), &JsValue::from_str(name))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    }
}

impl HostScope for WebHostScope {
    type Bridge = WebAppBridge;

    fn available(&self) -> bool {
        web_sys::window().is_some()
    }

    fn primary_slot(&self) -> Option<WebAppBridge> {
        Self::global(PRIMARY_GLOBAL)?
            .dyn_into::<Object>()
            .ok()
            .map(WebAppBridge::from_object)
    }

    fn legacy_slot(&self) -> Option<LegacySlot<WebAppBridge>> {
        let value = Self::global(LEGACY_GLOBAL)?;

        if let Some(function) = value.dyn_ref::<Function>() {
            // A callable with a prototype object is a constructor that must
            // be instantiated; anything else in the slot is used as-is.
            let has_prototype = Reflect::get(function.as_ref(), &JsValue::from_str("prototype"))
                .map(|prototype| prototype.is_object())
                .unwrap_or(false);
            if has_prototype {
                let constructor = function.clone();
                return Some(LegacySlot::Constructor(Box::new(move || {
                    Reflect::construct(&constructor, &Array::new())
                        // `new` always yields an object.
                        .map(|value| WebAppBridge::from_object(value.unchecked_into()))
                        .map_err(|err| js_error_message(&err))
                })));
            }
        }

        value
            .dyn_into::<Object>()
            .ok()
            .map(|object| LegacySlot::Instance(WebAppBridge::from_object(object)))
    }

    fn in_iframe(&self) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        match window.top() {
            Ok(Some(top)) => !Object::is(window.as_ref(), top.as_ref()),
            // A cross-origin restriction while reaching for the top frame
            // means the page is embedded.
            Ok(None) | Err(_) => true,
        }
    }
}
