use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::JsValue;

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Serialize as plain JS objects (not `Map`s) so GeoJSON round-trips through JSON.stringify.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| e.into())
}

pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(|e| anyhow!("invalid {what}: {e}"))
}

pub(crate) fn console_debug(message: &str) {
    web_sys::console::debug_1(&JsValue::from_str(message));
}
