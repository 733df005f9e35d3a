use js_sys::Uint8Array;
use serde::Serialize;
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use ndvi_aoi_core::{
    AoiGeometry, AppShell, CascadeController, Config, Error, FetchTicket, ShellEvent, boundary::parse_units,
};

use crate::common::*;

/// A lookup the page must perform with `fetch()` and hand back to `complete`.
#[derive(Serialize)]
struct PendingLookup {
    ticket: FetchTicket,
    url: String,
}

#[wasm_bindgen]
pub struct WasmShell {
    inner: AppShell,
    base_url: String,
}

impl WasmShell {
    fn pending(&self, ticket: Option<FetchTicket>) -> Result<JsValue, JsValue> {
        match ticket {
            Some(ticket) => {
                let url = ticket.request.url(&self.base_url).map_err(js_err)?.into();
                to_js(&PendingLookup { ticket, url })
            }
            None => Ok(JsValue::NULL),
        }
    }
}

#[wasm_bindgen]
impl WasmShell {
    /// Build a shell from optional TOML config text. No lookup is issued;
    /// call `begin_load_districts` to populate the first dropdown.
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<WasmShell, JsValue> {
        let config = match config_toml.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Config::from_toml_str(raw).map_err(js_err)?,
            _ => Config::default(),
        };
        Ok(WasmShell {
            inner: AppShell::with_controller(&config, CascadeController::empty()),
            base_url: config.service.base_url,
        })
    }

    /// Returns `{ ticket, url }` for the district list.
    pub fn begin_load_districts(&mut self) -> Result<JsValue, JsValue> {
        let ticket = self.inner.cascade_mut().begin_load_districts();
        self.pending(Some(ticket))
    }

    /// Select (or clear, with `undefined`) a district.
    /// Returns `{ ticket, url }` for its talukas, or null when cleared.
    pub fn begin_select_district(&mut self, code: Option<String>) -> Result<JsValue, JsValue> {
        let ticket = self.inner.apply(ShellEvent::SelectDistrict(code)).map_err(js_err)?;
        self.pending(ticket)
    }

    /// Select (or clear) a taluka. Returns `{ ticket, url }` for its villages, or null.
    pub fn begin_select_taluka(&mut self, code: Option<String>) -> Result<JsValue, JsValue> {
        let ticket = self.inner.apply(ShellEvent::SelectTaluka(code)).map_err(js_err)?;
        self.pending(ticket)
    }

    pub fn select_village(&mut self, code: Option<String>) -> Result<(), JsValue> {
        self.inner.apply(ShellEvent::SelectVillage(code)).map(|_| ()).map_err(js_err)
    }

    /// Hand back a lookup result: the raw response body (from
    /// `response.arrayBuffer()`), or the transport error message when the
    /// request failed. Returns false if the ticket was superseded and the
    /// result ignored.
    pub fn complete(&mut self, ticket: JsValue, body: Option<Uint8Array>, error: Option<String>) -> Result<bool, JsValue> {
        let ticket: FetchTicket = from_js(ticket, "ticket").map_err(js_err)?;
        let result = match (error, body) {
            (Some(message), _) => Err(Error::Network { what: ticket.request.describe(), message }),
            (None, Some(body)) => parse_units(ticket.request.level(), &body.to_vec()),
            (None, None) => Err(Error::Network { what: ticket.request.describe(), message: "no response".into() }),
        };
        let applied = self.inner.complete(&ticket, result);
        if !applied {
            console_debug(&format!("ignoring superseded lookup: {}", ticket.request.describe()));
        }
        Ok(applied)
    }

    /// Load an uploaded `.geojson` file as the AOI; returns the geometry.
    pub fn upload(&mut self, file_name: String, bytes: Vec<u8>) -> Result<JsValue, JsValue> {
        self.inner.apply(ShellEvent::Upload { file_name, bytes }).map_err(js_err)?;
        to_js(&self.inner.aoi().current())
    }

    /// Replace the AOI with a geometry drawn on the map (a GeoJSON geometry object).
    pub fn draw(&mut self, geometry: JsValue) -> Result<(), JsValue> {
        let geometry: AoiGeometry = from_js(geometry, "geometry").map_err(js_err)?;
        self.inner.apply(ShellEvent::Draw(geometry)).map(|_| ()).map_err(js_err)
    }

    pub fn clear_aoi(&mut self) -> Result<(), JsValue> {
        self.inner.apply(ShellEvent::ClearAoi).map(|_| ()).map_err(js_err)
    }

    /// Current dropdown options and selections.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.cascade().state())
    }

    /// The map view: layers, draw control and selection focus.
    pub fn map_view(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.map())
    }

    /// Drain queued warnings as an array of `{ message }`.
    pub fn take_warnings(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.take_warnings())
    }

    /// Standalone Leaflet page for the current view.
    pub fn to_html(&self) -> Result<String, JsValue> {
        self.inner.to_html().map_err(js_err)
    }
}
