use std::path::Path;

use tracing::debug;

use crate::{
    aoi::{AoiGeometry, AoiInputManager},
    boundary::{AdminUnit, BoundarySource},
    cascade::{CascadeController, FetchTicket},
    config::{Config, PageConfig},
    error::{Error, Result, Warning},
    map::MapView,
};

/// Accepted upload extension.
pub const UPLOAD_EXTENSION: &str = "geojson";

/// A user interaction relayed by the page.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    SelectDistrict(Option<String>),
    SelectTaluka(Option<String>),
    SelectVillage(Option<String>),
    Upload { file_name: String, bytes: Vec<u8> },
    Draw(AoiGeometry),
    ClearAoi,
}

/// Wires the cascade, AOI input and map view together.
///
/// The cascade and the AOI are independent: a selection only moves the map's
/// focus, it never clips or replaces the AOI.
#[derive(Debug)]
pub struct AppShell {
    page: PageConfig,
    cascade: CascadeController,
    aoi: AoiInputManager,
    map: MapView,
    warnings: Vec<Warning>,
}

impl AppShell {
    /// Build the shell and load the district list from `source`.
    pub fn new(config: &Config, source: &dyn BoundarySource) -> Self {
        Self::with_controller(config, CascadeController::new(source))
    }

    pub fn with_controller(config: &Config, cascade: CascadeController) -> Self {
        let mut shell = Self {
            page: config.page.clone(),
            cascade,
            aoi: AoiInputManager::new(config.upload.max_bytes),
            map: MapView::new(&config.map),
            warnings: Vec::new(),
        };
        shell.sync_map();
        shell
    }

    /// Apply one event and run any lookup it triggers against `source`.
    /// Failures are also queued as warnings; none are fatal.
    pub fn handle(&mut self, event: ShellEvent, source: &dyn BoundarySource) -> Result<()> {
        if let Some(ticket) = self.apply(event)? {
            let result = source.fetch(&ticket.request);
            self.complete(&ticket, result);
        }
        Ok(())
    }

    /// Apply one event without fetching.
    ///
    /// Returns the child-list lookup the caller must run and hand back to
    /// `complete`, for callers that fetch asynchronously.
    pub fn apply(&mut self, event: ShellEvent) -> Result<Option<FetchTicket>> {
        let result = match event {
            ShellEvent::SelectDistrict(code) => self.cascade.begin_select_district(code.as_deref()),
            ShellEvent::SelectTaluka(code) => self.cascade.begin_select_taluka(code.as_deref()),
            ShellEvent::SelectVillage(code) => self.cascade.select_village(code.as_deref()).map(|()| None),
            ShellEvent::Upload { file_name, bytes } => self.upload(&file_name, &bytes).map(|_| None),
            ShellEvent::Draw(geometry) => {
                self.aoi.set_from_draw(geometry);
                Ok(None)
            }
            ShellEvent::ClearAoi => {
                self.aoi.clear();
                Ok(None)
            }
        };
        if let Err(error) = &result {
            self.warnings.push(Warning::from(error));
        }
        self.sync_map();
        result
    }

    /// Route an uploaded file into the AOI manager and refresh the map.
    pub fn upload(&mut self, file_name: &str, bytes: &[u8]) -> Result<&AoiGeometry> {
        if !has_upload_extension(file_name) {
            return Err(Error::aoi(format!("{file_name:?} is not a .{UPLOAD_EXTENSION} file")));
        }
        debug!(file_name, size = bytes.len(), "AOI upload");
        self.aoi.set_from_upload(bytes)?;
        self.sync_map();
        self.aoi.current().ok_or_else(|| Error::aoi("upload produced no geometry"))
    }

    /// Apply an asynchronously fetched child list and refresh the map.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<Vec<AdminUnit>>) -> bool {
        let applied = self.cascade.complete(ticket, result);
        self.sync_map();
        applied
    }

    /// Push the current AOI and selection focus into the map view.
    pub fn sync_map(&mut self) {
        self.map.render(self.aoi.current());
        self.map.set_focus(self.cascade.state().focus_bounds());
    }

    /// Drain every queued warning, cascade warnings first.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        let mut warnings = self.cascade.take_warnings();
        warnings.append(&mut self.warnings);
        warnings
    }

    #[inline] pub fn cascade(&self) -> &CascadeController { &self.cascade }
    #[inline] pub fn cascade_mut(&mut self) -> &mut CascadeController { &mut self.cascade }
    #[inline] pub fn aoi(&self) -> &AoiInputManager { &self.aoi }
    #[inline] pub fn map(&self) -> &MapView { &self.map }
    #[inline] pub fn map_mut(&mut self) -> &mut MapView { &mut self.map }
    #[inline] pub fn page(&self) -> &PageConfig { &self.page }

    pub fn to_html(&self) -> anyhow::Result<String> {
        self.map.to_html(&self.page)
    }

    pub fn write_html(&self, path: &Path, force: bool) -> anyhow::Result<()> {
        self.map.write_html(&self.page, path, force)
    }
}

fn has_upload_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(UPLOAD_EXTENSION))
}
