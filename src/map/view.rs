use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::{aoi::AoiGeometry, boundary::BoundingBox, config::{MapConfig, PageConfig}};

use super::{
    html::{write_html_file, write_map_page, HtmlStringWriter},
    layer::{DrawControl, MapLayer, TileLayer, WmsLayer, AOI_LAYER_NAME},
};

/// Base tiles, the fixed WMS overlay, the draw toolbar and the AOI overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    center: [f64; 2],
    zoom: u8,
    width: Option<u32>,
    height: u32,
    layers: Vec<MapLayer>,
    draw: DrawControl,
    focus: Option<BoundingBox>,
}

impl MapView {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            center: config.center,
            zoom: config.zoom,
            width: config.width,
            height: config.height,
            layers: vec![
                MapLayer::Tiles(TileLayer::from_name(&config.tiles)),
                MapLayer::Wms(WmsLayer::district_border()),
            ],
            draw: DrawControl::restricted(),
            focus: None,
        }
    }

    /// Show `aoi` as the AOI overlay, or remove the overlay for `None`.
    ///
    /// Idempotent; never touches the base, WMS or draw layers.
    pub fn render(&mut self, aoi: Option<&AoiGeometry>) {
        self.layers.retain(|layer| !layer.is_aoi());
        if let Some(geometry) = aoi {
            self.layers.push(MapLayer::GeoJson { name: AOI_LAYER_NAME.to_string(), geometry: geometry.clone() });
        }
    }

    /// Extent to fit when no AOI is shown (typically the selected village/taluka/district).
    pub fn set_focus(&mut self, bounds: Option<BoundingBox>) {
        self.focus = bounds;
    }

    #[inline] pub fn layers(&self) -> &[MapLayer] { &self.layers }
    #[inline] pub fn draw_control(&self) -> &DrawControl { &self.draw }
    #[inline] pub fn center(&self) -> [f64; 2] { self.center }
    #[inline] pub fn zoom(&self) -> u8 { self.zoom }
    #[inline] pub fn size(&self) -> (Option<u32>, u32) { (self.width, self.height) }

    pub fn set_size(&mut self, width: Option<u32>, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// The rendered AOI, if any.
    pub fn aoi(&self) -> Option<&AoiGeometry> {
        self.layers.iter().find_map(|layer| match layer {
            MapLayer::GeoJson { geometry, .. } if layer.is_aoi() => Some(geometry),
            _ => None,
        })
    }

    pub fn aoi_layer_count(&self) -> usize {
        self.layers.iter().filter(|layer| layer.is_aoi()).count()
    }

    /// Extent the page should open on: the AOI if shown, else the focus.
    pub fn view_bounds(&self) -> Option<BoundingBox> {
        self.aoi().and_then(AoiGeometry::bounds).or(self.focus)
    }

    /// Standalone Leaflet page for this view.
    pub fn to_html(&self, page: &PageConfig) -> Result<String> {
        let mut writer = HtmlStringWriter::new();
        write_map_page(&mut writer, self, page)?;
        writer.into_string()
    }

    /// Write the Leaflet page to `path`; refuses to overwrite unless `force`.
    pub fn write_html(&self, page: &PageConfig, path: &Path, force: bool) -> Result<()> {
        write_html_file(path, force, |writer| write_map_page(writer, self, page))
    }
}
