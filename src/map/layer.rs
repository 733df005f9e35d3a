use serde::Serialize;

use crate::aoi::AoiGeometry;

/// Reference boundary overlay served by the PoCRA GeoServer.
pub const WMS_URL: &str = "http://gis.mahapocra.gov.in:6655/geoserver/PoCRA_Dashboard_V2/wms";
pub const WMS_LAYERS: &str = "PoCRA_Dashboard_V2:mh_districts";
pub const WMS_NAME: &str = "District Border";

/// Name of the overlay that shows the current AOI.
pub const AOI_LAYER_NAME: &str = "AOI";

const OSM_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// XYZ base tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    pub name: String,
    pub url: String,
    pub attribution: String,
}

impl TileLayer {
    pub fn openstreetmap() -> Self {
        Self { name: "OpenStreetMap".into(), url: OSM_URL.into(), attribution: OSM_ATTRIBUTION.into() }
    }

    /// Resolve a configured tile source: a known name or an XYZ url template.
    pub fn from_name(tiles: &str) -> Self {
        if tiles.contains("{z}") {
            Self { name: "Basemap".into(), url: tiles.into(), attribution: String::new() }
        } else {
            // OpenStreetMap is the only named source; anything else falls back to it.
            Self::openstreetmap()
        }
    }
}

/// Read-only WMS overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WmsLayer {
    pub name: String,
    pub url: String,
    pub layers: String,
    pub format: String,
    pub transparent: bool,
}

impl WmsLayer {
    pub fn district_border() -> Self {
        Self {
            name: WMS_NAME.into(),
            url: WMS_URL.into(),
            layers: WMS_LAYERS.into(),
            format: "image/png".into(),
            transparent: true,
        }
    }
}

/// One entry in the map's layer stack, bottom first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapLayer {
    Tiles(TileLayer),
    Wms(WmsLayer),
    GeoJson { name: String, geometry: AoiGeometry },
}

impl MapLayer {
    pub fn name(&self) -> &str {
        match self {
            MapLayer::Tiles(tiles) => &tiles.name,
            MapLayer::Wms(wms) => &wms.name,
            MapLayer::GeoJson { name, .. } => name,
        }
    }

    #[inline]
    pub fn is_aoi(&self) -> bool {
        matches!(self, MapLayer::GeoJson { name, .. } if name == AOI_LAYER_NAME)
    }
}

/// Shape tools offered by the draw toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DrawTools {
    pub polyline: bool,
    pub polygon: bool,
    pub rectangle: bool,
    pub circle: bool,
    pub marker: bool,
    pub circlemarker: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EditTools {
    pub edit: bool,
    pub remove: bool,
}

/// Draw/edit toolbar configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawControl {
    pub draw: DrawTools,
    pub edit: EditTools,
    pub export: bool,
}

impl DrawControl {
    /// Every shape and edit tool disabled; only export of drawn shapes stays on.
    pub fn restricted() -> Self {
        Self { draw: DrawTools::default(), edit: EditTools::default(), export: true }
    }

    pub fn can_draw(&self) -> bool {
        let t = &self.draw;
        t.polyline || t.polygon || t.rectangle || t.circle || t.marker || t.circlemarker
    }
}

impl Default for DrawControl {
    fn default() -> Self { Self::restricted() }
}
