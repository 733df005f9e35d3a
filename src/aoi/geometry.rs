use std::str::FromStr;

use geo::BoundingRect;
use geojson::{GeoJson, Geometry, Value};
use serde::{Deserialize, Serialize};

use crate::{boundary::BoundingBox, error::{Error, Result}};

/// The area of interest: a single GeoJSON geometry of any type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AoiGeometry(Geometry);

impl AoiGeometry {
    pub fn new(geometry: Geometry) -> Self { Self(geometry) }

    #[inline] pub fn geometry(&self) -> &Geometry { &self.0 }

    /// GeoJSON type name of the geometry ("Polygon", "MultiPolygon", ...).
    pub fn type_name(&self) -> &'static str {
        match &self.0.value {
            Value::Point(_) => "Point",
            Value::MultiPoint(_) => "MultiPoint",
            Value::LineString(_) => "LineString",
            Value::MultiLineString(_) => "MultiLineString",
            Value::Polygon(_) => "Polygon",
            Value::MultiPolygon(_) => "MultiPolygon",
            Value::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Parse raw upload bytes (UTF-8 GeoJSON).
    ///
    /// Accepts a bare geometry, a feature with a geometry, or a feature
    /// collection. A single-feature collection yields that feature's geometry;
    /// several features are merged into a GeometryCollection.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| Error::aoi(format!("not UTF-8 text: {e}")))?;
        let geojson = GeoJson::from_str(text).map_err(Error::aoi)?;
        Self::from_geojson(geojson)
    }

    pub fn from_geojson(geojson: GeoJson) -> Result<Self> {
        match geojson {
            GeoJson::Geometry(geometry) => Ok(Self(geometry)),
            GeoJson::Feature(feature) => feature.geometry
                .map(Self)
                .ok_or_else(|| Error::aoi("feature has no geometry")),
            GeoJson::FeatureCollection(collection) => {
                let mut geometries: Vec<Geometry> = collection.features.into_iter()
                    .filter_map(|feature| feature.geometry)
                    .collect();
                match geometries.len() {
                    0 => Err(Error::aoi("feature collection has no geometries")),
                    1 => Ok(Self(geometries.remove(0))),
                    _ => Ok(Self(Geometry::new(Value::GeometryCollection(geometries)))),
                }
            }
        }
    }

    /// Lon/lat extent of the geometry, if it has any coordinates.
    pub fn bounds(&self) -> Option<BoundingBox> {
        let geometry: geo::Geometry<f64> = self.0.clone().try_into().ok()?;
        geometry.bounding_rect().map(BoundingBox::from)
    }

    /// Wrap as a FeatureCollection value for map renderers.
    pub fn to_feature_collection(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": self.0,
                "properties": {},
            }],
        })
    }
}

impl From<Geometry> for AoiGeometry {
    fn from(geometry: Geometry) -> Self { Self(geometry) }
}
