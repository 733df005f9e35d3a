//! Map view: base tiles, WMS boundary overlay, draw toolbar and AOI overlay.

mod html;
mod layer;
mod view;

pub use layer::{
    DrawControl, DrawTools, EditTools, MapLayer, TileLayer, WmsLayer,
    AOI_LAYER_NAME, WMS_LAYERS, WMS_NAME, WMS_URL,
};
pub use view::MapView;
