//! Area-of-interest input: uploaded or drawn GeoJSON geometry.

mod geometry;
mod input;

pub use geometry::AoiGeometry;
pub use input::{AoiInputManager, DEFAULT_MAX_UPLOAD_BYTES};
