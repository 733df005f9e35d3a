use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::geometry::AoiGeometry;

/// Default cap on accepted upload size (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Owns the single current AOI, set either from an upload or from the map's draw tool.
#[derive(Debug, Clone)]
pub struct AoiInputManager {
    current: Option<AoiGeometry>,
    max_bytes: usize,
}

impl Default for AoiInputManager {
    fn default() -> Self { Self::new(DEFAULT_MAX_UPLOAD_BYTES) }
}

impl AoiInputManager {
    pub fn new(max_bytes: usize) -> Self {
        Self { current: None, max_bytes }
    }

    #[inline] pub fn max_bytes(&self) -> usize { self.max_bytes }

    /// Parse an uploaded file and make it the current AOI.
    ///
    /// On any failure the current AOI is left exactly as it was.
    pub fn set_from_upload(&mut self, bytes: &[u8]) -> Result<&AoiGeometry> {
        if bytes.len() > self.max_bytes {
            warn!(size = bytes.len(), limit = self.max_bytes, "rejecting oversized AOI upload");
            return Err(Error::aoi(format!(
                "file is {} bytes, larger than the {} byte limit", bytes.len(), self.max_bytes
            )));
        }

        let geometry = AoiGeometry::parse(bytes).inspect_err(|error| {
            warn!(%error, "rejecting AOI upload");
        })?;
        debug!(kind = geometry.type_name(), "AOI set from upload");
        Ok(self.current.insert(geometry))
    }

    /// Replace the current AOI with a shape from the draw tool.
    pub fn set_from_draw(&mut self, geometry: AoiGeometry) {
        debug!(kind = geometry.type_name(), "AOI set from drawing");
        self.current = Some(geometry);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    #[inline] pub fn current(&self) -> Option<&AoiGeometry> { self.current.as_ref() }
}
