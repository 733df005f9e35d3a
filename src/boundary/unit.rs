use std::fmt;

use serde::{Deserialize, Serialize};

/// Level in the district -> taluka -> village hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminLevel {
    District,   // Highest-level unit
    Taluka,     // Taluka -> District
    Village,    // Lowest-level unit, Village -> Taluka
}

impl AdminLevel {
    pub const ALL: [AdminLevel; 3] = [AdminLevel::District, AdminLevel::Taluka, AdminLevel::Village];

    pub fn to_str(&self) -> &'static str {
        match self {
            AdminLevel::District => "district",
            AdminLevel::Taluka => "taluka",
            AdminLevel::Village => "village",
        }
    }

    pub fn parent(&self) -> Option<AdminLevel> {
        match self {
            AdminLevel::District => None,
            AdminLevel::Taluka => Some(AdminLevel::District),
            AdminLevel::Village => Some(AdminLevel::Taluka),
        }
    }

    pub fn child(&self) -> Option<AdminLevel> {
        match self {
            AdminLevel::District => Some(AdminLevel::Taluka),
            AdminLevel::Taluka => Some(AdminLevel::Village),
            AdminLevel::Village => None,
        }
    }

    /// Keys used by the boundary service for (code, name) on rows of this level.
    pub(crate) fn field_keys(&self) -> (&'static str, &'static str) {
        match self {
            AdminLevel::District => ("dtncode", "dtname"),
            AdminLevel::Taluka => ("thncode", "thname"),
            AdminLevel::Village => ("vincode", "vlname"),
        }
    }

    /// Plural label used in messages ("districts", ...).
    pub fn plural(&self) -> &'static str {
        match self {
            AdminLevel::District => "districts",
            AdminLevel::Taluka => "talukas",
            AdminLevel::Village => "villages",
        }
    }
}

impl fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Lon/lat extent as reported by the boundary service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self { xmin, xmax, ymin, ymax }
    }

    /// Corners as [[south, west], [north, east]].
    pub fn to_leaflet_bounds(&self) -> [[f64; 2]; 2] {
        [[self.ymin, self.xmin], [self.ymax, self.xmax]]
    }
}

impl From<geo::Rect<f64>> for BoundingBox {
    fn from(rect: geo::Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.max().x, rect.min().y, rect.max().y)
    }
}

/// A district, taluka or village as returned by one lookup.
/// Immutable once fetched; lists of units are replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUnit {
    pub level: AdminLevel,
    pub code: String, // unique within its level and parent
    pub name: String,
    pub bbox: BoundingBox,
}

impl AdminUnit {
    pub fn new(level: AdminLevel, code: impl Into<String>, name: impl Into<String>, bbox: BoundingBox) -> Self {
        Self { level, code: code.into(), name: name.into(), bbox }
    }
}

impl fmt::Display for AdminUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}
