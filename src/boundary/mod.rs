//! Administrative-boundary lookups (districts, talukas, villages).

mod client;
mod request;
mod response;
mod unit;

pub use client::{units_or_warn, BoundarySource};
#[cfg(feature = "remote")]
pub use client::HttpBoundaryClient;
pub use request::LookupRequest;
pub use response::parse_units;
pub use unit::{AdminLevel, AdminUnit, BoundingBox};
