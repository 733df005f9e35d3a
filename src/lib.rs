#![doc = "AOI picker public API: district/taluka/village cascade, GeoJSON AOI input and the map view"]
pub mod aoi;
pub mod boundary;
pub mod cascade;
pub mod cli;
#[cfg(feature = "remote")]
pub mod commands;
pub mod config;
mod error;
pub mod map;
mod shell;

#[doc(inline)]
pub use aoi::{AoiGeometry, AoiInputManager};

#[doc(inline)]
pub use boundary::{AdminLevel, AdminUnit, BoundarySource, BoundingBox, LookupRequest};

#[doc(inline)]
pub use cascade::{CascadeController, CascadeState, FetchTicket};

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use error::{Error, Result, Warning};

#[doc(inline)]
pub use map::MapView;

#[doc(inline)]
pub use shell::{AppShell, ShellEvent, UPLOAD_EXTENSION};
