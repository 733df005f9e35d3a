//! Cascading district -> taluka -> village selection.

mod controller;
mod state;

pub use controller::{CascadeController, FetchTicket};
pub use state::CascadeState;
