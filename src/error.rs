use std::fmt;

use thiserror::Error;

use crate::boundary::AdminLevel;

/// Errors raised by the boundary lookups, the cascade and AOI input.
///
/// None of these are fatal: boundary errors degrade to empty option lists,
/// selection errors leave the cascade untouched and AOI errors leave the
/// current AOI untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Transport failure or non-success HTTP status.
    #[error("network error loading {what}: {message}")]
    Network { what: String, message: String },

    /// The service answered, but not with the shape we expect.
    #[error("malformed {what} response: {message}")]
    MalformedResponse { what: String, message: String },

    /// A selection referenced an option that is absent or no longer current.
    #[error("invalid {level} selection {code:?}: {reason}")]
    InvalidSelection { level: AdminLevel, code: String, reason: &'static str },

    /// The uploaded AOI could not be read as GeoJSON.
    #[error("could not read AOI: {0}")]
    AoiParse(String),
}

impl Error {
    pub(crate) fn network(what: impl Into<String>, message: impl ToString) -> Self {
        Self::Network { what: what.into(), message: message.to_string() }
    }

    pub(crate) fn malformed(what: impl Into<String>, message: impl ToString) -> Self {
        Self::MalformedResponse { what: what.into(), message: message.to_string() }
    }

    pub(crate) fn invalid_selection(level: AdminLevel, code: &str, reason: &'static str) -> Self {
        Self::InvalidSelection { level, code: code.to_string(), reason }
    }

    pub(crate) fn aoi(message: impl ToString) -> Self {
        Self::AoiParse(message.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A non-fatal, user-visible message queued for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<&Error> for Warning {
    fn from(error: &Error) -> Self {
        Self::new(error.to_string())
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
