use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use super::unit::AdminLevel;

/// One boundary-service query. Each variant maps to one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LookupRequest {
    Districts,
    Talukas { district: String },
    Villages { taluka: String },
}

impl LookupRequest {
    /// Level of the units this request returns.
    pub fn level(&self) -> AdminLevel {
        match self {
            LookupRequest::Districts => AdminLevel::District,
            LookupRequest::Talukas { .. } => AdminLevel::Taluka,
            LookupRequest::Villages { .. } => AdminLevel::Village,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            LookupRequest::Districts => "get_districts",
            LookupRequest::Talukas { .. } => "get_talukas",
            LookupRequest::Villages { .. } => "get_villages",
        }
    }

    /// Query parameter keyed by the parent's code, if any.
    pub fn query(&self) -> Option<(&'static str, &str)> {
        match self {
            LookupRequest::Districts => None,
            LookupRequest::Talukas { district } => Some(("dtncode", district.as_str())),
            LookupRequest::Villages { taluka } => Some(("thncode", taluka.as_str())),
        }
    }

    /// Code of the parent unit this request was issued for.
    pub fn parent_code(&self) -> Option<&str> {
        self.query().map(|(_, code)| code)
    }

    /// Path relative to the service base, e.g. `get_talukas?dtncode=01`.
    /// The code is form-encoded.
    pub fn path(&self) -> String {
        match self.query() {
            Some((key, code)) => {
                let query = form_urlencoded::Serializer::new(String::new()).append_pair(key, code).finish();
                format!("{}?{query}", self.endpoint())
            }
            None => self.endpoint().to_string(),
        }
    }

    /// Full URL under `base` (a trailing slash on `base` is tolerated).
    pub fn url(&self, base: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}/{}", base.trim_end_matches('/'), self.endpoint()))?;
        if let Some((key, code)) = self.query() {
            url.query_pairs_mut().append_pair(key, code);
        }
        Ok(url)
    }

    /// Short label for log lines and warnings ("talukas of 01").
    pub fn describe(&self) -> String {
        match self.parent_code() {
            Some(code) => format!("{} of {code}", self.level().plural()),
            None => self.level().plural().to_string(),
        }
    }
}
