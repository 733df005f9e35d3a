use tracing::warn;

use crate::error::{Result, Warning};

use super::{request::LookupRequest, unit::AdminUnit};

/// Anything that can answer boundary lookups.
///
/// Implementations are stateless queries: the same request may be issued
/// any number of times and nothing is retained between calls.
pub trait BoundarySource {
    fn fetch(&self, request: &LookupRequest) -> Result<Vec<AdminUnit>>;
}

impl<S: BoundarySource + ?Sized> BoundarySource for &S {
    fn fetch(&self, request: &LookupRequest) -> Result<Vec<AdminUnit>> {
        (**self).fetch(request)
    }
}

/// Degrade a failed lookup to an empty list, logging and queueing a warning.
pub fn units_or_warn(request: &LookupRequest, result: Result<Vec<AdminUnit>>, warnings: &mut Vec<Warning>) -> Vec<AdminUnit> {
    match result {
        Ok(units) => units,
        Err(error) => {
            warn!(request = %request.describe(), %error, "boundary lookup failed; showing no options");
            warnings.push(Warning::new(format!("Error loading {}: {error}", request.describe())));
            Vec::new()
        }
    }
}

#[cfg(feature = "remote")]
pub use self::http::HttpBoundaryClient;

#[cfg(feature = "remote")]
mod http {
    use std::time::Duration;

    use anyhow::Context;
    use reqwest::blocking::Client;
    use tracing::debug;
    use url::Url;

    use crate::{boundary::response::parse_units, config::ServiceConfig, error::{Error, Result, Warning}};

    use super::{units_or_warn, AdminUnit, BoundarySource, LookupRequest};

    /// Blocking HTTP client for the administrative-boundary web service.
    #[derive(Debug, Clone)]
    pub struct HttpBoundaryClient {
        base_url: String,
        client: Client,
    }

    impl HttpBoundaryClient {
        pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
            let client = Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .context("build boundary-service HTTP client")?;
            Url::parse(&config.base_url)
                .with_context(|| format!("invalid boundary-service URL {:?}", config.base_url))?;

            Ok(Self { base_url: config.base_url.trim_end_matches('/').to_string(), client })
        }

        pub fn base_url(&self) -> &str { &self.base_url }

        /// Issue one lookup, returning typed errors.
        pub fn try_fetch(&self, request: &LookupRequest) -> Result<Vec<AdminUnit>> {
            let what = request.describe();
            let url = request.url(&self.base_url).map_err(|e| Error::network(what.as_str(), e))?;
            debug!(%url, "GET");

            let body = self.client.get(url).send()
                .and_then(|resp| resp.error_for_status())
                .and_then(|resp| resp.bytes())
                .map_err(|e| Error::network(what.as_str(), e))?;

            parse_units(request.level(), &body)
        }

        /// Fetch with errors degraded to an empty list; the failure is
        /// logged and queued on `warnings`.
        pub fn fetch_or_warn(&self, request: &LookupRequest, warnings: &mut Vec<Warning>) -> Vec<AdminUnit> {
            units_or_warn(request, self.try_fetch(request), warnings)
        }

        pub fn fetch_districts(&self, warnings: &mut Vec<Warning>) -> Vec<AdminUnit> {
            self.fetch_or_warn(&LookupRequest::Districts, warnings)
        }

        pub fn fetch_talukas(&self, district_code: &str, warnings: &mut Vec<Warning>) -> Vec<AdminUnit> {
            self.fetch_or_warn(&LookupRequest::Talukas { district: district_code.to_string() }, warnings)
        }

        pub fn fetch_villages(&self, taluka_code: &str, warnings: &mut Vec<Warning>) -> Vec<AdminUnit> {
            self.fetch_or_warn(&LookupRequest::Villages { taluka: taluka_code.to_string() }, warnings)
        }
    }

    impl BoundarySource for HttpBoundaryClient {
        fn fetch(&self, request: &LookupRequest) -> Result<Vec<AdminUnit>> {
            self.try_fetch(request)
        }
    }
}
