// 🌐 Registry client - the single outbound call
//
// GET {base_url}/{cnpj} → 200 decodes to a CompanyRecord, anything else is NotFound.

use crate::config::Config;
use crate::error::{LookupError, LookupResult};
use crate::identifier::Cnpj;
use crate::record::CompanyRecord;
use std::time::Duration;

/// Anything that can fetch a company record for a validated CNPJ.
///
/// The search session only talks to this trait, so tests can swap in a fake.
pub trait RegistryClient {
    fn fetch(&self, cnpj: &Cnpj) -> LookupResult<CompanyRecord>;

    /// Name for logging
    fn name(&self) -> &str {
        "registry"
    }
}

impl<C: RegistryClient + ?Sized> RegistryClient for &C {
    fn fetch(&self, cnpj: &Cnpj) -> LookupResult<CompanyRecord> {
        (**self).fetch(cnpj)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Map a finished HTTP exchange to the lookup outcome.
///
/// Kept free of any transport type so it can be tested without a network.
pub fn decode_response(status: u16, body: &str) -> LookupResult<CompanyRecord> {
    if status != 200 {
        return Err(LookupError::NotFound { status });
    }

    CompanyRecord::from_json(body).map_err(|e| LookupError::Decode(e.to_string()))
}

// ============================================================================
// BRASILAPI CLIENT
// ============================================================================

pub struct BrasilApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl BrasilApiClient {
    pub fn new(config: &Config) -> LookupResult<Self> {
        Self::with_base_url(&config.api_base_url, config.timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> LookupResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cnpj-lookup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn url_for(&self, cnpj: &Cnpj) -> String {
        format!("{}/{}", self.base_url, cnpj.digits())
    }
}

impl RegistryClient for BrasilApiClient {
    fn fetch(&self, cnpj: &Cnpj) -> LookupResult<CompanyRecord> {
        let url = self.url_for(cnpj);
        tracing::info!(%url, "requesting company record");

        let response = self.http.get(&url).send().map_err(|e| {
            tracing::warn!(%url, error = %e, "registry request failed");
            LookupError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        tracing::info!(%url, status, bytes = body.len(), "registry responded");
        decode_response(status, &body)
    }

    fn name(&self) -> &str {
        "brasilapi"
    }
}
