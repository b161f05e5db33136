//! Registrar collaborators: availability and price for one domain

use crate::error::{NicheForgeError, Result};
use crate::types::{AvailabilityQuote, RegistrarConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const REGISTRAR_TIMEOUT_SECS: u64 = 10;
const NAMECOM_BASE_URL: &str = "https://api.name.com";

/// Availability lookup for a fully qualified domain
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Transport failures and non-success statuses come back as `Err`;
    /// callers decide how to degrade.
    async fn check_availability(&self, domain: &str) -> Result<AvailabilityQuote>;

    fn name(&self) -> &'static str;
}

fn registrar_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REGISTRAR_TIMEOUT_SECS))
        .user_agent(concat!("niche-forge/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| NicheForgeError::network(e.to_string(), None, None))
}

/// Name.com v4 `domains:checkAvailability`
pub struct NameComRegistrar {
    client: Client,
    username: String,
    token: String,
    base_url: String,
}

impl NameComRegistrar {
    pub fn new(config: &RegistrarConfig) -> Result<Self> {
        let (Some(username), Some(token)) = (&config.username, &config.token) else {
            return Err(NicheForgeError::config("Name.com username and token are required"));
        };
        if !config.has_credentials() {
            return Err(NicheForgeError::config("Name.com username and token must not be empty"));
        }

        Ok(Self {
            client: registrar_client()?,
            username: username.clone(),
            token: token.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| NAMECOM_BASE_URL.to_string()),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v4/domains:checkAvailability", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Registrar for NameComRegistrar {
    async fn check_availability(&self, domain: &str) -> Result<AvailabilityQuote> {
        let url = self.endpoint();
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.token))
            .json(&CheckAvailabilityRequest {
                domain_names: vec![domain.to_string()],
            })
            .send()
            .await
            .map_err(|e| NicheForgeError::registrar(domain, e.to_string(), None))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NicheForgeError::registrar(
                domain,
                format!("API request failed ({})", status),
                Some(status.as_u16()),
            ));
        }

        let body: CheckAvailabilityResponse = response
            .json()
            .await
            .map_err(|e| NicheForgeError::parse(e.to_string(), None))?;

        Ok(body.into_quote(domain))
    }

    fn name(&self) -> &'static str {
        "namecom"
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckAvailabilityRequest {
    domain_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CheckAvailabilityResponse {
    #[serde(default)]
    results: Vec<CheckAvailabilityResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckAvailabilityResult {
    #[serde(default)]
    purchasable: bool,
    purchase_price: Option<f64>,
}

impl CheckAvailabilityResponse {
    fn into_quote(self, domain: &str) -> AvailabilityQuote {
        let first = self.results.into_iter().next();
        AvailabilityQuote {
            domain: domain.to_string(),
            available: first.as_ref().is_some_and(|r| r.purchasable),
            price: first.and_then(|r| r.purchase_price),
            error: None,
        }
    }
}

/// RDAP server for a TLD (lowercase, without leading dot); URLs end with `/`
#[cfg(feature = "rdap")]
pub fn rdap_base_url(tld: &str) -> Option<&'static str> {
    match tld {
        "com" => Some("https://rdap.verisign.com/com/v1/"),
        "net" => Some("https://rdap.verisign.com/net/v1/"),
        "org" => Some("https://rdap.org.org/"),
        "io" => Some("https://rdap.nic.io/"),
        "co" => Some("https://rdap.nic.co/"),
        "shop" => Some("https://rdap.nic.shop/"),
        "store" => Some("https://rdap.nic.store/"),
        _ => None,
    }
}

/// Registry lookup used when no registrar account is configured.
/// A 404 means unregistered; prices are never known.
#[cfg(feature = "rdap")]
pub struct RdapRegistrar {
    client: Client,
}

#[cfg(feature = "rdap")]
impl RdapRegistrar {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: registrar_client()?,
        })
    }

    pub fn domain_url(domain: &str) -> Option<String> {
        let tld = domain.rsplit('.').next()?;
        let base = rdap_base_url(tld)?;
        Some(format!("{base}domain/{domain}"))
    }
}

#[cfg(feature = "rdap")]
#[async_trait]
impl Registrar for RdapRegistrar {
    async fn check_availability(&self, domain: &str) -> Result<AvailabilityQuote> {
        let url = Self::domain_url(domain)
            .ok_or_else(|| NicheForgeError::registrar(domain, "No RDAP server for this TLD", None))?;

        let response = tokio::time::timeout(
            Duration::from_secs(REGISTRAR_TIMEOUT_SECS),
            self.client.get(&url).send(),
        )
        .await
        .map_err(|_| NicheForgeError::timeout("RDAP request", REGISTRAR_TIMEOUT_SECS))?
        .map_err(|e| NicheForgeError::network(e.to_string(), None, Some(url.clone())))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(AvailabilityQuote {
                domain: domain.to_string(),
                available: true,
                price: None,
                error: None,
            });
        }
        if !status.is_success() {
            return Err(NicheForgeError::registrar(
                domain,
                format!("RDAP request failed with status {}", status),
                Some(status.as_u16()),
            ));
        }

        Ok(AvailabilityQuote {
            domain: domain.to_string(),
            available: false,
            price: None,
            error: None,
        })
    }

    fn name(&self) -> &'static str {
        "rdap"
    }
}

/// Stand-in when nothing can be queried: every domain is unavailable
pub struct OfflineRegistrar;

#[async_trait]
impl Registrar for OfflineRegistrar {
    async fn check_availability(&self, domain: &str) -> Result<AvailabilityQuote> {
        Ok(AvailabilityQuote::unavailable(domain, "API credentials not configured"))
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

/// Name.com with credentials, RDAP without (when enabled), offline otherwise
pub fn create_registrar(config: &RegistrarConfig) -> Result<Arc<dyn Registrar>> {
    if config.has_credentials() {
        return Ok(Arc::new(NameComRegistrar::new(config)?));
    }

    #[cfg(feature = "rdap")]
    {
        Ok(Arc::new(RdapRegistrar::new()?))
    }

    #[cfg(not(feature = "rdap"))]
    {
        tracing::warn!("Registrar credentials missing; availability checks are disabled");
        Ok(Arc::new(OfflineRegistrar))
    }
}
