//! # eb-geo-ipapi
//!
//! `GeoLocator` backed by an ip-api.com compatible JSON endpoint:
//! `GET {base}/{ip}?fields=status,countryCode`.

use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use eb_core::traits::GeoLocator;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://ip-api.com/json";

/// ip-api response restricted to the fields we request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    status: String,
    country_code: Option<String>,
}

#[derive(Clone)]
pub struct IpApiLocator {
    http: reqwest::Client,
    base_url: String,
}

impl IpApiLocator {
    /// Builds a client whose every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build geolocation HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn lookup_country(&self, ip: &str) -> anyhow::Result<String> {
        let url = format!("{}/{}", self.base_url, ip);
        log::debug!("geolocating {ip} via {url}");

        let body: LookupResponse = self
            .http
            .get(&url)
            .query(&[("fields", "status,countryCode")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if body.status != "success" {
            bail!("lookup for {ip} returned status {:?}", body.status);
        }
        match body.country_code {
            Some(code) if !code.is_empty() => Ok(code),
            _ => bail!("lookup for {ip} returned no country code"),
        }
    }
}
