//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the Nominatim HTTP API for search and reverse geocoding.
//! Public instances require a User-Agent and allow about one request per
//! second, which the picker's debounce interval keeps us under.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::GeoBackend;
use crate::location::{AddressParts, Coordinates, SearchResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
    country_codes: String,
    limit: usize,
}

/// Nominatim reverse response
///
/// A point with no address comes back as `{"error": "Unable to geocode"}`.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    address: Option<AddressParts>,
}

impl NominatimBackend {
    /// Create a backend from the geocoder and search settings
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.geocoder.user_agent.clone())
            .timeout(Duration::from_secs(config.geocoder.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.geocoder.url.trim_end_matches('/').to_string(),
            country_codes: config.geocoder.country_codes.clone(),
            limit: config.search.result_limit,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, param: &str, value: &str) -> String {
        let mut url = format!(
            "{}/search?{}={}&format=jsonv2&addressdetails=1&limit={}",
            self.base_url,
            param,
            urlencoding::encode(value),
            self.limit
        );
        if !self.country_codes.is_empty() {
            url.push_str(&format!(
                "&countrycodes={}",
                urlencoding::encode(&self.country_codes)
            ));
        }
        url
    }

    fn reverse_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=jsonv2&addressdetails=1",
            self.base_url, coords.latitude, coords.longitude
        )
    }

    /// Fetch a URL and return the body text of a successful response
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url = %url, "Nominatim request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read Nominatim response: {}", e)))
    }

    async fn search_by(&self, param: &str, value: &str) -> Result<Vec<SearchResult>> {
        let body = self.fetch(&self.search_url(param, value)).await?;
        let mut results = parse_search_response(&body)?;
        results.truncate(self.limit);
        Ok(results)
    }
}

/// Parse a search response body
pub fn parse_search_response(body: &str) -> Result<Vec<SearchResult>> {
    serde_json::from_str(body).map_err(|e| {
        Error::MalformedResponse(format!("Failed to parse Nominatim search response: {}", e))
    })
}

/// Parse a reverse response body
pub fn parse_reverse_response(body: &str) -> Result<Option<AddressParts>> {
    let response: ReverseResponse = serde_json::from_str(body).map_err(|e| {
        Error::MalformedResponse(format!("Failed to parse Nominatim reverse response: {}", e))
    })?;

    if let Some(error) = response.error {
        debug!(error = %error, "Nominatim has no address for point");
        return Ok(None);
    }

    response
        .address
        .map(Some)
        .ok_or_else(|| Error::MalformedResponse("Reverse response has no address".to_string()))
}

impl GeoBackend for NominatimBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.search_by("q", query).await
    }

    async fn lookup_postcode(&self, postcode: &str) -> Result<Vec<SearchResult>> {
        self.search_by("postalcode", postcode).await
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<AddressParts>> {
        let body = self.fetch(&self.reverse_url(coords)).await?;
        parse_reverse_response(&body)
    }
}
