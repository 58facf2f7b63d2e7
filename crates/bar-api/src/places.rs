//! Place details lookup
//!
//! Bars found through the nearby search carry only a place id; the details
//! screen resolves the rest (address, phone, website) with a place details
//! request.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Error, Result};

/// Fields requested from the details endpoint
const DETAIL_FIELDS: &str =
    "place_id,name,formatted_address,formatted_phone_number,website,geometry";

/// Configuration for the places client
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// Base URL of the places API (without the `/details/json` suffix)
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl PlacesConfig {
    /// Create a config with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

/// Place geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Place location
    pub location: LatLng,
}

/// Place details result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetailsResult {
    /// Place identifier
    pub place_id: String,
    /// Place name
    #[serde(default)]
    pub name: String,
    /// Formatted address
    #[serde(default)]
    pub formatted_address: Option<String>,
    /// Formatted phone number
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    /// Website
    #[serde(default)]
    pub website: Option<String>,
    /// Geometry
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct PlaceDetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceDetailsResult>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Client for the place details endpoint
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    config: PlacesConfig,
}

impl PlacesClient {
    /// Create a new places client
    pub fn new(config: PlacesConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Fetch details for a place
    ///
    /// # Errors
    ///
    /// - `Error::InvalidInput` - empty place id
    /// - `Error::Api` - HTTP failure or a non-`OK` status in the body
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsResult> {
        if place_id.is_empty() {
            return Err(Error::InvalidInput("Place id cannot be empty".to_string()));
        }

        let url = format!("{}/details/json", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, message });
        }

        let body = response.bytes().await?;
        let details: PlaceDetailsResponse = serde_json::from_slice(&body)?;

        match (details.status.as_str(), details.result) {
            ("OK", Some(result)) => Ok(result),
            (other, _) => Err(Error::Api {
                status,
                message: details
                    .error_message
                    .unwrap_or_else(|| format!("Place details status {}", other)),
            }),
        }
    }
}
