#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding for the trip planner.
//!
//! Two upstream services, configured via TOML files in `services/`:
//!
//! 1. **Open-Meteo place search**: place name to coordinates
//!    ([`GeoResolver::forward_geocode`]).
//! 2. **Nominatim / OpenStreetMap reverse**: coordinates to a city-level
//!    name ([`GeoResolver::reverse_geocode`]).
//!
//! Both are third-party, slow, and rate limited. Every call carries a
//! short timeout and is never retried. Failures come back as
//! [`GeocodeError`] so callers can tell "not found" from "unreachable";
//! the `*_or_none` helpers collapse both into `None` for the common
//! degrade-quietly path.

pub mod nominatim;
pub mod open_meteo;
pub mod service_registry;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use service_registry::ProviderConfig;
use thiserror::Error;

/// A forward geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Resolved place name.
    pub name: String,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lon: f64,
    /// Country name, empty if unknown.
    pub country: String,
    /// First-level administrative region (state/province), empty if
    /// unknown.
    pub region: String,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with something other than 200.
    #[error("Unexpected HTTP status {status}")]
    Status {
        /// Response status code.
        status: u16,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// No service of the required kind is configured.
    #[error("No {kind} geocoding service configured")]
    NotConfigured {
        /// Which direction is missing (`"forward"` or `"reverse"`).
        kind: &'static str,
    },
}

/// Forward and reverse geocoding.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    /// Resolves coordinates to a city-level name.
    ///
    /// Precedence: city, town, village, municipality, county, state, then
    /// [`nominatim::UNKNOWN_PLACE`].
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the service is unreachable, times out,
    /// answers with a non-200 status, or returns a malformed body.
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<String, GeocodeError>;

    /// Resolves a place name to its best match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] under the same conditions as
    /// [`GeoResolver::reverse_geocode`]. Zero matches is `Ok(None)`.
    async fn forward_geocode(&self, name: &str) -> Result<Option<GeocodeResult>, GeocodeError>;

    /// [`GeoResolver::reverse_geocode`] with every failure mapped to `None`.
    async fn reverse_geocode_or_none(&self, lat: f64, lon: f64) -> Option<String> {
        match self.reverse_geocode(lat, lon).await {
            Ok(name) => Some(name),
            Err(e) => {
                log::warn!("Reverse geocoding ({lat}, {lon}) failed: {e}");
                None
            }
        }
    }

    /// [`GeoResolver::forward_geocode`] with every failure mapped to `None`.
    async fn forward_geocode_or_none(&self, name: &str) -> Option<GeocodeResult> {
        match self.forward_geocode(name).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Geocoding {name:?} failed: {e}");
                None
            }
        }
    }
}

/// Endpoint settings for [`HttpGeoResolver`].
#[derive(Debug, Clone)]
pub struct ResolverEndpoints {
    /// Nominatim reverse URL.
    pub reverse_url: String,
    /// `User-Agent` for Nominatim.
    pub user_agent: String,
    /// Reverse lookup timeout.
    pub reverse_timeout: Duration,
    /// Open-Meteo search URL.
    pub forward_url: String,
    /// Language for search results.
    pub language: String,
    /// Forward lookup timeout.
    pub forward_timeout: Duration,
}

impl ResolverEndpoints {
    /// Reads the embedded service registry.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::NotConfigured`] if either direction has no
    /// service.
    pub fn from_registry() -> Result<Self, GeocodeError> {
        let reverse = service_registry::reverse_service()
            .ok_or(GeocodeError::NotConfigured { kind: "reverse" })?;
        let forward = service_registry::forward_service()
            .ok_or(GeocodeError::NotConfigured { kind: "forward" })?;

        let reverse_timeout = reverse.timeout();
        let forward_timeout = forward.timeout();

        let ProviderConfig::NominatimReverse {
            base_url: reverse_url,
            user_agent,
        } = reverse.provider
        else {
            return Err(GeocodeError::NotConfigured { kind: "reverse" });
        };
        let ProviderConfig::OpenMeteoSearch {
            base_url: forward_url,
            language,
        } = forward.provider
        else {
            return Err(GeocodeError::NotConfigured { kind: "forward" });
        };

        Ok(Self {
            reverse_url,
            user_agent,
            reverse_timeout,
            forward_url,
            language,
            forward_timeout,
        })
    }
}

/// [`GeoResolver`] backed by the live HTTP services.
pub struct HttpGeoResolver {
    client: reqwest::Client,
    endpoints: ResolverEndpoints,
}

impl HttpGeoResolver {
    /// Creates a resolver for the given endpoints.
    #[must_use]
    pub const fn new(client: reqwest::Client, endpoints: ResolverEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Creates a resolver from the embedded service registry.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::NotConfigured`] if the registry lacks a
    /// service.
    pub fn from_registry(client: reqwest::Client) -> Result<Self, GeocodeError> {
        Ok(Self::new(client, ResolverEndpoints::from_registry()?))
    }
}

#[async_trait]
impl GeoResolver for HttpGeoResolver {
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<String, GeocodeError> {
        nominatim::reverse(
            &self.client,
            &self.endpoints.reverse_url,
            &self.endpoints.user_agent,
            self.endpoints.reverse_timeout,
            lat,
            lon,
        )
        .await
    }

    async fn forward_geocode(&self, name: &str) -> Result<Option<GeocodeResult>, GeocodeError> {
        open_meteo::search(
            &self.client,
            &self.endpoints.forward_url,
            &self.endpoints.language,
            self.endpoints.forward_timeout,
            name,
        )
        .await
    }
}
