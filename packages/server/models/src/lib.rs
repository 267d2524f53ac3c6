#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the trip planner server.
//!
//! These types are serialized to JSON for the REST API. Stored documents
//! keep their own field names; only the derived views defined here use
//! camel case.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trip_planner_geography_models::{CityCluster, OptimizedRoute, TravelEstimate};
use trip_planner_trip_models::Place;

/// Message returned whenever a geography or weather lookup comes back
/// empty.
pub const NOT_FOUND_MESSAGE: &str = "not found, try again";

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Active document backend (`file` or `remote`).
    pub store: String,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Wraps a message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// The lookup-miss message.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(NOT_FOUND_MESSAGE)
    }
}

/// Query parameters for the route optimization endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeQueryParams {
    /// Day to optimize, `YYYY-MM-DD`.
    pub day: String,
}

/// Query parameters for the distance endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DistanceQueryParams {
    /// Start place id.
    pub from: u64,
    /// End place id.
    pub to: u64,
}

/// Query parameters for the geocoding endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeQueryParams {
    /// Place name to search for.
    pub name: String,
}

/// Query parameters for the weather endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherQueryParams {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Forecast day.
    pub date: NaiveDate,
    /// Cache label; defaults to the coordinates.
    pub location: Option<String>,
}

impl WeatherQueryParams {
    /// Label the forecast is cached under.
    #[must_use]
    pub fn location_label(&self) -> String {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map_or_else(|| format!("{:.4},{:.4}", self.lat, self.lon), String::from)
    }
}

/// An optimized day route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoute {
    /// Stops in visiting order.
    pub stops: Vec<Place>,
    /// Total miles.
    pub total_miles: f64,
    /// Total kilometres.
    pub total_km: f64,
    /// Driving time.
    pub total_time: TravelEstimate,
    /// Driving time as `"{h}h {m}m"`.
    pub total_time_label: String,
}

impl From<OptimizedRoute<Place>> for ApiRoute {
    fn from(route: OptimizedRoute<Place>) -> Self {
        Self {
            total_km: route.total_km(),
            total_time_label: route.total_time.to_string(),
            total_time: route.total_time,
            total_miles: route.total_miles,
            stops: route.stops,
        }
    }
}

/// A city grouping of places.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCity {
    /// Resolved city name.
    pub name: String,
    /// Centroid latitude.
    pub lat: Option<f64>,
    /// Centroid longitude.
    pub lon: Option<f64>,
    /// Distinct visit days, ascending.
    pub dates: Vec<NaiveDate>,
    /// Member place ids in stored order.
    pub place_ids: Vec<u64>,
}

impl From<CityCluster<Place>> for ApiCity {
    fn from(cluster: CityCluster<Place>) -> Self {
        Self {
            name: cluster.name,
            lat: cluster.lat,
            lon: cluster.lon,
            dates: cluster.dates,
            place_ids: cluster.places.iter().map(|p| p.id).collect(),
        }
    }
}
