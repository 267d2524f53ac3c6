#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate, route, and city cluster types.
//!
//! These types carry the output of the geography engine (distances,
//! visiting orders, city groupings) to whoever renders them. They hold no
//! behavior beyond trivial accessors so they can be shared freely between
//! the engine, the persistence layer, and the API server.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Miles to kilometres.
pub const KM_PER_MILE: f64 = 1.609_34;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds coordinates only when both halves are present.
    ///
    /// A record with a single coordinate is treated as unlocated.
    #[must_use]
    pub const fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Self { lat, lon }),
            _ => None,
        }
    }
}

/// Anything that may sit at a point on the map.
pub trait Located {
    /// Returns the position, or `None` when the record is unlocated.
    fn coordinates(&self) -> Option<Coordinates>;
}

impl Located for Coordinates {
    fn coordinates(&self) -> Option<Coordinates> {
        Some(*self)
    }
}

impl<T: Located + ?Sized> Located for &T {
    fn coordinates(&self) -> Option<Coordinates> {
        (**self).coordinates()
    }
}

/// A located record that can be grouped into a city cluster.
pub trait Visit: Located {
    /// Display name, used as the cluster name when reverse geocoding fails.
    fn label(&self) -> &str;

    /// Assigned calendar day as stored (`YYYY-MM-DD`), if any.
    fn day(&self) -> Option<&str>;
}

/// How the traveller gets from one stop to the next.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TravelMode {
    /// By car at a flat 60 mph.
    Driving,
    /// On foot at a flat 3 mph.
    #[default]
    Walking,
}

impl TravelMode {
    /// Average speed in miles per hour.
    #[must_use]
    pub const fn speed_mph(self) -> f64 {
        match self {
            Self::Driving => 60.0,
            Self::Walking => 3.0,
        }
    }

    /// Parses a mode name, falling back to walking for anything unknown.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        name.trim()
            .to_ascii_lowercase()
            .parse()
            .unwrap_or_default()
    }
}

/// A duration estimate split for display as `"{hours}h {minutes}m"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelEstimate {
    /// Mode the estimate was computed for.
    pub mode: TravelMode,
    /// Fractional hours.
    pub hours: f64,
    /// Whole hours (truncated).
    pub whole_hours: u64,
    /// Remaining whole minutes (truncated).
    pub minutes: u64,
}

impl TravelEstimate {
    /// Splits fractional `hours` into whole hours and minutes.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn new(mode: TravelMode, hours: f64) -> Self {
        let clamped = hours.max(0.0);
        let whole_hours = clamped.trunc() as u64;
        let minutes = ((clamped - whole_hours as f64) * 60.0).trunc() as u64;
        Self {
            mode,
            hours,
            whole_hours,
            minutes,
        }
    }
}

impl std::fmt::Display for TravelEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {}m", self.whole_hours, self.minutes)
    }
}

/// A group of located places sharing a resolved city name.
///
/// Derived on every query; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityCluster<T> {
    /// Resolved city name (or the first member's own name as a fallback).
    pub name: String,
    /// Members in input order.
    pub places: Vec<T>,
    /// Mean latitude of the members, absent only for an empty cluster.
    pub lat: Option<f64>,
    /// Mean longitude of the members, absent only for an empty cluster.
    pub lon: Option<f64>,
    /// Distinct valid visit dates among the members, ascending.
    pub dates: Vec<NaiveDate>,
}

impl<T> CityCluster<T> {
    /// Centroid as a coordinate pair, if the cluster has members.
    #[must_use]
    pub const fn centroid(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.lat, self.lon)
    }
}

/// A visiting order produced by the nearest-neighbor optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedRoute<T> {
    /// Stops in visiting order; a permutation of the input.
    pub stops: Vec<T>,
    /// Sum of consecutive great-circle legs in miles.
    pub total_miles: f64,
    /// Driving time for `total_miles`.
    pub total_time: TravelEstimate,
}

impl<T> OptimizedRoute<T> {
    /// Total distance in kilometres.
    #[must_use]
    pub fn total_km(&self) -> f64 {
        self.total_miles * KM_PER_MILE
    }
}
