#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route and geography engine for the trip planner.
//!
//! - [`distance`]: haversine distances (Earth radius 3959 mi), route
//!   totals, and flat-speed travel time estimates.
//! - [`cluster`]: city-level grouping of located places through reverse
//!   geocoding.
//! - [`route`]: greedy nearest-neighbor ordering of one day's stops.
//!
//! Nothing here touches persistence; callers load places, hand them in,
//! and render or store whatever comes back.

pub mod cluster;
pub mod distance;
pub mod route;

pub use cluster::{cluster_by_city, parse_day};
pub use distance::{
    EARTH_RADIUS_MILES, distance, distance_between, estimate, estimate_travel_time,
    route_distance,
};
pub use route::{RouteError, optimize};
