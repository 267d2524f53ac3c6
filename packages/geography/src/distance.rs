//! Great-circle distances and flat-speed travel time estimates.

use trip_planner_geography_models::{Coordinates, Located, TravelEstimate, TravelMode};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Haversine distance in miles between two points given in degrees.
#[must_use]
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points.
    let c = 2.0 * a.min(1.0).sqrt().asin();
    EARTH_RADIUS_MILES * c
}

/// [`distance`] for coordinate pairs.
#[must_use]
pub fn distance_between(a: Coordinates, b: Coordinates) -> f64 {
    distance(a.lat, a.lon, b.lat, b.lon)
}

/// Sum of consecutive leg distances in miles.
///
/// Zero for fewer than two stops. Unlocated stops are skipped, so the leg
/// runs from the previous located stop to the next one.
#[must_use]
pub fn route_distance<T: Located>(stops: &[T]) -> f64 {
    let points: Vec<Coordinates> = stops.iter().filter_map(Located::coordinates).collect();
    points
        .windows(2)
        .map(|leg| distance_between(leg[0], leg[1]))
        .sum()
}

/// Hours needed to cover `miles` at the mode's flat speed.
#[must_use]
pub fn estimate_travel_time(miles: f64, mode: TravelMode) -> f64 {
    miles / mode.speed_mph()
}

/// [`estimate_travel_time`] split into hours and minutes for display.
#[must_use]
pub fn estimate(miles: f64, mode: TravelMode) -> TravelEstimate {
    TravelEstimate::new(mode, estimate_travel_time(miles, mode))
}
