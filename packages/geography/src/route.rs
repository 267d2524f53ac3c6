//! Greedy nearest-neighbor visiting order for one day's stops.
//!
//! Not an optimal tour: each step moves to the closest stop not yet
//! visited. That is O(n²), which is fine for the handful of stops a single
//! day ever has.

use thiserror::Error;
use trip_planner_geography_models::{
    Coordinates, Located, OptimizedRoute, TravelEstimate, TravelMode,
};

use crate::distance::{distance_between, estimate_travel_time, route_distance};

/// Errors from route optimization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// Fewer than two stops were supplied.
    #[error("Route optimization needs at least 2 stops, got {count}")]
    TooFewStops {
        /// Number of stops supplied.
        count: usize,
    },

    /// A stop has no coordinates.
    #[error("Stop {index} has no coordinates")]
    Unlocated {
        /// Position of the stop in the input.
        index: usize,
    },
}

/// Orders `stops` by repeatedly walking to the nearest unvisited stop.
///
/// The first input stop is always the start. Ties go to whichever stop
/// comes first in the input. The result is a permutation of the input, its
/// total distance is [`route_distance`] of that permutation, and its time
/// is the driving estimate for that distance.
///
/// # Errors
///
/// Returns [`RouteError::TooFewStops`] for fewer than two stops and
/// [`RouteError::Unlocated`] if any stop lacks coordinates.
pub fn optimize<T: Located + Clone>(stops: &[T]) -> Result<OptimizedRoute<T>, RouteError> {
    if stops.len() < 2 {
        return Err(RouteError::TooFewStops { count: stops.len() });
    }

    let points = stops
        .iter()
        .enumerate()
        .map(|(index, stop)| stop.coordinates().ok_or(RouteError::Unlocated { index }))
        .collect::<Result<Vec<Coordinates>, _>>()?;

    let mut order = Vec::with_capacity(stops.len());
    order.push(0);
    let mut remaining: Vec<usize> = (1..stops.len()).collect();
    let mut current = points[0];

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_miles = f64::INFINITY;
        for (slot, &candidate) in remaining.iter().enumerate() {
            let miles = distance_between(current, points[candidate]);
            if miles < best_miles {
                best = slot;
                best_miles = miles;
            }
        }
        let next = remaining.remove(best);
        current = points[next];
        order.push(next);
    }

    let ordered: Vec<T> = order.into_iter().map(|i| stops[i].clone()).collect();
    let total_miles = route_distance(&ordered);
    log::debug!(
        "Optimized {} stops into a {total_miles:.1} mile route",
        ordered.len()
    );

    Ok(OptimizedRoute {
        stops: ordered,
        total_miles,
        total_time: TravelEstimate::new(
            TravelMode::Driving,
            estimate_travel_time(total_miles, TravelMode::Driving),
        ),
    })
}
