//! Day-by-day itinerary views over places.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trip_planner_database::PersistenceStore;
use trip_planner_geocoder::GeoResolver;
use trip_planner_geography::{cluster_by_city, distance_between, estimate, optimize};
use trip_planner_geography_models::{
    CityCluster, Coordinates, KM_PER_MILE, Located, OptimizedRoute, TravelEstimate, TravelMode,
};
use trip_planner_trip_models::{Place, PlacesDocument};

use crate::TripError;
use crate::places::list_places;

/// Groups places that have a day by that day, days ascending, places in
/// stored order within a day.
#[must_use]
pub fn places_by_day(doc: &PlacesDocument) -> BTreeMap<String, Vec<Place>> {
    let mut days: BTreeMap<String, Vec<Place>> = BTreeMap::new();
    for place in &doc.places {
        if let Some(day) = place.day.as_deref().filter(|d| !d.is_empty()) {
            days.entry(day.to_string()).or_default().push(place.clone());
        }
    }
    days
}

/// Loads places and groups them by day.
pub async fn itinerary(store: &PersistenceStore) -> BTreeMap<String, Vec<Place>> {
    places_by_day(&list_places(store).await)
}

/// Orders the located places planned for `day` by nearest neighbor.
///
/// # Errors
///
/// Returns [`TripError::Route`] when fewer than two located places are
/// planned for the day.
pub async fn optimize_day(
    store: &PersistenceStore,
    day: &str,
) -> Result<OptimizedRoute<Place>, TripError> {
    let doc = list_places(store).await;
    let stops: Vec<Place> = doc
        .places
        .into_iter()
        .filter(|p| p.day.as_deref() == Some(day) && p.is_located())
        .collect();

    let route = optimize(&stops)?;
    log::debug!(
        "Optimized {} stops on {day}: {:.1} mi",
        route.stops.len(),
        route.total_miles
    );
    Ok(route)
}

/// Straight-line distance between two places with travel estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDistance {
    /// Start place id.
    pub from: u64,
    /// End place id.
    pub to: u64,
    /// Great-circle miles.
    pub miles: f64,
    /// Same distance in kilometres.
    pub km: f64,
    /// At 60 mph.
    pub driving: TravelEstimate,
    /// At 3 mph.
    pub walking: TravelEstimate,
}

/// Distance between the places `from` and `to`.
///
/// # Errors
///
/// Returns [`TripError::NotFound`] if either id is unknown and
/// [`TripError::Unlocated`] if either place has no coordinates.
pub async fn distance_between_places(
    store: &PersistenceStore,
    from: u64,
    to: u64,
) -> Result<PlaceDistance, TripError> {
    let doc = list_places(store).await;
    let locate = |id: u64| -> Result<Coordinates, TripError> {
        let place = doc.get(id).ok_or(TripError::NotFound { kind: "place", id })?;
        place.coordinates().ok_or(TripError::Unlocated { id })
    };
    let start = locate(from)?;
    let end = locate(to)?;

    let miles = distance_between(start, end);
    Ok(PlaceDistance {
        from,
        to,
        miles,
        km: miles * KM_PER_MILE,
        driving: estimate(miles, TravelMode::Driving),
        walking: estimate(miles, TravelMode::Walking),
    })
}

/// Groups located places by reverse-geocoded city.
pub async fn city_clusters<R: GeoResolver + ?Sized>(
    store: &PersistenceStore,
    resolver: &R,
) -> BTreeMap<String, CityCluster<Place>> {
    let doc = list_places(store).await;
    cluster_by_city(&doc.places, resolver).await
}
