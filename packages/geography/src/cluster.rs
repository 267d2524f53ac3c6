//! Groups located places into city-level clusters.
//!
//! Each located place is named by a reverse geocode of its coordinates.
//! Places whose lookup fails fall back to their own label, so every
//! located place lands in exactly one cluster. Unlocated places are left
//! out entirely.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use trip_planner_geocoder::GeoResolver;
use trip_planner_geography_models::{CityCluster, Visit};

/// Date format of a place's `day`.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parses a stored day, returning `None` for anything malformed.
#[must_use]
pub fn parse_day(day: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(day, DAY_FORMAT).ok()
}

struct Accumulator<T> {
    places: Vec<T>,
    lat_sum: f64,
    lon_sum: f64,
    dates: BTreeSet<NaiveDate>,
}

impl<T> Accumulator<T> {
    const fn new() -> Self {
        Self {
            places: Vec::new(),
            lat_sum: 0.0,
            lon_sum: 0.0,
            dates: BTreeSet::new(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self, name: String) -> CityCluster<T> {
        let count = self.places.len();
        let (lat, lon) = if count == 0 {
            (None, None)
        } else {
            (
                Some(self.lat_sum / count as f64),
                Some(self.lon_sum / count as f64),
            )
        };
        CityCluster {
            name,
            places: self.places,
            lat,
            lon,
            dates: self.dates.into_iter().collect(),
        }
    }
}

/// Clusters `places` by reverse-geocoded city name.
///
/// Issues at most one reverse lookup per distinct coordinate pair; places
/// sharing exact coordinates reuse the first answer. Lookups run one after
/// another, never in parallel, since the upstream service is rate limited.
pub async fn cluster_by_city<T, R>(places: &[T], resolver: &R) -> BTreeMap<String, CityCluster<T>>
where
    T: Visit + Clone,
    R: GeoResolver + ?Sized,
{
    let mut resolved: HashMap<(u64, u64), Option<String>> = HashMap::new();
    let mut groups: BTreeMap<String, Accumulator<T>> = BTreeMap::new();

    for place in places {
        let Some(at) = place.coordinates() else {
            continue;
        };

        let key = (at.lat.to_bits(), at.lon.to_bits());
        let city = match resolved.get(&key) {
            Some(city) => city.clone(),
            None => {
                let city = resolver.reverse_geocode_or_none(at.lat, at.lon).await;
                resolved.insert(key, city.clone());
                city
            }
        };
        let name = city.unwrap_or_else(|| place.label().to_string());

        let group = groups.entry(name).or_insert_with(Accumulator::new);
        group.places.push(place.clone());
        group.lat_sum += at.lat;
        group.lon_sum += at.lon;
        if let Some(date) = place.day().and_then(parse_day) {
            group.dates.insert(date);
        }
    }

    log::debug!(
        "Clustered {} places into {} cities with {} lookups",
        places.len(),
        groups.len(),
        resolved.len()
    );

    groups
        .into_iter()
        .map(|(name, group)| {
            let cluster = group.finish(name.clone());
            (name, cluster)
        })
        .collect()
}
