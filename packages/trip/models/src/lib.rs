#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Trip planning domain records and persisted document shapes.
//!
//! Each top-level document key in the store has a typed counterpart here
//! ([`PlacesDocument`], [`TodoDocument`], [`TripInfo`], ...). Every field
//! carries a serde default so that partial or older documents still parse;
//! the field names match the JSON that has always been written to disk.

pub mod budget;
pub mod trip_info;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use trip_planner_geography_models::{Coordinates, Located, Visit};

pub use budget::{BudgetDocument, Expense, GROUP_BUCKET};
pub use trip_info::{Flight, Hotel, TripInfo};

/// Returns the next free identifier: one more than the largest existing
/// id, or `1` for an empty collection.
#[must_use]
pub fn next_id(ids: impl IntoIterator<Item = u64>) -> u64 {
    ids.into_iter().max().unwrap_or(0).saturating_add(1)
}

/// What kind of place this is.
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
pub enum PlaceCategory {
    /// Sight, park, museum, and so on.
    #[default]
    Attraction,
    /// Somewhere to eat.
    Restaurant,
}

/// A place the group wants to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique, monotonically assigned identifier.
    #[serde(default)]
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Attraction or restaurant.
    #[serde(rename = "type", default)]
    pub category: PlaceCategory,
    /// Latitude; meaningful only together with `lon`.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude; meaningful only together with `lat`.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// External link.
    #[serde(default)]
    pub link: Option<String>,
    /// Assigned calendar day, `YYYY-MM-DD`.
    #[serde(default)]
    pub day: Option<String>,
    /// Photo reference (the photo document key).
    #[serde(default)]
    pub photo: Option<String>,
    /// Whether the place has been visited.
    #[serde(default)]
    pub completed: bool,
}

impl Place {
    /// Drops a half-set coordinate pair so the place becomes unlocated.
    pub const fn normalize_coordinates(&mut self) {
        if self.lat.is_none() || self.lon.is_none() {
            self.lat = None;
            self.lon = None;
        }
    }

    /// Sets or clears both coordinates at once.
    pub const fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        match coordinates {
            Some(c) => {
                self.lat = Some(c.lat);
                self.lon = Some(c.lon);
            }
            None => {
                self.lat = None;
                self.lon = None;
            }
        }
    }

    /// Whether both coordinates are present.
    #[must_use]
    pub const fn is_located(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

impl Located for Place {
    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.lat, self.lon)
    }
}

impl Visit for Place {
    fn label(&self) -> &str {
        &self.name
    }

    fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }
}

/// Fields a caller supplies when creating a place; the id is assigned on
/// insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPlace {
    /// Display name.
    pub name: String,
    /// Attraction or restaurant.
    #[serde(rename = "type", default)]
    pub category: PlaceCategory,
    /// Latitude.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// External link.
    #[serde(default)]
    pub link: Option<String>,
    /// Assigned calendar day.
    #[serde(default)]
    pub day: Option<String>,
}

impl NewPlace {
    /// Materializes the place under `id`.
    #[must_use]
    pub fn into_place(self, id: u64) -> Place {
        let mut place = Place {
            id,
            name: self.name,
            category: self.category,
            lat: self.lat,
            lon: self.lon,
            description: self.description,
            link: self.link.filter(|l| !l.is_empty()),
            day: self.day.filter(|d| !d.is_empty()),
            photo: None,
            completed: false,
        };
        place.normalize_coordinates();
        place
    }
}

/// The `places` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacesDocument {
    /// All places, in insertion order.
    #[serde(default)]
    pub places: Vec<Place>,
}

impl PlacesDocument {
    /// Normalizes every place's coordinates.
    pub fn normalize(&mut self) {
        for place in &mut self.places {
            place.normalize_coordinates();
        }
    }

    /// Id for the next inserted place.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        next_id(self.places.iter().map(|p| p.id))
    }

    /// Finds a place by id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    /// Finds a place by id, mutably.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Place> {
        self.places.iter_mut().find(|p| p.id == id)
    }
}

/// A to-do list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Identifier.
    #[serde(default)]
    pub id: u64,
    /// What needs doing.
    #[serde(default)]
    pub text: String,
    /// Done or not.
    #[serde(default)]
    pub completed: bool,
    /// Priority label as entered.
    #[serde(default)]
    pub priority: String,
}

/// The `todo` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDocument {
    /// Items in insertion order.
    #[serde(default)]
    pub items: Vec<TodoItem>,
}

/// One entry in a person's packing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingItem {
    /// Identifier, unique within one person's list.
    #[serde(default)]
    pub id: u64,
    /// What to pack.
    #[serde(default)]
    pub text: String,
    /// Already in the bag.
    #[serde(default)]
    pub packed: bool,
}

/// The `packing` document: registered user name to packing list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackingDocument(pub BTreeMap<String, Vec<PackingItem>>);

impl PackingDocument {
    /// Adds an empty list for every user that lacks one.
    ///
    /// Returns `true` if anything was added.
    pub fn ensure_users(&mut self, users: &[String]) -> bool {
        let mut changed = false;
        for user in users {
            if !self.0.contains_key(user) {
                self.0.insert(user.clone(), Vec::new());
                changed = true;
            }
        }
        changed
    }
}

/// A free-form note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Identifier.
    #[serde(default)]
    pub id: u64,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Optional URL.
    #[serde(default)]
    pub link: Option<String>,
    /// Creation timestamp, `YYYY-MM-DD HH:MM`.
    #[serde(default)]
    pub date: String,
}

/// The `notes` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesDocument {
    /// Notes in insertion order.
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// The `users` document: everyone on the trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersDocument {
    /// Registered user names.
    #[serde(default)]
    pub users: Vec<String>,
}

/// A single day's forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Rounded mean of max and min, °F.
    pub temperature: i64,
    /// Daily maximum, °F.
    pub temp_max: i64,
    /// Daily minimum, °F.
    pub temp_min: i64,
    /// Same as `temperature`; the upstream series has no apparent
    /// temperature.
    pub feels_like: i64,
    /// Short condition (Clear, Cloudy, Rain, ...).
    pub condition: String,
    /// Full WMO description.
    pub description: String,
    /// Precipitation sum in inches, two decimals.
    pub precipitation: f64,
    /// Max wind speed, mph.
    pub wind_speed: i64,
    /// Dominant wind direction, degrees.
    pub wind_direction: i64,
    /// Raw WMO weather code.
    pub weathercode: i64,
    /// The forecast day, `YYYY-MM-DD`.
    pub forecast_time: String,
}

/// How long a cached forecast is served before the service is asked again.
pub const FORECAST_TTL: TimeDelta = TimeDelta::hours(6);

/// A forecast remembered in the `weather` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedForecast {
    /// Location label the forecast was requested for.
    pub location: String,
    /// Latitude used for the lookup.
    pub lat: f64,
    /// Longitude used for the lookup.
    pub lon: f64,
    /// When the forecast was fetched. Entries without one are stale.
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
    /// The forecast itself.
    pub forecast: DailyForecast,
}

impl CachedForecast {
    /// Whether the entry was fetched less than [`FORECAST_TTL`] before `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.fetched_at
            .is_some_and(|fetched| fetched <= now && now - fetched < FORECAST_TTL)
    }
}

/// The `weather` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherDocument {
    /// Cached forecasts.
    #[serde(default)]
    pub forecasts: Vec<CachedForecast>,
}

impl WeatherDocument {
    /// Finds a cached forecast for `location` on `date` that is still fresh
    /// at `now`.
    #[must_use]
    pub fn find(
        &self,
        location: &str,
        date: &str,
        now: DateTime<Utc>,
    ) -> Option<&DailyForecast> {
        self.forecasts
            .iter()
            .find(|c| {
                c.location == location && c.forecast.forecast_time == date && c.is_fresh(now)
            })
            .map(|c| &c.forecast)
    }

    /// Inserts or replaces the forecast for its location and day, dropping
    /// every entry for a day before `today`.
    pub fn upsert(&mut self, entry: CachedForecast, today: NaiveDate) {
        let today = today.format("%Y-%m-%d").to_string();
        self.forecasts.retain(|c| {
            c.forecast.forecast_time >= today
                && (c.location != entry.location
                    || c.forecast.forecast_time != entry.forecast.forecast_time)
        });
        self.forecasts.push(entry);
    }
}

/// The `exchange_rates` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRatesDocument {
    /// Currency code to units per US dollar.
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
    /// When the rates were last refreshed.
    #[serde(default)]
    pub updated: Option<String>,
}
