//! Flights and hotels (the `trip_info` document).
//!
//! Older documents stored flights as an object with `outbound` and
//! `return` entries. [`TripInfo::from_value`] accepts both shapes and
//! reports when a migration to the list shape happened so the caller can
//! write the upgraded document back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::next_id;

/// A booked flight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Identifier.
    #[serde(default)]
    pub id: u64,
    /// Departure date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Departure time, `HH:MM`.
    #[serde(default)]
    pub time: String,
    /// Landing time, `HH:MM`.
    #[serde(default)]
    pub landing_time: String,
    /// Duration label such as `"11h 20m"`.
    #[serde(default)]
    pub duration: String,
    /// Airline name.
    #[serde(default)]
    pub airline: String,
    /// Flight number.
    #[serde(default)]
    pub flight_number: String,
    /// Departure airport.
    #[serde(default)]
    pub from: String,
    /// Arrival airport.
    #[serde(default)]
    pub to: String,
    /// Outbound, Return, Domestic, ...
    #[serde(rename = "type", default)]
    pub flight_type: String,
}

/// A hotel booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    /// Identifier.
    #[serde(default)]
    pub id: u64,
    /// Hotel name.
    #[serde(default)]
    pub name: String,
    /// City or address.
    #[serde(default)]
    pub location: String,
    /// Check-in date, `YYYY-MM-DD`.
    #[serde(default)]
    pub check_in: String,
    /// Check-out date, `YYYY-MM-DD`.
    #[serde(default)]
    pub check_out: String,
    /// Confirmation number.
    #[serde(default)]
    pub confirmation: String,
    /// Room details.
    #[serde(default)]
    pub room_info: String,
}

/// The `trip_info` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripInfo {
    /// Flights in insertion order.
    #[serde(default)]
    pub flights: Vec<Flight>,
    /// Hotels in insertion order.
    #[serde(default)]
    pub hotels: Vec<Hotel>,
}

impl TripInfo {
    /// Parses a stored document, upgrading the legacy flights object.
    ///
    /// Returns the parsed document and whether the legacy shape was
    /// migrated. A `flights` value that is neither a list nor an object is
    /// treated as empty without counting as a migration.
    ///
    /// # Errors
    ///
    /// Returns an error if hotels or list-shaped flights fail to parse.
    pub fn from_value(value: Value) -> Result<(Self, bool), serde_json::Error> {
        let Value::Object(mut doc) = value else {
            return Ok((Self::default(), false));
        };

        let hotels = match doc.remove("hotels") {
            Some(Value::Null) | None => Vec::new(),
            Some(hotels) => serde_json::from_value(hotels)?,
        };

        let (flights, migrated) = match doc.remove("flights") {
            Some(list @ Value::Array(_)) => (serde_json::from_value(list)?, false),
            Some(Value::Object(legacy)) => (migrate_legacy_flights(&legacy), true),
            _ => (Vec::new(), false),
        };

        Ok((Self { flights, hotels }, migrated))
    }

    /// Appends a flight under a fresh id and returns that id.
    pub fn add_flight(&mut self, mut flight: Flight) -> u64 {
        flight.id = next_id(self.flights.iter().map(|f| f.id));
        let id = flight.id;
        self.flights.push(flight);
        id
    }

    /// Appends a hotel under a fresh id and returns that id.
    pub fn add_hotel(&mut self, mut hotel: Hotel) -> u64 {
        hotel.id = next_id(self.hotels.iter().map(|h| h.id));
        let id = hotel.id;
        self.hotels.push(hotel);
        id
    }
}

fn migrate_legacy_flights(legacy: &Map<String, Value>) -> Vec<Flight> {
    [("outbound", 1, "Outbound"), ("return", 2, "Return")]
        .into_iter()
        .filter_map(|(key, id, flight_type)| {
            let entry = legacy.get(key)?.as_object().filter(|o| !o.is_empty())?;
            Some(Flight {
                id,
                date: string_field(entry, "date"),
                time: string_field(entry, "time"),
                airline: string_field(entry, "airline"),
                flight_number: string_field(entry, "flight_number"),
                from: string_field(entry, "from"),
                to: string_field(entry, "to"),
                flight_type: flight_type.to_string(),
                ..Flight::default()
            })
        })
        .collect()
}

fn string_field(entry: &Map<String, Value>, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
