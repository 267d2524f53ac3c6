//! Flights and hotels (the `trip_info` document).

use trip_planner_database::{DomainKey, PersistenceStore};
use trip_planner_trip_models::{Flight, Hotel, TripInfo};

use crate::TripError;

/// Loads trip info, upgrading the legacy flights object to a list and
/// writing the upgraded document back.
///
/// # Errors
///
/// Returns [`TripError::Store`] on store failure and [`TripError::Json`]
/// if the document is malformed.
pub async fn load_trip_info(store: &PersistenceStore) -> Result<TripInfo, TripError> {
    let value = store.try_load(DomainKey::TripInfo).await?;
    let (info, migrated) = TripInfo::from_value(value)?;
    if migrated {
        log::info!(
            "Migrated legacy flights to a list of {}",
            info.flights.len()
        );
        store.save_typed(DomainKey::TripInfo, &info).await?;
    }
    Ok(info)
}

/// Adds a flight and returns its id.
///
/// # Errors
///
/// Same as [`load_trip_info`].
pub async fn add_flight(store: &PersistenceStore, flight: Flight) -> Result<u64, TripError> {
    let mut info = load_trip_info(store).await?;
    let id = info.add_flight(flight);
    store.save_typed(DomainKey::TripInfo, &info).await?;
    Ok(id)
}

/// Adds a hotel and returns its id.
///
/// # Errors
///
/// Same as [`load_trip_info`].
pub async fn add_hotel(store: &PersistenceStore, hotel: Hotel) -> Result<u64, TripError> {
    let mut info = load_trip_info(store).await?;
    let id = info.add_hotel(hotel);
    store.save_typed(DomainKey::TripInfo, &info).await?;
    Ok(id)
}
