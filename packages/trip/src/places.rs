//! Place lifecycle over the `places` document.

use trip_planner_database::{DocumentKey, DomainKey, PersistenceStore, Photo};
use trip_planner_geography_models::Coordinates;
use trip_planner_trip_models::{NewPlace, Place, PlacesDocument};

use crate::{TripError, read_or_default};

/// Loads all places with coordinates normalized. Store failures read as an
/// empty list.
pub async fn list_places(store: &PersistenceStore) -> PlacesDocument {
    let mut doc: PlacesDocument = read_or_default(store, DomainKey::Places).await;
    doc.normalize();
    doc
}

async fn load_for_update(store: &PersistenceStore) -> Result<PlacesDocument, TripError> {
    let mut doc: PlacesDocument = store.load_typed(DomainKey::Places).await?;
    doc.normalize();
    Ok(doc)
}

/// Inserts a place under the next free id.
///
/// # Errors
///
/// Returns [`TripError::Store`] if the document cannot be read or written.
pub async fn add_place(store: &PersistenceStore, new_place: NewPlace) -> Result<Place, TripError> {
    let mut doc = load_for_update(store).await?;
    let place = new_place.into_place(doc.next_id());
    doc.places.push(place.clone());
    store.save_typed(DomainKey::Places, &doc).await?;

    log::info!("Added place {} ({})", place.id, place.name);
    Ok(place)
}

/// Removes a place and its photo.
///
/// # Errors
///
/// Returns [`TripError::NotFound`] for an unknown id and
/// [`TripError::Store`] on store failure.
pub async fn delete_place(store: &PersistenceStore, id: u64) -> Result<Place, TripError> {
    let mut doc = load_for_update(store).await?;
    let index = doc
        .places
        .iter()
        .position(|p| p.id == id)
        .ok_or(TripError::NotFound { kind: "place", id })?;
    let removed = doc.places.remove(index);
    store.save_typed(DomainKey::Places, &doc).await?;

    if let Err(e) = store.delete_photo(id).await {
        log::warn!("Deleted place {id} but not its photo: {e}");
    }

    log::info!("Deleted place {id} ({})", removed.name);
    Ok(removed)
}

/// Applies `change` to one place and saves the document.
async fn update_place(
    store: &PersistenceStore,
    id: u64,
    change: impl FnOnce(&mut Place) + Send,
) -> Result<Place, TripError> {
    let mut doc = load_for_update(store).await?;
    let place = doc
        .get_mut(id)
        .ok_or(TripError::NotFound { kind: "place", id })?;
    change(place);
    place.normalize_coordinates();
    let updated = place.clone();
    store.save_typed(DomainKey::Places, &doc).await?;
    Ok(updated)
}

/// Sets or clears the day a place is planned for.
///
/// # Errors
///
/// Returns [`TripError::InvalidDate`] if `day` is not `YYYY-MM-DD`,
/// [`TripError::NotFound`] for an unknown id, and [`TripError::Store`] on
/// store failure.
pub async fn assign_day(
    store: &PersistenceStore,
    id: u64,
    day: Option<String>,
) -> Result<Place, TripError> {
    let day = day.filter(|d| !d.is_empty());
    if let Some(value) = &day
        && trip_planner_geography::parse_day(value).is_none()
    {
        return Err(TripError::InvalidDate {
            value: value.clone(),
        });
    }
    update_place(store, id, |place| place.day = day).await
}

/// Marks a place visited or not.
///
/// # Errors
///
/// Returns [`TripError::NotFound`] for an unknown id and
/// [`TripError::Store`] on store failure.
pub async fn set_completed(
    store: &PersistenceStore,
    id: u64,
    completed: bool,
) -> Result<Place, TripError> {
    update_place(store, id, |place| place.completed = completed).await
}

/// Sets both coordinates, or clears both with `None`.
///
/// # Errors
///
/// Returns [`TripError::NotFound`] for an unknown id and
/// [`TripError::Store`] on store failure.
pub async fn set_coordinates(
    store: &PersistenceStore,
    id: u64,
    coordinates: Option<Coordinates>,
) -> Result<Place, TripError> {
    update_place(store, id, |place| place.set_coordinates(coordinates)).await
}

/// Stores a photo for a place and points the place at it.
///
/// # Errors
///
/// Returns [`TripError::NotFound`] for an unknown id and
/// [`TripError::Store`] on store failure.
pub async fn attach_photo(
    store: &PersistenceStore,
    id: u64,
    photo: &Photo,
) -> Result<Place, TripError> {
    let doc = load_for_update(store).await?;
    if doc.get(id).is_none() {
        return Err(TripError::NotFound { kind: "place", id });
    }

    store.save_photo(id, photo).await?;
    let key = DocumentKey::Photo(id).storage_key();
    update_place(store, id, |place| place.photo = Some(key)).await
}
