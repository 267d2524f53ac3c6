#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Trip planning services.
//!
//! Each module loads the documents it needs from a [`PersistenceStore`],
//! applies one operation, and writes the changed document back whole:
//!
//! - [`places`]: place lifecycle (add, delete, day, completion, photo).
//! - [`itinerary`]: per-day grouping, day route optimization,
//!   point-to-point distances, and city clusters.
//! - [`people`]: registered users and their packing lists.
//! - [`bookings`]: flights and hotels.
//! - [`budget`]: shared expenses and their summaries.
//! - [`weather`]: cached daily forecasts.
//!
//! Read-only queries fall back to empty documents when the store fails, so
//! one broken document never takes down an unrelated view. Mutations
//! propagate store errors instead, so a failed read is never saved back
//! over real data.

pub mod bookings;
pub mod budget;
pub mod itinerary;
pub mod people;
pub mod places;
pub mod weather;

use serde::de::DeserializeOwned;
use thiserror::Error;
use trip_planner_database::{DomainKey, PersistenceStore, StoreError};
use trip_planner_geography::RouteError;

/// Errors from trip planning operations.
#[derive(Debug, Error)]
pub enum TripError {
    /// Document store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Stored document does not have the expected shape.
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// Route could not be optimized.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// No record with the given id.
    #[error("No {kind} with id {id}")]
    NotFound {
        /// Record kind (`"place"`, ...).
        kind: &'static str,
        /// The missing id.
        id: u64,
    },

    /// A place needed for a distance has no coordinates.
    #[error("Place {id} has no coordinates")]
    Unlocated {
        /// Place id.
        id: u64,
    },

    /// User name is empty after trimming.
    #[error("User name must not be empty")]
    EmptyUserName,

    /// User is already registered.
    #[error("User {name:?} already exists")]
    DuplicateUser {
        /// The rejected name.
        name: String,
    },

    /// Date string is not `YYYY-MM-DD`.
    #[error("Invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected value.
        value: String,
    },
}

/// Loads a typed document for a read-only view, logging and substituting
/// the empty document on failure.
pub(crate) async fn read_or_default<T: DeserializeOwned + Default>(
    store: &PersistenceStore,
    key: DomainKey,
) -> T {
    match store.load_typed(key).await {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("Failed to load {}: {e}", key.as_ref());
            T::default()
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use trip_planner_database::{PersistenceStore, StoreConfig};

    /// A file-backed store in a fresh temp directory.
    pub fn temp_store(name: &str) -> (PersistenceStore, PathBuf) {
        let tmp = std::env::temp_dir().join(format!(
            "trip_planner_trip_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&tmp);
        let store = PersistenceStore::from_config(
            &StoreConfig::File { root: tmp.clone() },
            reqwest::Client::new(),
        );
        (store, tmp)
    }
}
