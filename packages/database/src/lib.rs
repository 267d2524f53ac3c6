#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Key-addressed JSON document persistence for the trip planner.
//!
//! Every domain document (places, budget, packing, ...) lives under one
//! fixed key and is replaced whole on save. Place photos live under
//! `photo_<place_id>`. Two interchangeable backends are provided:
//!
//! - [`file::FileBackend`]: one JSON file per key under a data directory.
//! - [`remote::RemoteBackend`]: one row per key in a remote table.
//!
//! [`PersistenceStore`] picks one from a [`StoreConfig`] and adds typed
//! load/save helpers and default documents for missing keys.

pub mod config;
pub mod file;
pub mod keys;
pub mod paths;
pub mod remote;

#[cfg(test)]
mod test_support;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

pub use config::StoreConfig;
pub use keys::{DocumentKey, DomainKey, PHOTO_KEY_PREFIX};

/// Errors from document persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote store answered with a non-success status.
    #[error("Remote store returned {status} for key {key}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Document key of the failed request.
        key: String,
    },

    /// Only objects and arrays can be stored as documents.
    #[error("Document for key {key} is not an object or array")]
    InvalidDocument {
        /// Key the value was saved under.
        key: String,
    },

    /// Key contains characters that cannot be stored.
    #[error("Invalid document key: {key:?}")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },
}

/// A storage backend holding whole JSON documents by key.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Returns the stored document, or `None` if the key has never been
    /// saved.
    async fn fetch(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replaces the document stored under `key`.
    ///
    /// Only objects and arrays are guaranteed to read back unchanged. The
    /// remote backend parses string values as JSON on read.
    async fn put(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    /// Deletes the document under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Photo attached to a place: original filename plus base64 data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Name of the uploaded file.
    pub filename: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

/// Document store shared by every trip planner service.
pub struct PersistenceStore {
    backend: Box<dyn DocumentBackend>,
}

impl std::fmt::Debug for PersistenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceStore")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl PersistenceStore {
    /// Wraps an existing backend.
    #[must_use]
    pub fn new(backend: Box<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    /// Builds the backend described by `config`.
    #[must_use]
    pub fn from_config(config: &StoreConfig, client: reqwest::Client) -> Self {
        let backend: Box<dyn DocumentBackend> = match config {
            StoreConfig::File { root } => Box::new(file::FileBackend::new(root.clone())),
            StoreConfig::Remote {
                url,
                api_key,
                table,
            } => Box::new(remote::RemoteBackend::new(
                client,
                url.clone(),
                api_key.clone(),
                table.clone(),
            )),
        };
        log::info!("Using {} document store", backend.name());
        Self::new(backend)
    }

    /// Name of the active backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Loads the document under `key`, substituting its default when the
    /// key has never been saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read or the stored
    /// document is not valid JSON.
    pub async fn try_load(&self, key: impl Into<DocumentKey> + Send) -> Result<Value, StoreError> {
        let key = key.into();
        Ok(self
            .backend
            .fetch(&key.storage_key())
            .await?
            .unwrap_or_else(|| key.default_document()))
    }

    /// Loads the document under `key`. Any failure yields the key's default
    /// document; use [`Self::try_load`] to see the error.
    pub async fn load(&self, key: impl Into<DocumentKey> + Send) -> Value {
        let key = key.into();
        self.try_load(key)
            .await
            .unwrap_or_else(|_| key.default_document())
    }

    /// Replaces the document under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDocument`] if `value` is not an object or
    /// array, otherwise [`StoreError`] if the backend rejects the write.
    pub async fn save(
        &self,
        key: impl Into<DocumentKey> + Send,
        value: &Value,
    ) -> Result<(), StoreError> {
        let key = key.into().storage_key();
        if !(value.is_object() || value.is_array()) {
            return Err(StoreError::InvalidDocument { key });
        }
        self.backend.put(&key, value).await
    }

    /// Loads and decodes a typed document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document cannot be read or does not
    /// match `T`.
    pub async fn load_typed<T: DeserializeOwned>(&self, key: DomainKey) -> Result<T, StoreError> {
        let value = self.try_load(key).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Encodes and saves a typed document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or the write fails.
    pub async fn save_typed<T: Serialize + Sync>(
        &self,
        key: DomainKey,
        document: &T,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(document)?;
        self.save(key, &value).await
    }

    /// Loads the photo attached to `place_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails or the stored photo is
    /// malformed.
    pub async fn try_load_photo(&self, place_id: u64) -> Result<Option<Photo>, StoreError> {
        let key = DocumentKey::Photo(place_id).storage_key();
        match self.backend.fetch(&key).await? {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Loads the photo attached to `place_id`; failures read as no photo.
    pub async fn load_photo(&self, place_id: u64) -> Option<Photo> {
        self.try_load_photo(place_id).await.ok().flatten()
    }

    /// Stores the photo for `place_id`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn save_photo(&self, place_id: u64, photo: &Photo) -> Result<(), StoreError> {
        let value = serde_json::to_value(photo)?;
        self.save(DocumentKey::Photo(place_id), &value).await
    }

    /// Removes the photo for `place_id`. Missing photos are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the delete fails.
    pub async fn delete_photo(&self, place_id: u64) -> Result<(), StoreError> {
        self.backend
            .remove(&DocumentKey::Photo(place_id).storage_key())
            .await
    }
}
