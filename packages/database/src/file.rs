//! File-backed documents: one pretty-printed JSON file per key.
//!
//! Saves write a sibling temp file and rename it over the target, so a
//! reader sees either the old document or the new one, never a torn write.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::{DocumentBackend, StoreError, paths};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Stores documents as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `root`. The directory is created on the
    /// first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the documents.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if !valid {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(paths::document_path(&self.root, key))
    }
}

#[async_trait]
impl DocumentBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn put(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        paths::ensure_dir(&self.root).await?;

        let body = serde_json::to_vec_pretty(value)?;
        let temp = self.root.join(format!(
            ".{key}.{}.{}.tmp",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        tokio::fs::write(&temp, &body).await?;
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        log::debug!("Wrote {} ({} bytes)", path.display(), body.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_root(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!(
            "trip_planner_file_backend_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&tmp);
        tmp
    }

    #[tokio::test]
    async fn missing_file_is_none() {
        let backend = FileBackend::new(temp_root("missing"));
        assert!(backend.fetch("places").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_replaces_whole_document() {
        let root = temp_root("replace");
        let backend = FileBackend::new(&root);

        backend.put("notes", &json!({"notes": [1, 2]})).await.unwrap();
        backend.put("notes", &json!({"notes": []})).await.unwrap();

        assert_eq!(
            backend.fetch("notes").await.unwrap(),
            Some(json!({"notes": []}))
        );
        let leftovers: Vec<_> = std::fs::read_dir(&root)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let root = temp_root("corrupt");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("todo.json"), "{not json").unwrap();

        let backend = FileBackend::new(&root);
        assert!(matches!(
            backend.fetch("todo").await,
            Err(StoreError::Json(_))
        ));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let root = temp_root("remove");
        let backend = FileBackend::new(&root);
        backend.put("photo_3", &json!({"filename": "a.jpg", "data": "AA=="})).await.unwrap();

        backend.remove("photo_3").await.unwrap();
        backend.remove("photo_3").await.unwrap();
        assert!(backend.fetch("photo_3").await.unwrap().is_none());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn rejects_path_like_keys() {
        let backend = FileBackend::new(temp_root("invalid"));
        assert!(matches!(
            backend.fetch("../secrets").await,
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            backend.put("", &json!({})).await,
            Err(StoreError::InvalidKey { .. })
        ));
    }
}
