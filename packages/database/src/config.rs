//! Backend selection.
//!
//! Resolved once at startup: when both remote credentials are present the
//! remote table is used, otherwise documents live as JSON files on disk.

use std::path::PathBuf;

use crate::paths;

/// Environment variable holding the remote store's base URL.
pub const URL_VAR: &str = "SUPABASE_URL";

/// Environment variable holding the remote store's access key.
pub const KEY_VAR: &str = "SUPABASE_KEY";

/// Table that holds one row per document key.
pub const DEFAULT_TABLE: &str = "app_data";

/// Which backend the store talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// JSON files under `root`.
    File {
        /// Directory holding `<key>.json` files.
        root: PathBuf,
    },
    /// A `PostgREST` table keyed by document key.
    Remote {
        /// Project base URL, without trailing slash.
        url: String,
        /// Access key sent as `apikey` and bearer token.
        api_key: String,
        /// Table name.
        table: String,
    },
}

impl StoreConfig {
    /// Reads [`URL_VAR`] and [`KEY_VAR`]; falls back to files under
    /// [`paths::data_dir`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_credentials(
            std::env::var(URL_VAR).ok(),
            std::env::var(KEY_VAR).ok(),
            paths::data_dir(),
        )
    }

    /// Picks the remote backend only when both credentials are non-empty.
    #[must_use]
    pub fn from_credentials(url: Option<String>, api_key: Option<String>, root: PathBuf) -> Self {
        let url = url.map(|u| u.trim().trim_end_matches('/').to_string());
        let api_key = api_key.map(|k| k.trim().to_string());
        match (url, api_key) {
            (Some(url), Some(api_key)) if !url.is_empty() && !api_key.is_empty() => Self::Remote {
                url,
                api_key,
                table: DEFAULT_TABLE.to_string(),
            },
            _ => Self::File { root },
        }
    }

    /// Whether the remote backend is selected.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_credentials_select_remote() {
        let config = StoreConfig::from_credentials(
            Some("https://abc.supabase.co/".to_string()),
            Some("secret".to_string()),
            PathBuf::from("data"),
        );
        assert_eq!(
            config,
            StoreConfig::Remote {
                url: "https://abc.supabase.co".to_string(),
                api_key: "secret".to_string(),
                table: DEFAULT_TABLE.to_string(),
            }
        );
    }

    #[test]
    fn missing_or_empty_credential_selects_files() {
        let root = PathBuf::from("data");
        for (url, key) in [
            (None, None),
            (Some("https://abc.supabase.co"), None),
            (None, Some("secret")),
            (Some(""), Some("secret")),
            (Some("https://abc.supabase.co"), Some("  ")),
        ] {
            let config = StoreConfig::from_credentials(
                url.map(String::from),
                key.map(String::from),
                root.clone(),
            );
            assert!(!config.is_remote(), "{url:?} / {key:?}");
        }
    }
}
