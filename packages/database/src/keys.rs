//! Document keys and their default shapes.

use serde_json::{Value, json};
use strum::IntoEnumIterator as _;
use strum_macros::{AsRefStr, EnumIter};

/// Prefix of per-place photo keys: `photo_<place_id>`.
pub const PHOTO_KEY_PREFIX: &str = "photo_";

/// The fixed top-level domain keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DomainKey {
    /// Places to visit.
    Places,
    /// To-do list.
    Todo,
    /// Flights and hotels.
    TripInfo,
    /// Per-person packing lists.
    Packing,
    /// Shared expenses.
    Budget,
    /// Free-form notes.
    Notes,
    /// Registered users.
    Users,
    /// Cached weather forecasts.
    Weather,
    /// Currency exchange rates.
    ExchangeRates,
}

impl DomainKey {
    /// All fixed keys in a stable order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// The empty document stored under this key until something is saved.
    #[must_use]
    pub fn default_document(self) -> Value {
        match self {
            Self::Places => json!({"places": []}),
            Self::Todo => json!({"items": []}),
            Self::TripInfo => json!({"flights": [], "hotels": []}),
            Self::Packing => json!({}),
            Self::Budget => json!({"expenses": []}),
            Self::Notes => json!({"notes": []}),
            Self::Users => json!({"users": []}),
            Self::Weather => json!({"forecasts": []}),
            Self::ExchangeRates => json!({"rates": {}}),
        }
    }
}

/// Key of one stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentKey {
    /// One of the fixed domain documents.
    Domain(DomainKey),
    /// The photo attached to a place.
    Photo(u64),
}

impl DocumentKey {
    /// Parses a storage key back into a [`DocumentKey`].
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        if let Some(id) = key.strip_prefix(PHOTO_KEY_PREFIX) {
            return id.parse().ok().map(Self::Photo);
        }
        DomainKey::iter()
            .find(|k| k.as_ref() == key)
            .map(Self::Domain)
    }

    /// The string stored in the backend.
    #[must_use]
    pub fn storage_key(&self) -> String {
        match self {
            Self::Domain(key) => key.as_ref().to_string(),
            Self::Photo(place_id) => format!("{PHOTO_KEY_PREFIX}{place_id}"),
        }
    }

    /// Default document for this key; `null` for photos.
    #[must_use]
    pub fn default_document(&self) -> Value {
        match self {
            Self::Domain(key) => key.default_document(),
            Self::Photo(_) => Value::Null,
        }
    }
}

impl From<DomainKey> for DocumentKey {
    fn from(key: DomainKey) -> Self {
        Self::Domain(key)
    }
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.storage_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_match_persisted_names() {
        let names: Vec<String> = DomainKey::all()
            .into_iter()
            .map(|k| DocumentKey::from(k).storage_key())
            .collect();
        assert_eq!(
            names,
            vec![
                "places",
                "todo",
                "trip_info",
                "packing",
                "budget",
                "notes",
                "users",
                "weather",
                "exchange_rates"
            ]
        );
        assert_eq!(DocumentKey::Photo(12).storage_key(), "photo_12");
    }

    #[test]
    fn parse_round_trips() {
        for key in DomainKey::all() {
            let doc_key = DocumentKey::from(key);
            assert_eq!(DocumentKey::parse(&doc_key.storage_key()), Some(doc_key));
        }
        assert_eq!(DocumentKey::parse("photo_7"), Some(DocumentKey::Photo(7)));
        assert_eq!(DocumentKey::parse("photo_x"), None);
        assert_eq!(DocumentKey::parse("../etc/passwd"), None);
    }

    #[test]
    fn defaults_are_never_null() {
        for key in DomainKey::all() {
            assert!(!key.default_document().is_null(), "{key:?}");
        }
    }
}
