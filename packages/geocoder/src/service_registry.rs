//! Compile-time registry of geocoding service configurations.
//!
//! Each upstream service is defined in a TOML file under `services/`.
//! The registry embeds these at compile time and exposes them via
//! [`all_services`], [`reverse_service`], and [`forward_service`].

use std::time::Duration;

use serde::Deserialize;

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`, `"open_meteo"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Nominatim reverse lookup (coordinates to address).
    NominatimReverse {
        /// Endpoint URL (e.g., `"https://nominatim.openstreetmap.org/reverse"`).
        base_url: String,
        /// `User-Agent` sent with every request, required by the public
        /// instance's usage policy.
        user_agent: String,
    },
    /// Open-Meteo name search (place name to coordinates).
    OpenMeteoSearch {
        /// Endpoint URL (e.g., `"https://geocoding-api.open-meteo.com/v1/search"`).
        base_url: String,
        /// Result language code.
        language: String,
    },
}

const fn default_timeout_secs() -> u64 {
    5
}

impl GeocodingService {
    /// Returns the provider's endpoint URL regardless of variant.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::NominatimReverse { base_url, .. }
            | ProviderConfig::OpenMeteoSearch { base_url, .. } => base_url,
        }
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[
    ("nominatim", include_str!("../services/nominatim.toml")),
    ("open_meteo", include_str!("../services/open_meteo.toml")),
];

#[cfg(test)]
const EXPECTED_SERVICE_COUNT: usize = 2;

/// Returns all geocoding service configurations.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_services() -> Vec<GeocodingService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse geocoding service '{name}': {e}"))
        })
        .collect()
}

/// Returns the configured reverse geocoding service, if any.
#[must_use]
pub fn reverse_service() -> Option<GeocodingService> {
    all_services()
        .into_iter()
        .find(|s| matches!(s.provider, ProviderConfig::NominatimReverse { .. }))
}

/// Returns the configured forward geocoding service, if any.
#[must_use]
pub fn forward_service() -> Option<GeocodingService> {
    all_services()
        .into_iter()
        .find(|s| matches!(s.provider, ProviderConfig::OpenMeteoSearch { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_services() {
        let services = all_services();
        assert_eq!(services.len(), EXPECTED_SERVICE_COUNT);
    }

    #[test]
    fn service_ids_are_unique() {
        let services = all_services();
        let mut seen = BTreeSet::new();
        for svc in &services {
            assert!(seen.insert(&svc.id), "Duplicate service ID: {}", svc.id);
        }
    }

    #[test]
    fn all_services_have_required_fields() {
        for svc in &all_services() {
            assert!(!svc.id.is_empty(), "Service has empty id");
            assert!(!svc.name.is_empty(), "Service {} has empty name", svc.id);
            assert!(
                !svc.base_url().is_empty(),
                "Service {} has empty base_url",
                svc.id
            );
        }
    }

    #[test]
    fn timeouts_stay_short() {
        for svc in &all_services() {
            assert!(
                svc.timeout() <= Duration::from_secs(5),
                "Service {} waits longer than 5s",
                svc.id
            );
        }
    }

    #[test]
    fn both_directions_are_configured() {
        let ProviderConfig::OpenMeteoSearch { language, .. } = forward_service().unwrap().provider
        else {
            panic!("forward service is not Open-Meteo");
        };
        assert_eq!(language, "en");
        assert!(reverse_service().is_some());
    }
}
