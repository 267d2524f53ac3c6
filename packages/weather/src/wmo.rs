//! WMO weather interpretation codes.
//!
//! See <https://open-meteo.com/en/docs> ("WMO Weather interpretation codes").

use strum_macros::{AsRefStr, Display, EnumString};

/// Short condition label shown next to a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum Condition {
    /// Clear sky or mainly clear (0, 1).
    Clear,
    /// Partly cloudy or overcast (2, 3).
    Cloudy,
    /// Fog or rime fog (45, 48).
    Foggy,
    /// Drizzle or rain of any kind, showers included.
    Rain,
    /// Any snowfall, grains and showers included.
    Snow,
    /// Thunderstorm, with or without hail (95, 96, 99).
    Thunderstorm,
    /// Any code outside the table.
    Unknown,
}

impl Condition {
    /// Buckets a WMO code into a short condition.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 | 1 => Self::Clear,
            2 | 3 => Self::Cloudy,
            45 | 48 => Self::Foggy,
            51 | 53 | 55 | 56 | 57 | 61 | 63 | 65 | 66 | 67 | 80 | 81 | 82 => Self::Rain,
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }
}

/// Full description of a WMO code, `"Unknown"` for codes outside the table.
#[must_use]
pub const fn describe(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
