//! Nominatim / OpenStreetMap reverse geocoder client.
//!
//! Turns a coordinate pair into a city-level place name. The public
//! instance allows **1 request per second**; rate limiting is the caller's
//! job.
//!
//! See <https://nominatim.org/release-docs/develop/api/Reverse/>

use std::time::Duration;

use crate::GeocodeError;

/// Address components tried in order when naming a location.
const NAME_PRECEDENCE: &[&str] = &[
    "city",
    "town",
    "village",
    "municipality",
    "county",
    "state",
];

/// Name returned when the address has none of [`NAME_PRECEDENCE`].
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Resolves a coordinate pair to a city name.
///
/// # Errors
///
/// Returns [`GeocodeError`] on transport failure or timeout, on any
/// non-200 status, or if the body is not a JSON object.
pub async fn reverse(
    client: &reqwest::Client,
    base_url: &str,
    user_agent: &str,
    timeout: Duration,
    lat: f64,
    lon: f64,
) -> Result<String, GeocodeError> {
    log::debug!("Nominatim reverse lookup for ({lat}, {lon})");

    let resp = client
        .get(base_url)
        .query(&[
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
        ])
        .header(reqwest::header::USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await?;

    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }
    if status != reqwest::StatusCode::OK {
        return Err(GeocodeError::Status {
            status: status.as_u16(),
        });
    }

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Picks the best place name out of a Nominatim reverse response.
fn parse_response(body: &serde_json::Value) -> Result<String, GeocodeError> {
    let doc = body.as_object().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an object".to_string(),
    })?;

    let Some(address) = doc.get("address").and_then(serde_json::Value::as_object) else {
        return Ok(UNKNOWN_PLACE.to_string());
    };

    let name = NAME_PRECEDENCE
        .iter()
        .filter_map(|key| address.get(*key).and_then(serde_json::Value::as_str))
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_PLACE);

    Ok(name.to_string())
}
