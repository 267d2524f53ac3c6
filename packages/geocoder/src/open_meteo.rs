//! Open-Meteo place search client (forward geocoding).
//!
//! Free, no API key. Requests a single best match in a fixed language.
//!
//! See <https://open-meteo.com/en/docs/geocoding-api>

use std::time::Duration;

use crate::{GeocodeError, GeocodeResult};

/// Looks up a place name and returns the top match.
///
/// Returns `Ok(None)` when the service finds nothing.
///
/// # Errors
///
/// Returns [`GeocodeError`] on transport failure or timeout, on any
/// non-200 status, or if the response cannot be parsed.
pub async fn search(
    client: &reqwest::Client,
    base_url: &str,
    language: &str,
    timeout: Duration,
    name: &str,
) -> Result<Option<GeocodeResult>, GeocodeError> {
    log::debug!("Open-Meteo search for {name:?}");

    let resp = client
        .get(base_url)
        .query(&[
            ("name", name),
            ("count", "1"),
            ("language", language),
            ("format", "json"),
        ])
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
    parse_response(&body, name)
}

/// Parses an Open-Meteo search response.
///
/// `query` stands in for the resolved name when the match has none.
fn parse_response(
    body: &serde_json::Value,
    query: &str,
) -> Result<Option<GeocodeResult>, GeocodeError> {
    if !body.is_object() {
        return Err(GeocodeError::Parse {
            message: "Open-Meteo response is not an object".to_string(),
        });
    }

    let Some(first) = body
        .get("results")
        .and_then(serde_json::Value::as_array)
        .and_then(|results| results.first())
    else {
        return Ok(None);
    };

    let lat = first["latitude"]
        .as_f64()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing latitude in Open-Meteo response".to_string(),
        })?;

    let lon = first["longitude"]
        .as_f64()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing longitude in Open-Meteo response".to_string(),
        })?;

    let text = |key: &str| first[key].as_str().map(String::from);

    Ok(Some(GeocodeResult {
        name: text("name").unwrap_or_else(|| query.to_string()),
        lat,
        lon,
        country: text("country").unwrap_or_default(),
        region: text("admin1").unwrap_or_default(),
    }))
}
