#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Open-Meteo daily forecast client.
//!
//! Requests a 16-day daily series in imperial units (°F, mph, inches) with
//! the timezone inferred from the coordinates, then picks out one day.
//!
//! See <https://open-meteo.com/en/docs>

pub mod wmo;

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;
use trip_planner_trip_models::DailyForecast;

pub use wmo::{Condition, describe};

/// Public Open-Meteo forecast endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Days of forecast requested.
pub const FORECAST_DAYS: u8 = 16;

const DAILY_SERIES: &str = "temperature_2m_max,temperature_2m_min,weathercode,precipitation_sum,windspeed_10m_max,winddirection_10m_dominant";

/// Errors from forecast lookups.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// Transport failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-200 response.
    #[error("Forecast service returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Response body was not the expected shape.
    #[error("Forecast parse error: {message}")]
    Parse {
        /// Description of the problem.
        message: String,
    },
}

/// Daily forecast client.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ForecastClient {
    /// Client for the public endpoint.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Client for a custom endpoint.
    #[must_use]
    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches the forecast for `date` at the given coordinates.
    ///
    /// Returns `Ok(None)` when `date` is outside the returned series.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError`] on transport failure or timeout, on any
    /// non-200 status, or if the response is not a JSON object.
    pub async fn forecast(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<Option<DailyForecast>, WeatherError> {
        log::debug!("Forecast for ({lat}, {lon}) on {date}");

        let lat = lat.to_string();
        let lon = lon.to_string();
        let days = FORECAST_DAYS.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("daily", DAILY_SERIES),
                ("temperature_unit", "fahrenheit"),
                ("windspeed_unit", "mph"),
                ("precipitation_unit", "inch"),
                ("timezone", "auto"),
                ("forecast_days", days.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(WeatherError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = resp.json().await?;
        parse_daily(&body, date)
    }

    /// [`Self::forecast`] with every failure mapped to `None`.
    pub async fn forecast_or_none(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Option<DailyForecast> {
        match self.forecast(lat, lon, date).await {
            Ok(forecast) => forecast,
            Err(e) => {
                log::warn!("Forecast for ({lat}, {lon}) on {date} failed: {e}");
                None
            }
        }
    }
}

/// Picks `date` out of a daily forecast response.
///
/// Series that are shorter than the date index, or hold `null`, read as 0.
///
/// # Errors
///
/// Returns [`WeatherError::Parse`] if `body` is not a JSON object.
pub fn parse_daily(body: &Value, date: NaiveDate) -> Result<Option<DailyForecast>, WeatherError> {
    if !body.is_object() {
        return Err(WeatherError::Parse {
            message: "Forecast response is not an object".to_string(),
        });
    }

    let daily = &body["daily"];
    let target = date.format("%Y-%m-%d").to_string();
    let Some(idx) = daily["time"]
        .as_array()
        .and_then(|days| days.iter().position(|d| d.as_str() == Some(&target)))
    else {
        return Ok(None);
    };

    let at = |series: &str| -> f64 {
        daily[series]
            .as_array()
            .and_then(|values| values.get(idx))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    };

    #[allow(clippy::cast_possible_truncation)]
    let weathercode = at("weathercode") as i64;
    let temp_max = at("temperature_2m_max");
    let temp_min = at("temperature_2m_min");
    let average = round_whole((temp_max + temp_min) / 2.0);

    Ok(Some(DailyForecast {
        temperature: average,
        temp_max: round_whole(temp_max),
        temp_min: round_whole(temp_min),
        feels_like: average,
        condition: Condition::from_code(weathercode).to_string(),
        description: describe(weathercode).to_string(),
        precipitation: (at("precipitation_sum") * 100.0).round_ties_even() / 100.0,
        wind_speed: round_whole(at("windspeed_10m_max")),
        wind_direction: round_whole(at("winddirection_10m_dominant")),
        weathercode,
        forecast_time: target,
    }))
}

/// Rounds half to even, the way the stored forecasts have always been
/// rounded.
#[allow(clippy::cast_possible_truncation)]
fn round_whole(value: f64) -> i64 {
    value.round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Value {
        json!({
            "daily": {
                "time": ["2026-05-01", "2026-05-02"],
                "temperature_2m_max": [80.4, 91.0],
                "temperature_2m_min": [61.0, 70.0],
                "weathercode": [0, 63],
                "precipitation_sum": [0.0, 0.456],
                "windspeed_10m_max": [5.6, 12.2],
                "winddirection_10m_dominant": [200, 181.7]
            }
        })
    }

    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0_u8; 8192];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        });
        format!("http://{addr}")
    }

    #[test]
    fn picks_the_requested_day() {
        let forecast = parse_daily(&sample(), day("2026-05-02")).unwrap().unwrap();
        assert_eq!(forecast.temperature, 80);
        assert_eq!(forecast.feels_like, 80);
        assert_eq!(forecast.temp_max, 91);
        assert_eq!(forecast.temp_min, 70);
        assert_eq!(forecast.condition, "Rain");
        assert_eq!(forecast.description, "Moderate rain");
        assert!((forecast.precipitation - 0.46).abs() < 1e-9);
        assert_eq!(forecast.wind_speed, 12);
        assert_eq!(forecast.wind_direction, 182);
        assert_eq!(forecast.weathercode, 63);
        assert_eq!(forecast.forecast_time, "2026-05-02");
    }

    #[test]
    fn average_is_rounded_mean() {
        let forecast = parse_daily(&sample(), day("2026-05-01")).unwrap().unwrap();
        // (80.4 + 61.0) / 2 = 70.7
        assert_eq!(forecast.temperature, 71);
        assert_eq!(forecast.temp_max, 80);
        assert_eq!(forecast.condition, "Clear");
    }

    #[test]
    fn date_outside_series_is_none() {
        assert!(parse_daily(&sample(), day("2026-06-01")).unwrap().is_none());
        assert!(parse_daily(&json!({}), day("2026-05-01")).unwrap().is_none());
    }

    #[test]
    fn short_series_read_as_zero() {
        let body = json!({"daily": {"time": ["2026-05-01"], "temperature_2m_max": [50.0]}});
        let forecast = parse_daily(&body, day("2026-05-01")).unwrap().unwrap();
        assert_eq!(forecast.temp_min, 0);
        assert_eq!(forecast.weathercode, 0);
        assert_eq!(forecast.temperature, 25);
    }

    #[test]
    fn non_object_is_parse_error() {
        assert!(matches!(
            parse_daily(&json!([1, 2]), day("2026-05-01")),
            Err(WeatherError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn fetches_from_configured_endpoint() {
        let url = serve_once("200 OK", sample().to_string()).await;
        let client = ForecastClient::with_base_url(reqwest::Client::new(), url);

        let forecast = client
            .forecast(36.1, -115.1, day("2026-05-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(forecast.temperature, 71);
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let url = serve_once("500 Internal Server Error", "{}".to_string()).await;
        let client = ForecastClient::with_base_url(reqwest::Client::new(), url);

        assert!(matches!(
            client.forecast(36.1, -115.1, day("2026-05-01")).await,
            Err(WeatherError::Status { status: 500 })
        ));
    }

    #[tokio::test]
    async fn unreachable_service_is_none() {
        let client = ForecastClient::with_base_url(reqwest::Client::new(), "http://127.0.0.1:1")
            .with_timeout(Duration::from_millis(300));
        assert!(
            client
                .forecast_or_none(36.1, -115.1, day("2026-05-01"))
                .await
                .is_none()
        );
    }
}
