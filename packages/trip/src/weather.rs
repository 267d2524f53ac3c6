//! Forecast lookups backed by the `weather` cache document.

use chrono::{DateTime, NaiveDate, Utc};
use trip_planner_database::{DomainKey, PersistenceStore};
use trip_planner_trip_models::{CachedForecast, DailyForecast, WeatherDocument};
use trip_planner_weather::ForecastClient;

use crate::read_or_default;

/// Returns the forecast for `location` on `date`, from the cache when a
/// fresh entry exists, otherwise from the forecast service.
///
/// Fetched forecasts are cached and past days are pruned from the cache.
/// Every failure (service down, date outside the forecast window, cache
/// write error) degrades to `None` or to an uncached answer. A stale cache
/// entry is never served.
pub async fn forecast_for(
    store: &PersistenceStore,
    client: &ForecastClient,
    location: &str,
    lat: f64,
    lon: f64,
    date: NaiveDate,
) -> Option<DailyForecast> {
    forecast_at(store, client, location, lat, lon, date, Utc::now()).await
}

async fn forecast_at(
    store: &PersistenceStore,
    client: &ForecastClient,
    location: &str,
    lat: f64,
    lon: f64,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Option<DailyForecast> {
    let day = date.format("%Y-%m-%d").to_string();
    let mut cache: WeatherDocument = read_or_default(store, DomainKey::Weather).await;
    if let Some(hit) = cache.find(location, &day, now) {
        log::debug!("Forecast cache hit for {location} on {day}");
        return Some(hit.clone());
    }

    let forecast = client.forecast_or_none(lat, lon, date).await?;
    cache.upsert(
        CachedForecast {
            location: location.to_string(),
            lat,
            lon,
            fetched_at: Some(now),
            forecast: forecast.clone(),
        },
        now.date_naive(),
    );
    if let Err(e) = store.save_typed(DomainKey::Weather, &cache).await {
        log::warn!("Failed to cache forecast for {location} on {day}: {e}");
    }
    Some(forecast)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeDelta;
    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    use super::*;
    use crate::test_support::temp_store;

    fn offline_client() -> ForecastClient {
        ForecastClient::with_base_url(reqwest::Client::new(), "http://127.0.0.1:1")
            .with_timeout(Duration::from_millis(300))
    }

    /// Forecast service that answers one request with `body`.
    async fn forecast_service(body: String) -> ForecastClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0_u8; 8192];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        });
        ForecastClient::with_base_url(reqwest::Client::new(), format!("http://{addr}"))
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn cache_entry(day: &str, temperature: i64, fetched_at: DateTime<Utc>) -> Value {
        json!({
            "location": "Las Vegas",
            "lat": 36.1,
            "lon": -115.1,
            "fetched_at": fetched_at,
            "forecast": {
                "temperature": temperature, "temp_max": 95, "temp_min": 81,
                "feels_like": temperature, "condition": "Clear", "description": "Clear sky",
                "precipitation": 0.0, "wind_speed": 7, "wind_direction": 200,
                "weathercode": 0, "forecast_time": day
            }
        })
    }

    #[tokio::test]
    async fn fresh_cached_forecast_skips_the_service() {
        let (store, tmp) = temp_store("weather_cache");
        let now = Utc::now();
        store
            .save(
                DomainKey::Weather,
                &json!({"forecasts": [cache_entry("2026-05-03", 88, now - TimeDelta::hours(1))]}),
            )
            .await
            .unwrap();

        let forecast = forecast_at(
            &store,
            &offline_client(),
            "Las Vegas",
            36.1,
            -115.1,
            day("2026-05-03"),
            now,
        )
        .await
        .unwrap();
        assert_eq!(forecast.temperature, 88);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn stale_cached_forecast_is_not_served() {
        let (store, tmp) = temp_store("weather_stale_offline");
        let now = Utc::now();
        store
            .save(
                DomainKey::Weather,
                &json!({"forecasts": [cache_entry("2026-05-03", 88, now - TimeDelta::days(2))]}),
            )
            .await
            .unwrap();

        let forecast = forecast_at(
            &store,
            &offline_client(),
            "Las Vegas",
            36.1,
            -115.1,
            day("2026-05-03"),
            now,
        )
        .await;
        assert!(forecast.is_none());
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn stale_cached_forecast_is_refetched_and_past_days_pruned() {
        let (store, tmp) = temp_store("weather_refetch");
        let now = Utc::now();
        let target = now.date_naive() + TimeDelta::days(2);
        let target_day = target.format("%Y-%m-%d").to_string();
        let yesterday = (now.date_naive() - TimeDelta::days(1))
            .format("%Y-%m-%d")
            .to_string();
        store
            .save(
                DomainKey::Weather,
                &json!({"forecasts": [
                    cache_entry(&yesterday, 60, now - TimeDelta::days(3)),
                    cache_entry(&target_day, 88, now - TimeDelta::days(2)),
                ]}),
            )
            .await
            .unwrap();

        let body = json!({
            "daily": {
                "time": [target_day],
                "temperature_2m_max": [100.0],
                "temperature_2m_min": [80.0],
                "weathercode": [1],
                "precipitation_sum": [0.0],
                "windspeed_10m_max": [4.0],
                "winddirection_10m_dominant": [90]
            }
        })
        .to_string();
        let client = forecast_service(body).await;

        let forecast = forecast_at(&store, &client, "Las Vegas", 36.1, -115.1, target, now)
            .await
            .unwrap();
        assert_eq!(forecast.temperature, 90);

        let cache: WeatherDocument = store.load_typed(DomainKey::Weather).await.unwrap();
        assert_eq!(cache.forecasts.len(), 1);
        assert_eq!(cache.forecasts[0].fetched_at, Some(now));
        assert_eq!(cache.find("Las Vegas", &target_day, now).unwrap().temperature, 90);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn unreachable_service_is_none() {
        let (store, tmp) = temp_store("weather_offline");
        let forecast = forecast_for(
            &store,
            &offline_client(),
            "Las Vegas",
            36.1,
            -115.1,
            day("2026-05-04"),
        )
        .await;
        assert!(forecast.is_none());
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
