#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the trip planner.
//!
//! Serves the REST API over the shared document store and, when a built
//! frontend is present in `app/dist`, its static files. The store backend
//! is picked from `SUPABASE_URL` / `SUPABASE_KEY` at startup; without them
//! documents are kept as JSON files under `data/`.

mod handlers;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use trip_planner_database::{PersistenceStore, StoreConfig};
use trip_planner_geocoder::{GeoResolver, HttpGeoResolver};
use trip_planner_weather::ForecastClient;

/// Shared application state.
pub struct AppState {
    /// Document store for every trip document.
    pub store: Arc<PersistenceStore>,
    /// Forward and reverse geocoding.
    pub resolver: Arc<dyn GeoResolver>,
    /// Daily forecast client.
    pub forecasts: ForecastClient,
}

/// Registers every `/api` route.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/places", web::get().to(handlers::list_places))
            .route("/places", web::post().to(handlers::create_place))
            .route("/places/{id}", web::delete().to(handlers::delete_place))
            .route("/itinerary", web::get().to(handlers::itinerary))
            .route("/routes/optimize", web::get().to(handlers::optimize_route))
            .route("/routes/distance", web::get().to(handlers::distance))
            .route("/cities", web::get().to(handlers::cities))
            .route("/geocode", web::get().to(handlers::geocode))
            .route("/weather", web::get().to(handlers::weather))
            .route("/budget/summary", web::get().to(handlers::budget_summary))
            .route("/budget/expenses", web::post().to(handlers::add_expense))
            .route("/users", web::get().to(handlers::list_users))
            .route("/users/{name}", web::post().to(handlers::add_user))
            .route("/users/{name}", web::delete().to(handlers::remove_user))
            .route("/packing", web::get().to(handlers::packing))
            .route("/trip-info", web::get().to(handlers::trip_info))
            .route("/documents/{key}", web::get().to(handlers::document)),
    );
}

/// Starts the trip planner API server.
///
/// Resolves the store backend from the environment, loads the geocoding
/// service registry, and starts the Actix-Web HTTP server on `BIND_ADDR`
/// (default `127.0.0.1`) and `PORT` (default `8080`). The caller provides
/// the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the geocoding registry is
/// incomplete, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let client = reqwest::Client::new();

    let config = StoreConfig::from_env();
    let store = PersistenceStore::from_config(&config, client.clone());

    log::info!("Loading geocoding services...");
    let resolver = HttpGeoResolver::from_registry(client.clone()).map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState {
        store: Arc::new(store),
        resolver: Arc::new(resolver),
        forecasts: ForecastClient::new(client),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let serve_frontend = Path::new("app/dist").is_dir();
    if !serve_frontend {
        log::info!("No app/dist directory, serving the API only");
    }

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api);

        if serve_frontend {
            app.service(Files::new("/", "app/dist").index_file("index.html"))
        } else {
            app
        }
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::{http::StatusCode, test};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use trip_planner_geocoder::{GeocodeError, GeocodeResult};

    use super::*;

    struct Offline;

    #[async_trait]
    impl GeoResolver for Offline {
        async fn reverse_geocode(&self, _lat: f64, _lon: f64) -> Result<String, GeocodeError> {
            Err(GeocodeError::RateLimited)
        }

        async fn forward_geocode(
            &self,
            _name: &str,
        ) -> Result<Option<GeocodeResult>, GeocodeError> {
            Ok(None)
        }
    }

    fn state(name: &str) -> (web::Data<AppState>, std::path::PathBuf) {
        let tmp = std::env::temp_dir().join(format!(
            "trip_planner_server_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&tmp);
        let client = reqwest::Client::new();
        let store = PersistenceStore::from_config(
            &StoreConfig::File { root: tmp.clone() },
            client.clone(),
        );
        let state = web::Data::new(AppState {
            store: Arc::new(store),
            resolver: Arc::new(Offline),
            forecasts: ForecastClient::with_base_url(client, "http://127.0.0.1:1")
                .with_timeout(Duration::from_millis(300)),
        });
        (state, tmp)
    }

    #[actix_web::test]
    async fn health_reports_backend() {
        let (state, tmp) = state("health");
        let app =
            test::init_service(App::new().app_data(state).configure(configure_api)).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], json!(true));
        assert_eq!(body["store"], json!("file"));
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[actix_web::test]
    async fn place_lifecycle() {
        let (state, tmp) = state("places");
        let app =
            test::init_service(App::new().app_data(state).configure(configure_api)).await;

        let req = test::TestRequest::post()
            .uri("/api/places")
            .set_json(json!({"name": "Pier", "type": "attraction", "lat": 34.0, "lon": -118.5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["id"], json!(1));

        let req = test::TestRequest::get().uri("/api/places").to_request();
        let doc: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(doc["places"].as_array().map(Vec::len), Some(1));

        let req = test::TestRequest::delete().uri("/api/places/7").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri("/api/places/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[actix_web::test]
    async fn lookup_misses_say_try_again() {
        let (state, tmp) = state("misses");
        let app =
            test::init_service(App::new().app_data(state).configure(configure_api)).await;

        let req = test::TestRequest::get()
            .uri("/api/geocode?name=Atlantis")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], json!("not found, try again"));

        let req = test::TestRequest::get()
            .uri("/api/weather?lat=36.1&lon=-115.1&date=2026-05-01")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[actix_web::test]
    async fn optimize_needs_two_stops() {
        let (state, tmp) = state("optimize");
        let app =
            test::init_service(App::new().app_data(state).configure(configure_api)).await;

        let req = test::TestRequest::get()
            .uri("/api/routes/optimize?day=2026-05-01")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[actix_web::test]
    async fn documents_default_until_saved() {
        let (state, tmp) = state("documents");
        let app =
            test::init_service(App::new().app_data(state).configure(configure_api)).await;

        let req = test::TestRequest::get()
            .uri("/api/documents/budget")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"expenses": []}));

        let req = test::TestRequest::get()
            .uri("/api/documents/secrets")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/documents/photo_3")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
