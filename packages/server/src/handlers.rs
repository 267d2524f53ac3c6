//! HTTP handler functions for the trip planner API.

use actix_web::{HttpResponse, web};
use serde_json::json;
use trip_planner_database::DocumentKey;
use trip_planner_server_models::{
    ApiCity, ApiError, ApiHealth, ApiRoute, DistanceQueryParams, GeocodeQueryParams,
    OptimizeQueryParams, WeatherQueryParams,
};
use trip_planner_trip::{TripError, bookings, budget, itinerary, people, places, weather};
use trip_planner_trip_models::{Expense, NewPlace};

use crate::AppState;

/// Maps a service error onto a status code and error body.
fn error_response(context: &str, e: &TripError) -> HttpResponse {
    match e {
        TripError::NotFound { .. } => HttpResponse::NotFound().json(ApiError::new(e.to_string())),
        TripError::Route(_)
        | TripError::Unlocated { .. }
        | TripError::EmptyUserName
        | TripError::InvalidDate { .. } => {
            HttpResponse::BadRequest().json(ApiError::new(e.to_string()))
        }
        TripError::DuplicateUser { .. } => {
            HttpResponse::Conflict().json(ApiError::new(e.to_string()))
        }
        TripError::Store(_) | TripError::Json(_) => {
            log::error!("{context}: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(format!("{context} failed")))
        }
    }
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend_name().to_string(),
    })
}

/// `GET /api/places`
pub async fn list_places(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(places::list_places(&state.store).await)
}

/// `POST /api/places`
pub async fn create_place(
    state: web::Data<AppState>,
    body: web::Json<NewPlace>,
) -> HttpResponse {
    match places::add_place(&state.store, body.into_inner()).await {
        Ok(place) => HttpResponse::Created().json(place),
        Err(e) => error_response("Adding place", &e),
    }
}

/// `DELETE /api/places/{id}`
pub async fn delete_place(state: web::Data<AppState>, path: web::Path<u64>) -> HttpResponse {
    match places::delete_place(&state.store, path.into_inner()).await {
        Ok(place) => HttpResponse::Ok().json(place),
        Err(e) => error_response("Deleting place", &e),
    }
}

/// `GET /api/itinerary`
///
/// Planned places keyed by day.
pub async fn itinerary(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(itinerary::itinerary(&state.store).await)
}

/// `GET /api/routes/optimize?day=YYYY-MM-DD`
pub async fn optimize_route(
    state: web::Data<AppState>,
    params: web::Query<OptimizeQueryParams>,
) -> HttpResponse {
    match itinerary::optimize_day(&state.store, &params.day).await {
        Ok(route) => HttpResponse::Ok().json(ApiRoute::from(route)),
        Err(e) => error_response("Optimizing route", &e),
    }
}

/// `GET /api/routes/distance?from=<id>&to=<id>`
pub async fn distance(
    state: web::Data<AppState>,
    params: web::Query<DistanceQueryParams>,
) -> HttpResponse {
    match itinerary::distance_between_places(&state.store, params.from, params.to).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response("Measuring distance", &e),
    }
}

/// `GET /api/cities`
///
/// Located places grouped by reverse-geocoded city.
pub async fn cities(state: web::Data<AppState>) -> HttpResponse {
    let clusters = itinerary::city_clusters(&state.store, state.resolver.as_ref()).await;
    let cities: Vec<ApiCity> = clusters.into_values().map(ApiCity::from).collect();
    HttpResponse::Ok().json(cities)
}

/// `GET /api/geocode?name=`
pub async fn geocode(
    state: web::Data<AppState>,
    params: web::Query<GeocodeQueryParams>,
) -> HttpResponse {
    let name = params.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(ApiError::new("name must not be empty"));
    }
    match state.resolver.forward_geocode_or_none(name).await {
        Some(result) => HttpResponse::Ok().json(result),
        None => HttpResponse::NotFound().json(ApiError::not_found()),
    }
}

/// `GET /api/weather?lat=&lon=&date=&location=`
pub async fn weather(
    state: web::Data<AppState>,
    params: web::Query<WeatherQueryParams>,
) -> HttpResponse {
    let location = params.location_label();
    match weather::forecast_for(
        &state.store,
        &state.forecasts,
        &location,
        params.lat,
        params.lon,
        params.date,
    )
    .await
    {
        Some(forecast) => HttpResponse::Ok().json(forecast),
        None => HttpResponse::NotFound().json(ApiError::not_found()),
    }
}

/// `GET /api/budget/summary`
pub async fn budget_summary(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(budget::budget_summary(&state.store).await)
}

/// `POST /api/budget/expenses`
pub async fn add_expense(state: web::Data<AppState>, body: web::Json<Expense>) -> HttpResponse {
    match budget::add_expense(&state.store, body.into_inner()).await {
        Ok(id) => HttpResponse::Created().json(json!({ "id": id })),
        Err(e) => error_response("Adding expense", &e),
    }
}

/// `GET /api/users`
pub async fn list_users(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(people::list_users(&state.store).await)
}

/// `POST /api/users/{name}`
pub async fn add_user(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match people::add_user(&state.store, &path).await {
        Ok(users) => HttpResponse::Created().json(users),
        Err(e) => error_response("Adding user", &e),
    }
}

/// `DELETE /api/users/{name}`
pub async fn remove_user(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match people::remove_user(&state.store, &path).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => error_response("Removing user", &e),
    }
}

/// `GET /api/packing`
pub async fn packing(state: web::Data<AppState>) -> HttpResponse {
    match people::load_packing(&state.store).await {
        Ok(packing) => HttpResponse::Ok().json(packing),
        Err(e) => error_response("Loading packing lists", &e),
    }
}

/// `GET /api/trip-info`
pub async fn trip_info(state: web::Data<AppState>) -> HttpResponse {
    match bookings::load_trip_info(&state.store).await {
        Ok(info) => HttpResponse::Ok().json(info),
        Err(e) => error_response("Loading trip info", &e),
    }
}

/// `GET /api/documents/{key}`
///
/// The raw stored document, or its default when never saved.
pub async fn document(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let Some(key) = DocumentKey::parse(&path) else {
        return HttpResponse::NotFound().json(ApiError::new(format!("Unknown document {path}")));
    };
    match state.store.try_load(key).await {
        Ok(value) if value.is_null() => HttpResponse::NotFound().json(ApiError::not_found()),
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => {
            log::error!("Loading {key}: {e}");
            HttpResponse::Ok().json(key.default_document())
        }
    }
}
