use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{AppError, AppResult};
use crate::handlers::{airplanes, flights, health, reservations};
use crate::middleware::request_log::log_request;
use crate::AppState;

/// Router with the full middleware stack. The governor sits inside the
/// request log so rate-limited requests are logged too.
pub fn create_app(state: AppState) -> AppResult<Router> {
    // Per-IP rate limiting
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(state.config.rate_limit_per_second)
            .burst_size(state.config.rate_limit_burst)
            .finish()
            .ok_or_else(|| AppError::Internal("Rate limit settings must be non-zero".to_string()))?,
    );

    Ok(create_router(state)
        .layer(GovernorLayer::new(governor_config))
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)))
}

pub fn create_router(state: AppState) -> Router {
    let airplane_routes = Router::new()
        .route(
            "/airplanes/",
            get(airplanes::list_airplanes).post(airplanes::create_airplane),
        )
        .route(
            "/airplanes/{id}/",
            get(airplanes::get_airplane)
                .put(airplanes::replace_airplane)
                .patch(airplanes::update_airplane)
                .delete(airplanes::delete_airplane),
        )
        .route("/airplanes/{id}/flights/", get(airplanes::airplane_flights));

    let flight_routes = Router::new()
        .route(
            "/flights/",
            get(flights::list_flights).post(flights::create_flight),
        )
        .route(
            "/flights/{id}/",
            get(flights::get_flight)
                .put(flights::replace_flight)
                .patch(flights::update_flight)
                .delete(flights::delete_flight),
        )
        .route("/flights/{id}/reservations/", get(flights::flight_reservations))
        .route("/flights/{id}/status/", get(flights::flight_status));

    let reservation_routes = Router::new()
        .route(
            "/reservations/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/reservations/{id}/",
            get(reservations::get_reservation)
                .put(reservations::replace_reservation)
                .patch(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        );

    Router::new()
        .route("/health", get(health::health))
        .merge(airplane_routes)
        .merge(flight_routes)
        .merge(reservation_routes)
        .with_state(state)
}
