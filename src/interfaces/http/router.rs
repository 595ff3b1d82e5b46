//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{reservations, restaurants};
use super::state::AppState;
use crate::application::{ReservationService, RestaurantService};
use crate::domain::{RepositoryProvider, ReservationDefaults};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Restaurants
        restaurants::get_restaurant,
        restaurants::get_availability,
        restaurants::update_table_status,
        restaurants::list_reservations,
        // Reservations
        reservations::create_reservation,
        reservations::get_reservation,
        reservations::cancel_reservation,
        reservations::complete_reservation,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            restaurants::RestaurantResponse,
            restaurants::ServicePeriodResponse,
            restaurants::TableResponse,
            restaurants::AvailabilityResponse,
            restaurants::UpdateTableStatusRequest,
            reservations::CreateReservationRequest,
            reservations::ReservationResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Restaurants", description = "Capacity model, slot availability and table status"),
        (name = "Reservations", description = "Booking and reservation lifecycle"),
    ),
    info(
        title = "Table Booking API",
        version = "1.0.0",
        description = "Availability and table assignment for restaurant reservations",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    defaults: ReservationDefaults,
    prometheus: PrometheusHandle,
) -> Router {
    let state = AppState {
        restaurants: Arc::new(RestaurantService::new(repos.clone(), defaults)),
        reservations: Arc::new(ReservationService::new(repos.clone(), defaults)),
    };

    let restaurant_routes = Router::new()
        .route("/{id}", get(restaurants::get_restaurant))
        .route("/{id}/availability", get(restaurants::get_availability))
        .route("/{id}/reservations", get(restaurants::list_reservations))
        .route(
            "/{id}/tables/{table_id}/status",
            put(restaurants::update_table_status),
        )
        .with_state(state.clone());

    let reservation_routes = Router::new()
        .route("/", post(reservations::create_reservation))
        .route("/{id}", get(reservations::get_reservation))
        .route("/{id}/cancel", post(reservations::cancel_reservation))
        .route("/{id}/complete", post(reservations::complete_reservation))
        .with_state(state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            repos,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState { handle: prometheus });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/restaurants", restaurant_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
