//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::RepositoryProvider;

#[derive(Clone)]
pub struct HealthState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
    pub restaurants: Option<u64>,
}

/// Component health status
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = state.started_at.elapsed().as_secs();

    // A cheap query through the store doubles as the database ping
    let db_start = Instant::now();
    let (database, restaurants) = match state.repos.restaurants().count().await {
        Ok(count) => (
            ComponentHealth {
                status: "ok".to_string(),
                latency_ms: Some(db_start.elapsed().as_millis() as u64),
            },
            Some(count),
        ),
        Err(_) => (
            ComponentHealth {
                status: "error".to_string(),
                latency_ms: None,
            },
            None,
        ),
    };

    let healthy = database.status == "ok";
    let http_status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime,
            database,
            restaurants,
        }),
    )
}
