//! Reservation REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateReservationRequest, ReservationResponse};
use crate::application::BookingRequest;
use crate::domain::CustomerDetails;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::state::AppState;
use crate::shared::time::{parse_date, parse_time_of_day};

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation confirmed", body = ApiResponse<ReservationResponse>),
        (status = 400, description = "Malformed date, time or request"),
        (status = 404, description = "Restaurant not found"),
        (status = 409, description = "Slot no longer available, or no single table fits the party"),
        (status = 422, description = "Body failed validation")
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationResponse>>), ApiError> {
    let time = parse_time_of_day(&req.time).map_err(domain_error)?;
    let date = parse_date(&req.date).map_err(domain_error)?;

    let request = BookingRequest {
        restaurant_id: req.restaurant_id,
        date,
        time,
        party_size: req.party_size,
        customer: CustomerDetails {
            name: req.customer_name,
            email: req.customer_email,
            phone: req.customer_phone,
        },
    };

    state
        .reservations
        .create(request)
        .await
        .map(|r| (StatusCode::CREATED, Json(ApiResponse::success(r.into()))))
        .map_err(domain_error)
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReservationResponse>>, ApiError> {
    let reservation = state.reservations.get(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Reservation is not confirmed")
    )
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReservationResponse>>, ApiError> {
    let reservation = state.reservations.cancel(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/complete",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation completed", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Reservation is not confirmed")
    )
)]
pub async fn complete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReservationResponse>>, ApiError> {
    let reservation = state.reservations.complete(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}
