//! Restaurant REST API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    AvailabilityQuery, AvailabilityResponse, DayQuery, RestaurantResponse, TableResponse,
    UpdateTableStatusRequest,
};
use crate::domain::TableStatus;
use crate::interfaces::http::common::{
    bad_request, domain_error, ApiError, ApiResponse, ValidatedJson,
};
use crate::interfaces::http::modules::reservations::ReservationResponse;
use crate::interfaces::http::state::AppState;
use crate::shared::time::parse_date;

#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}",
    tag = "Restaurants",
    params(("id" = i32, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant with tables and service periods", body = ApiResponse<RestaurantResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RestaurantResponse>>, ApiError> {
    let snapshot = state.restaurants.capacity(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}/availability",
    tag = "Restaurants",
    params(("id" = i32, Path, description = "Restaurant ID"), AvailabilityQuery),
    responses(
        (status = 200, description = "Bookable start times", body = ApiResponse<AvailabilityResponse>),
        (status = 400, description = "Missing or malformed date / party_size"),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, ApiError> {
    let (Some(date), Some(party_size)) = (query.date, query.party_size) else {
        return Err(bad_request(
            "date and party_size query parameters are required",
        ));
    };
    let date = parse_date(&date).map_err(domain_error)?;
    let party_size: i32 = party_size
        .trim()
        .parse()
        .map_err(|_| bad_request("Invalid party_size. Must be a positive integer."))?;

    let slots = state
        .restaurants
        .availability(id, date, party_size)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(slots.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/restaurants/{id}/tables/{table_id}/status",
    tag = "Restaurants",
    params(
        ("id" = i32, Path, description = "Restaurant ID"),
        ("table_id" = i32, Path, description = "Table ID")
    ),
    request_body = UpdateTableStatusRequest,
    responses(
        (status = 200, description = "Table updated", body = ApiResponse<TableResponse>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Table not found in this restaurant")
    )
)]
pub async fn update_table_status(
    State(state): State<AppState>,
    Path((id, table_id)): Path<(i32, i32)>,
    ValidatedJson(req): ValidatedJson<UpdateTableStatusRequest>,
) -> Result<Json<ApiResponse<TableResponse>>, ApiError> {
    let status = TableStatus::parse(&req.status).map_err(domain_error)?;
    let table = state
        .restaurants
        .set_table_status(id, table_id, status)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(table.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}/reservations",
    tag = "Restaurants",
    params(("id" = i32, Path, description = "Restaurant ID"), DayQuery),
    responses(
        (status = 200, description = "Reservations starting on the day", body = ApiResponse<Vec<ReservationResponse>>),
        (status = 400, description = "Missing or malformed date"),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<DayQuery>,
) -> Result<Json<ApiResponse<Vec<ReservationResponse>>>, ApiError> {
    let Some(date) = query.date else {
        return Err(bad_request("date query parameter is required"));
    };
    let date = parse_date(&date).map_err(domain_error)?;
    let reservations = state
        .reservations
        .list_for_day(id, date)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(Into::into).collect(),
    )))
}
