//! Reservation DTOs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Reservation;

/// Booking request; date and time are local to the restaurant
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(range(min = 1, message = "restaurant_id is required"))]
    pub restaurant_id: i32,
    /// YYYY-MM-DD
    #[validate(length(min = 1, message = "date is required"))]
    pub date: String,
    /// HH:MM
    #[validate(length(min = 1, message = "time is required"))]
    pub time: String,
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub party_size: i32,
    #[validate(length(min = 1, max = 200, message = "customer_name is required"))]
    pub customer_name: String,
    #[validate(email(message = "customer_email must be a valid email"))]
    pub customer_email: String,
    #[validate(length(min = 1, max = 50, message = "customer_phone is required"))]
    pub customer_phone: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationResponse {
    pub id: i32,
    pub restaurant_id: i32,
    pub table_id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub number_of_guests: u32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// confirmed, cancelled or completed
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            restaurant_id: r.restaurant_id,
            table_id: r.table_id,
            customer_name: r.customer.name,
            customer_email: r.customer.email,
            customer_phone: r.customer.phone,
            number_of_guests: r.number_of_guests,
            start_time: r.start_time,
            end_time: r.end_time,
            status: r.status.as_str().to_string(),
            created_at: r.created_at,
        }
    }
}
