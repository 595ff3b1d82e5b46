//! Restaurant DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{AvailableSlots, CapacitySnapshot};
use crate::domain::{ServicePeriod, Table};
use crate::shared::time::format_time_of_day;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServicePeriodResponse {
    pub id: i32,
    pub name: String,
    /// "HH:MM"
    pub opening_time: String,
    /// "HH:MM"
    pub closing_time: String,
}

impl From<ServicePeriod> for ServicePeriodResponse {
    fn from(p: ServicePeriod) -> Self {
        Self {
            id: p.id,
            name: p.name,
            opening_time: format_time_of_day(p.opening_time),
            closing_time: format_time_of_day(p.closing_time),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TableResponse {
    pub id: i32,
    pub name: String,
    pub capacity: u32,
    /// available, occupied or out_of_service
    pub status: String,
}

impl From<Table> for TableResponse {
    fn from(t: Table) -> Self {
        Self {
            id: t.id,
            name: t.name,
            capacity: t.capacity,
            status: t.status.as_str().to_string(),
        }
    }
}

/// Restaurant with its capacity model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: i32,
    pub name: String,
    /// Booking length actually applied, in minutes
    pub reservation_duration_minutes: i64,
    /// Slot grid actually applied, in minutes
    pub slot_interval_minutes: i64,
    /// Seats over available tables
    pub total_capacity: u32,
    pub service_periods: Vec<ServicePeriodResponse>,
    pub tables: Vec<TableResponse>,
}

impl From<CapacitySnapshot> for RestaurantResponse {
    fn from(s: CapacitySnapshot) -> Self {
        Self {
            total_capacity: s.total_capacity(),
            id: s.restaurant.id,
            name: s.restaurant.name,
            reservation_duration_minutes: s.duration.num_minutes(),
            slot_interval_minutes: s.slot_interval.num_minutes(),
            service_periods: s.service_periods.into_iter().map(Into::into).collect(),
            tables: s.tables.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    /// YYYY-MM-DD
    pub date: Option<String>,
    /// Positive integer
    pub party_size: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    /// Start times ("HH:MM"), ascending
    pub available_slots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<AvailableSlots> for AvailabilityResponse {
    fn from(a: AvailableSlots) -> Self {
        Self {
            available_slots: a.slots.into_iter().map(format_time_of_day).collect(),
            message: a.message,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DayQuery {
    /// YYYY-MM-DD
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTableStatusRequest {
    /// available, occupied or out_of_service
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}
