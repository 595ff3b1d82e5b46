//! Restaurant domain entities: the restaurant itself, its service periods
//! and its tables.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, TimeSlot};

/// Booking length used when a restaurant has none configured.
pub const DEFAULT_RESERVATION_DURATION_MINUTES: u32 = 60;
/// Slot grid used when a restaurant has none configured.
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 15;

/// Fallback reservation settings, taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationDefaults {
    pub duration_minutes: u32,
    pub slot_interval_minutes: u32,
}

impl Default for ReservationDefaults {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_RESERVATION_DURATION_MINUTES,
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    /// Booking length in minutes; `0` means "use the configured default".
    pub avg_reservation_duration_minutes: u32,
    /// Slot grid in minutes; `0` means "use the configured default".
    pub slot_interval_minutes: u32,
}

impl Restaurant {
    pub fn reservation_duration(&self, defaults: &ReservationDefaults) -> Duration {
        Duration::minutes(i64::from(positive_or(
            self.avg_reservation_duration_minutes,
            defaults.duration_minutes,
        )))
    }

    pub fn slot_interval(&self, defaults: &ReservationDefaults) -> Duration {
        Duration::minutes(i64::from(positive_or(
            self.slot_interval_minutes,
            defaults.slot_interval_minutes,
        )))
    }
}

fn positive_or(value: u32, fallback: u32) -> u32 {
    match (value, fallback) {
        (v, _) if v > 0 => v,
        (_, f) if f > 0 => f,
        _ => DEFAULT_RESERVATION_DURATION_MINUTES,
    }
}

/// A named open-for-reservations window, e.g. "Lunch" 12:00–14:30.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePeriod {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl ServicePeriod {
    /// Overnight or zero-length periods are rejected.
    pub fn validate(&self) -> DomainResult<()> {
        validate_period_bounds(&self.name, self.opening_time, self.closing_time)
    }

    pub fn opens_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.opening_time)
    }

    pub fn closes_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.closing_time)
    }

    /// Whether a booking window fits entirely inside this period on its day.
    pub fn accommodates(&self, slot: &TimeSlot) -> bool {
        let date = slot.start.date();
        slot.start >= self.opens_on(date) && slot.end <= self.closes_on(date)
    }
}

pub fn validate_period_bounds(name: &str, opening: NaiveTime, closing: NaiveTime) -> DomainResult<()> {
    if opening >= closing {
        return Err(DomainError::validation(format!(
            "Service period '{}' must close after it opens ({} - {})",
            name,
            opening.format("%H:%M"),
            closing.format("%H:%M"),
        )));
    }
    Ok(())
}

/// Table status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
    OutOfService,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::OutOfService => "out_of_service",
        }
    }

    /// Unknown values are treated as out of service so they never take bookings.
    pub fn from_str(s: &str) -> Self {
        match s {
            "available" => Self::Available,
            "occupied" => Self::Occupied,
            _ => Self::OutOfService,
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "available" | "occupied" | "out_of_service" => Ok(Self::from_str(s)),
            other => Err(DomainError::validation(format!(
                "Unknown table status '{}'. Expected available, occupied or out_of_service.",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub capacity: u32,
    pub status: TableStatus,
}

impl Table {
    /// Only available tables count towards capacity and can be assigned.
    pub fn is_bookable(&self) -> bool {
        self.status == TableStatus::Available
    }

    pub fn seats(&self, party_size: u32) -> bool {
        self.is_bookable() && self.capacity >= party_size
    }
}

// ── Creation payloads ───────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewServicePeriod {
    pub name: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

#[derive(Debug, Clone)]
pub struct NewTable {
    pub name: String,
    pub capacity: u32,
    pub status: TableStatus,
}

#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub avg_reservation_duration_minutes: u32,
    pub slot_interval_minutes: u32,
    pub service_periods: Vec<NewServicePeriod>,
    pub tables: Vec<NewTable>,
}

impl NewRestaurant {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Restaurant name must not be empty"));
        }
        for period in &self.service_periods {
            validate_period_bounds(&period.name, period.opening_time, period.closing_time)?;
        }
        if let Some(table) = self.tables.iter().find(|t| t.capacity == 0) {
            return Err(DomainError::validation(format!(
                "Table '{}' must seat at least one guest",
                table.name
            )));
        }
        Ok(())
    }
}
