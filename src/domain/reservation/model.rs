//! Reservation domain entity

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, TimeSlot};

/// Reservation status
///
/// Only `Confirmed` reservations occupy a table. The lifecycle is
/// `confirmed → cancelled` or `confirmed → completed`; nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "confirmed" => Self::Confirmed,
            "completed" => Self::Completed,
            _ => Self::Cancelled,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who the table is booked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerDetails {
    pub fn validate(&self) -> DomainResult<()> {
        let missing: Vec<&str> = [
            ("customer_name", &self.name),
            ("customer_email", &self.email),
            ("customer_phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        if !self.email.contains('@') {
            return Err(DomainError::validation("customer_email is not a valid address"));
        }
        Ok(())
    }
}

/// A booking of one table for one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub restaurant_id: i32,
    pub table_id: i32,
    pub customer: CustomerDetails,
    pub number_of_guests: u32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::from_bounds(self.start_time, self.end_time)
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    /// Whether this reservation currently blocks `slot` on its table.
    pub fn blocks(&self, slot: &TimeSlot) -> bool {
        self.is_confirmed() && self.slot().overlaps(slot)
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition(ReservationStatus::Cancelled)
    }

    pub fn complete(&mut self) -> DomainResult<()> {
        self.transition(ReservationStatus::Completed)
    }

    fn transition(&mut self, to: ReservationStatus) -> DomainResult<()> {
        if self.status != ReservationStatus::Confirmed {
            return Err(DomainError::InvalidTransition {
                id: self.id,
                from: self.status.as_str(),
                to: to.as_str(),
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Reservation about to be written by the booking transaction
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub restaurant_id: i32,
    pub table_id: i32,
    pub customer: CustomerDetails,
    pub number_of_guests: u32,
    pub slot: TimeSlot,
}

impl NewReservation {
    /// Materialise as a confirmed reservation with the store-assigned id.
    pub fn into_reservation(self, id: i32, created_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            restaurant_id: self.restaurant_id,
            table_id: self.table_id,
            customer: self.customer,
            number_of_guests: self.number_of_guests,
            start_time: self.slot.start,
            end_time: self.slot.end,
            status: ReservationStatus::Confirmed,
            created_at,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
