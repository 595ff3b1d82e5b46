//! Reservation aggregate
//!
//! Contains the Reservation entity, related types, and repository interfaces.

pub mod model;
pub mod repository;

pub use model::{CustomerDetails, NewReservation, Reservation, ReservationStatus};
pub use repository::{BookingTransaction, ReservationReader, ReservationRepository};
