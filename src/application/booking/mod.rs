//! Booking engine: capacity model, availability, table assignment and the
//! transactional booking guard.

mod assignment;
mod availability;
mod capacity;
mod guard;

pub use assignment::{best_fit_candidates, TableAssigner};
pub use availability::{
    candidate_starts, AvailabilityCalculator, AvailableSlots, INSUFFICIENT_CAPACITY_MESSAGE,
    NOT_CONFIGURED_MESSAGE,
};
pub use capacity::{booked_capacity, CapacityModel, CapacitySnapshot};
pub use guard::{BookingGuard, BookingRequest};
