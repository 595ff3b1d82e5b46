pub mod booking;
pub mod services;

// Re-export key types for convenience
pub use booking::{
    AvailabilityCalculator, AvailableSlots, BookingGuard, BookingRequest, CapacityModel,
    CapacitySnapshot, TableAssigner,
};
pub use services::{ReservationService, RestaurantService};
