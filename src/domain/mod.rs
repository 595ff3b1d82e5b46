//! Domain layer: entities, value types and repository interfaces

pub mod repositories;
pub mod reservation;
pub mod restaurant;
pub mod slot;

pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    BookingTransaction, CustomerDetails, NewReservation, Reservation, ReservationReader,
    ReservationRepository, ReservationStatus,
};
pub use restaurant::{
    NewRestaurant, NewServicePeriod, NewTable, ReservationDefaults, Restaurant,
    RestaurantRepository, ServicePeriod, Table, TableStatus,
};
pub use slot::TimeSlot;

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
