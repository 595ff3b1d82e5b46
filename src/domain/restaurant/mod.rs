//! Restaurant aggregate
//!
//! The static capacity side of booking: restaurants, their service
//! periods and their tables. Administrator-managed and long-lived.

pub mod model;
pub mod repository;

pub use model::{
    NewRestaurant, NewServicePeriod, NewTable, ReservationDefaults, Restaurant, ServicePeriod,
    Table, TableStatus, DEFAULT_RESERVATION_DURATION_MINUTES, DEFAULT_SLOT_INTERVAL_MINUTES,
};
pub use repository::RestaurantRepository;
