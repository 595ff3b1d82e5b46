//! Application services

mod reservation;
mod restaurant;

pub use reservation::ReservationService;
pub use restaurant::RestaurantService;
