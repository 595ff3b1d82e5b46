//! Database entities module

pub mod dining_table;
pub mod reservation;
pub mod restaurant;
pub mod service_period;

pub use dining_table::Entity as DiningTable;
pub use reservation::Entity as Reservation;
pub use restaurant::Entity as Restaurant;
pub use service_period::Entity as ServicePeriod;
