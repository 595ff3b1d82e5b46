//! # Table Booking
//!
//! Reservation availability and table-assignment engine for restaurants.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Restaurants, tables, service periods, reservations and the
//!   repository traits they are stored behind
//! - **application**: Availability calculation, table assignment and the
//!   booking guard that keeps confirmed reservations from overlapping
//! - **infrastructure**: SeaORM database, migrations and an in-memory store
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: Runtime wiring used by the CLI binary

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
