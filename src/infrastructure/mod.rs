//! Infrastructure layer - external concerns

pub mod database;
pub mod storage;

pub use database::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};
pub use storage::InMemoryStore;
