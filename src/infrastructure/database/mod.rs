pub mod entities;
pub mod migrator;
pub mod repositories;

pub use migrator::Migrator;
pub use repositories::SeaOrmRepositoryProvider;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./booking.db?mode=rwc";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./booking.db?mode=rwc")
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
        }
    }

    /// Every pooled connection to `sqlite::memory:` is a separate database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut opts = ConnectOptions::new(self.url.clone());
        opts.sqlx_logging(false);
        if self.is_in_memory() {
            opts.max_connections(1).min_connections(1);
        }
        opts
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);
    let db = Database::connect(config.connect_options()).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Apply pending migrations
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), sea_orm::DbErr> {
    info!("Running database migrations...");
    Migrator::up(db, None).await?;
    info!("Migrations completed");
    Ok(())
}
