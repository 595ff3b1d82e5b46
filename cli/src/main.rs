//! Table Booking CLI server
//!
//! Headless reservation service suitable for deployment as a systemd
//! service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/table-booking/config.toml)
//! table-booking
//!
//! # Custom config path
//! table-booking --config /etc/table-booking/config.toml
//!
//! # Override port and database
//! table-booking --api-port 8080 --database-url sqlite://./bookings.db?mode=rwc
//!
//! # Validate config without starting
//! table-booking --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use table_booking::config::AppConfig;
use table_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Table Booking: restaurant reservation availability and table assignment.
#[derive(Parser, Debug)]
#[command(
    name = "table-booking",
    version,
    about = "Restaurant reservation availability and table-assignment service",
    long_about = "Table Booking: REST API server that answers availability queries \
                  and books restaurant tables without double-booking.\n\n\
                  Default config: ~/.config/table-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the database URL (DATABASE_URL still takes precedence).
    #[arg(long)]
    database_url: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip seeding the configured restaurants into an empty database.
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(table_booking::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(mut cfg) => {
            // Init tracing first so subsequent logs are formatted properly
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            // Fallback tracing init
            let level = cli.log_level.clone().unwrap_or_else(|| "info".to_string());
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(level))
                .init();
            if cli.check {
                error!("Failed to load config from {}: {}", config_path.display(), e);
                return Err(e.into());
            }
            warn!("Failed to load config from {}: {}", config_path.display(), e);
            warn!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        info!("CLI override: log_level = {}", level);
        config.logging.level = level.clone();
    }
    if let Some(url) = cli.database_url {
        info!("CLI override: database.url = {}", url);
        config.database.url = url;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("✅ Configuration is valid");
        println!("   Config file  : {}", config_path.display());
        println!("   API address  : {}:{}", config.server.api_host, config.server.api_port);
        println!("   Database     : {}", config.database.connection_url());
        println!("   Log level    : {}", config.logging.level);
        println!(
            "   Defaults     : {} min reservations, {} min slots",
            config.reservations.default_duration_minutes,
            config.reservations.default_slot_interval_minutes
        );
        println!("   Restaurants  : {} to seed", config.restaurants.len());
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        seed: !cli.no_seed,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    // Wait for shutdown signal, then clean up
    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
