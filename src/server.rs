//! Reusable booking server runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, database and
//! migrations, restaurant seeding, the REST API and graceful shutdown. The
//! CLI binary is a thin wrapper around it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::config::{AppConfig, SeedRestaurant};
use crate::domain::{DomainResult, RepositoryProvider};
use crate::infrastructure::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};
use crate::interfaces::http::create_api_router;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Insert the configured restaurants into an empty store (default: true).
    pub seed: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            seed: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking server.
///
/// ```rust,no_run
/// use table_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Address the API actually bound to (port 0 resolves here)
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting table booking service...");

        let prometheus = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db_config = DatabaseConfig {
            url: app_cfg.database.connection_url(),
        };
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            run_migrations(&db).await?;
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        if opts.seed {
            let created = seed_restaurants(repos.as_ref(), &app_cfg.restaurants).await?;
            if created > 0 {
                info!(created, "Seeded restaurants from configuration");
            }
        }

        // ── REST API server ────────────────────────────────────
        let router = create_api_router(repos.clone(), app_cfg.reservation_defaults(), prometheus);

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();

        let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for in-flight requests to drain (bounded by the configured
    /// timeout), then close the database.
    pub async fn wait(self) {
        let timeout = Duration::from_secs(self.config.server.shutdown_timeout);
        let mut api_task = self.api_task;
        let task = &mut api_task;
        let drained = self
            .shutdown
            .shutdown_with_cleanup(move || async move {
                match task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
            })
            .await;
        if !drained {
            warn!(?timeout, "Aborting REST API server after shutdown timeout");
            api_task.abort();
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("Table booking service shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("Shutting down table booking service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can only be installed once per process; later
/// starts in the same process reuse it.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics will be empty: {}", e);
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

/// Insert `seeds` when the store holds no restaurant yet. Returns how many
/// were created.
pub async fn seed_restaurants(
    repos: &dyn RepositoryProvider,
    seeds: &[SeedRestaurant],
) -> DomainResult<usize> {
    if seeds.is_empty() || repos.restaurants().count().await? > 0 {
        return Ok(0);
    }
    for seed in seeds {
        let restaurant = repos.restaurants().create(seed.to_new_restaurant()?).await?;
        info!(
            restaurant_id = restaurant.id,
            name = %restaurant.name,
            tables = seed.tables.len(),
            periods = seed.service_periods.len(),
            "Restaurant seeded"
        );
    }
    Ok(seeds.len())
}

/// Initialize tracing from the application config. `RUST_LOG` wins over
/// `logging.level`.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
