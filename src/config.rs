//! Application configuration
//!
//! Loaded from a TOML file. Every field has a default, so a partial file
//! (or none at all) yields a working setup.
//!
//! ```toml
//! [server]
//! api_port = 8080
//!
//! [reservations]
//! default_duration_minutes = 90
//!
//! [[restaurants]]
//! name = "Chez Test"
//! service_periods = [{ name = "Dinner", opening_time = "18:00", closing_time = "22:00" }]
//! tables = [{ name = "T1", capacity = 4 }]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    DomainResult, NewRestaurant, NewServicePeriod, NewTable, ReservationDefaults, TableStatus,
};
use crate::infrastructure::database::DEFAULT_DATABASE_URL;
use crate::shared::time::parse_time_of_day;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// `<config_dir>/table-booking/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("table-booking")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub reservations: ReservationSettings,
    pub restaurants: Vec<SeedRestaurant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl DatabaseSettings {
    /// `DATABASE_URL` wins over the file
    pub fn connection_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.url.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationSettings {
    /// Used for restaurants without their own average duration
    pub default_duration_minutes: u32,
    /// Used for restaurants without their own slot interval
    pub default_slot_interval_minutes: u32,
}

impl Default for ReservationSettings {
    fn default() -> Self {
        let defaults = ReservationDefaults::default();
        Self {
            default_duration_minutes: defaults.duration_minutes,
            default_slot_interval_minutes: defaults.slot_interval_minutes,
        }
    }
}

impl From<&ReservationSettings> for ReservationDefaults {
    fn from(s: &ReservationSettings) -> Self {
        Self {
            duration_minutes: s.default_duration_minutes,
            slot_interval_minutes: s.default_slot_interval_minutes,
        }
    }
}

/// Restaurant inserted on first start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRestaurant {
    pub name: String,
    #[serde(default)]
    pub avg_reservation_duration_minutes: u32,
    #[serde(default)]
    pub slot_interval_minutes: u32,
    #[serde(default)]
    pub service_periods: Vec<SeedServicePeriod>,
    #[serde(default)]
    pub tables: Vec<SeedTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedServicePeriod {
    pub name: String,
    /// "HH:MM"
    pub opening_time: String,
    /// "HH:MM"
    pub closing_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTable {
    pub name: String,
    pub capacity: u32,
    #[serde(default = "default_table_status")]
    pub status: String,
}

fn default_table_status() -> String {
    TableStatus::Available.as_str().to_string()
}

impl SeedRestaurant {
    pub fn to_new_restaurant(&self) -> DomainResult<NewRestaurant> {
        let service_periods = self
            .service_periods
            .iter()
            .map(|p| {
                Ok(NewServicePeriod {
                    name: p.name.clone(),
                    opening_time: parse_time_of_day(&p.opening_time)?,
                    closing_time: parse_time_of_day(&p.closing_time)?,
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let tables = self
            .tables
            .iter()
            .map(|t| {
                Ok(NewTable {
                    name: t.name.clone(),
                    capacity: t.capacity,
                    status: TableStatus::parse(&t.status)?,
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let restaurant = NewRestaurant {
            name: self.name.clone(),
            avg_reservation_duration_minutes: self.avg_reservation_duration_minutes,
            slot_interval_minutes: self.slot_interval_minutes,
            service_periods,
            tables,
        };
        restaurant.validate()?;
        Ok(restaurant)
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.api_port == 0 {
            return Err(ConfigError::Invalid("server.api_port must not be 0".into()));
        }
        match self.logging.format.to_lowercase().as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "logging.format must be 'text' or 'json', got '{}'",
                    other
                )))
            }
        }
        if self.reservations.default_duration_minutes == 0 {
            return Err(ConfigError::Invalid(
                "reservations.default_duration_minutes must be positive".into(),
            ));
        }
        if self.reservations.default_slot_interval_minutes == 0 {
            return Err(ConfigError::Invalid(
                "reservations.default_slot_interval_minutes must be positive".into(),
            ));
        }
        for seed in &self.restaurants {
            seed.to_new_restaurant()
                .map_err(|e| ConfigError::Invalid(format!("restaurant '{}': {}", seed.name, e)))?;
        }
        Ok(())
    }

    pub fn reservation_defaults(&self) -> ReservationDefaults {
        ReservationDefaults::from(&self.reservations)
    }
}
