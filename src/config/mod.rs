use crate::core::{AppError, BusinessClock, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// `json` switches the subscriber to JSON lines
    pub log_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Requests per caller per hour
    pub rate_limit_per_hour: u32,
    pub audit_queue_capacity: usize,
    /// Offset of the business calendar, e.g. -5 for Lima
    pub business_utc_offset_hours: i32,
}

impl PricingConfig {
    pub fn clock(&self) -> Result<BusinessClock> {
        BusinessClock::from_utc_offset_hours(self.business_utc_offset_hours).ok_or_else(|| {
            AppError::Configuration(format!(
                "Invalid BUSINESS_UTC_OFFSET_HOURS: {}",
                self.business_utc_offset_hours
            ))
        })
    }
}

/// Read `name`, falling back to `default`, and parse it
pub(crate) fn env_or<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", name)))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            pricing: PricingConfig {
                rate_limit_per_hour: env_or("RATE_LIMIT_PER_HOUR", "1000")?,
                audit_queue_capacity: env_or("AUDIT_QUEUE_CAPACITY", "1024")?,
                business_utc_offset_hours: env_or("BUSINESS_UTC_OFFSET_HOURS", "-5")?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pricing.rate_limit_per_hour == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        if self.pricing.audit_queue_capacity == 0 {
            return Err(AppError::Configuration(
                "Audit queue capacity must be greater than 0".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(format!(
                "Pool size ({}) cannot exceed max connections ({})",
                self.database.pool_size, self.database.max_connections
            )));
        }

        self.pricing.clock()?;

        Ok(())
    }
}
