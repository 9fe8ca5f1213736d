//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
///
/// The provider delay knobs exist because every provider in this repository is
/// simulated; tests shrink them to zero, the defaults mimic a plausible
/// analysis/generation backend.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub allowed_origin: String,
    pub max_upload_bytes: usize,
    pub generation_delay: Duration,
    pub image_analysis_delay: Duration,
    pub pdf_analysis_delay: Duration,
    pub spreadsheet_analysis_delay: Duration,
    pub text_analysis_delay: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin =
            std::env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let max_upload_bytes = env_u64("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)? as usize;

        // --- Load Simulated Provider Delays ---
        let generation_delay = env_delay_ms("GENERATION_DELAY_MS", 3000)?;
        let image_analysis_delay = env_delay_ms("IMAGE_ANALYSIS_DELAY_MS", 1000)?;
        let pdf_analysis_delay = env_delay_ms("PDF_ANALYSIS_DELAY_MS", 1500)?;
        let spreadsheet_analysis_delay = env_delay_ms("SPREADSHEET_ANALYSIS_DELAY_MS", 1200)?;
        let text_analysis_delay = env_delay_ms("TEXT_ANALYSIS_DELAY_MS", 800)?;

        Ok(Self {
            bind_address,
            log_level,
            allowed_origin,
            max_upload_bytes,
            generation_delay,
            image_analysis_delay,
            pdf_analysis_delay,
            spreadsheet_analysis_delay,
            text_analysis_delay,
        })
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

fn env_delay_ms(name: &str, default_ms: u64) -> Result<Duration, ConfigError> {
    Ok(Duration::from_millis(env_u64(name, default_ms)?))
}
