//! Configuration module for the alumni registry.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the persisted JSON document
    pub data_path: PathBuf,
    /// Directory holding one photo file per record
    pub photo_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let data_path = env::var("ALUMNI_DATA_PATH")
            .unwrap_or_else(|_| "./alumni_data.json".to_string())
            .into();

        let photo_dir = env::var("ALUMNI_PHOTO_DIR")
            .unwrap_or_else(|_| "./photo".to_string())
            .into();

        let raw_addr = env::var("ALUMNI_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
        let bind_addr = raw_addr.parse().map_err(|e| {
            AppError::Internal(format!("Invalid ALUMNI_BIND_ADDR '{}': {}", raw_addr, e))
        })?;

        let log_level = env::var("ALUMNI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            data_path,
            photo_dir,
            bind_addr,
            log_level,
        })
    }
}
