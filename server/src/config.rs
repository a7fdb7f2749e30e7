//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{ensure, Context, Result};
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:3000")
    pub bind_address: String,

    /// Public base URL advertised in webhook-address messages
    /// (e.g., "https://relay.example.com")
    pub domain: String,

    /// `SQLite` connection URL
    pub database_url: String,

    /// Lower bound of the randomized friend-accept delay in milliseconds
    /// (default: 1200)
    pub accept_delay_min_ms: u64,

    /// Upper bound of the randomized friend-accept delay in milliseconds
    /// (default: 3200)
    pub accept_delay_max_ms: u64,

    /// Outbound send timeout in seconds (default: 10)
    pub send_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            domain: env::var("DOMAIN").context("DOMAIN must be set")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:pigeon.db?mode=rwc".into()),
            accept_delay_min_ms: env::var("ACCEPT_DELAY_MIN_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1200),
            accept_delay_max_ms: env::var("ACCEPT_DELAY_MAX_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3200),
            send_timeout_secs: env::var("SEND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        };

        ensure!(
            config.accept_delay_min_ms <= config.accept_delay_max_ms,
            "ACCEPT_DELAY_MIN_MS must not exceed ACCEPT_DELAY_MAX_MS"
        );

        Ok(config)
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".into(),
            domain: "http://localhost:3000".into(),
            database_url: "sqlite::memory:".into(),
            accept_delay_min_ms: 1200,
            accept_delay_max_ms: 3200,
            send_timeout_secs: 10,
        }
    }
}
