//! Rate limiting configuration.

/// Configuration for the rate limiting system.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    pub enabled: bool,
    /// Per-token limit on the relay endpoints
    pub token: LimitConfig,
}

/// Configuration for a single rate limit.
#[derive(Debug, Clone)]
pub struct LimitConfig {
    /// Maximum requests allowed in the window
    pub requests: u32,
    /// Window duration in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token: LimitConfig {
                requests: 10,
                window_secs: 60,
            },
        }
    }
}

impl RateLimitConfig {
    /// Creates configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RATE_LIMIT_ENABLED`: Enable/disable rate limiting (default: true)
    /// - `RATE_LIMIT_TOKEN`: Per-token limit as "requests,window_secs"
    ///   (default: "10,60")
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RATE_LIMIT_ENABLED") {
            config.enabled = val.parse().unwrap_or(true);
        }
        if let Ok(val) = std::env::var("RATE_LIMIT_TOKEN") {
            if let Some(limit) = parse_limit_config(&val) {
                config.token = limit;
            }
        }

        config
    }
}

/// Parses a limit config from "requests,window_secs" format.
fn parse_limit_config(val: &str) -> Option<LimitConfig> {
    let parts: Vec<&str> = val.split(',').collect();
    if parts.len() == 2 {
        let requests = parts[0].trim().parse().ok()?;
        let window_secs = parts[1].trim().parse().ok()?;
        Some(LimitConfig {
            requests,
            window_secs,
        })
    } else {
        None
    }
}
