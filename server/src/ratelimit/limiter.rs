//! Core rate limiter: in-process sliding windows keyed by token.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;

use crate::ratelimit::RateLimitConfig;

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Seconds to wait before retrying (0 if allowed)
    pub retry_after: u64,
}

impl RateLimitResult {
    const fn pass_through(limit: u32) -> Self {
        Self {
            allowed: true,
            limit,
            remaining: limit,
            retry_after: 0,
        }
    }
}

/// Sliding-window rate limiter over request timestamps.
///
/// Each token keeps the instants of its in-window requests; a request is
/// allowed while fewer than `requests` instants remain inside the window.
/// State is process-local, which matches the single-process relay.
#[derive(Clone)]
pub struct RateLimiter {
    config: Arc<RateLimitConfig>,
    windows: Arc<DashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config: Arc::new(config),
            windows: Arc::new(DashMap::new()),
        }
    }

    /// Checks and records a request for the given token.
    pub fn check(&self, token: &str) -> RateLimitResult {
        self.check_at(token, Instant::now())
    }

    /// Returns the configuration for this rate limiter.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check with an explicit clock, so tests can drive the window.
    pub(crate) fn check_at(&self, token: &str, now: Instant) -> RateLimitResult {
        let limit = &self.config.token;
        if !self.config.enabled {
            return RateLimitResult::pass_through(limit.requests);
        }

        let window = std::time::Duration::from_secs(limit.window_secs);
        let mut entry = self
            .windows
            .entry(token.to_string())
            .or_insert_with(VecDeque::new);

        // Evict requests that slid out of the window.
        while let Some(oldest) = entry.front() {
            if now.duration_since(*oldest) >= window {
                entry.pop_front();
            } else {
                break;
            }
        }

        let count = entry.len() as u32;
        if count < limit.requests {
            entry.push_back(now);
            return RateLimitResult {
                allowed: true,
                limit: limit.requests,
                remaining: limit.requests - count - 1,
                retry_after: 0,
            };
        }

        // Full window: the oldest in-window request determines when a slot
        // frees up.
        let retry_after = entry
            .front()
            .map_or(limit.window_secs, |oldest| {
                window
                    .saturating_sub(now.duration_since(*oldest))
                    .as_secs()
                    .max(1)
            });

        RateLimitResult {
            allowed: false,
            limit: limit.requests,
            remaining: 0,
            retry_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ratelimit::LimitConfig;

    fn limiter(requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            enabled: true,
            token: LimitConfig {
                requests,
                window_secs,
            },
        })
    }

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = limiter(10, 60);
        let now = Instant::now();

        for i in 0..10 {
            let result = limiter.check_at("tok", now);
            assert!(result.allowed, "request {i} should be allowed");
        }

        let result = limiter.check_at("tok", now);
        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
        assert!(result.retry_after >= 1);
    }

    #[test]
    fn test_tokens_have_independent_windows() {
        let limiter = limiter(2, 60);
        let now = Instant::now();

        assert!(limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now).allowed);

        // "b" is unaffected by "a"'s exhaustion.
        assert!(limiter.check_at("b", now).allowed);
    }

    #[test]
    fn test_window_slides() {
        let limiter = limiter(2, 60);
        let start = Instant::now();

        assert!(limiter.check_at("tok", start).allowed);
        assert!(limiter
            .check_at("tok", start + Duration::from_secs(30))
            .allowed);
        assert!(!limiter
            .check_at("tok", start + Duration::from_secs(45))
            .allowed);

        // The first request slides out at +60s; one slot frees up.
        assert!(limiter
            .check_at("tok", start + Duration::from_secs(61))
            .allowed);
        assert!(!limiter
            .check_at("tok", start + Duration::from_secs(62))
            .allowed);
    }

    #[test]
    fn test_disabled_limiter_passes_everything() {
        let limiter = RateLimiter::new(RateLimitConfig {
            enabled: false,
            token: LimitConfig {
                requests: 1,
                window_secs: 60,
            },
        });
        let now = Instant::now();

        for _ in 0..100 {
            assert!(limiter.check_at("tok", now).allowed);
        }
    }

    #[test]
    fn test_remaining_counts_down() {
        let limiter = limiter(3, 60);
        let now = Instant::now();

        assert_eq!(limiter.check_at("tok", now).remaining, 2);
        assert_eq!(limiter.check_at("tok", now).remaining, 1);
        assert_eq!(limiter.check_at("tok", now).remaining, 0);
        assert!(!limiter.check_at("tok", now).allowed);
    }
}
