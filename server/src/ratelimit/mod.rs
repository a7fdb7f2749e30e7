//! Per-token rate limiting for the webhook gateway.
//!
//! Tokens are bearer credentials, so limits key on the token itself rather
//! than the caller's address: whoever holds a token shares its budget.

pub mod config;
pub mod error;
pub mod limiter;
pub mod middleware;

pub use config::*;
pub use error::*;
pub use limiter::*;
pub use middleware::rate_limit_by_token;
