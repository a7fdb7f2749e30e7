//! Axum middleware for per-token rate limiting.

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::gateway::AppState;
use crate::ratelimit::RateLimitError;

/// Middleware to rate limit relay requests by the token path segment.
///
/// Applied to every `/send/{token}` and `/room/{token}` route, ahead of the
/// handler: over-limit requests never reach token resolution or the send.
///
/// # Behavior
///
/// - If the rate limiter is not configured (`state.rate_limiter` is `None`),
///   requests pass through.
/// - If the limit is exceeded, returns `429 Too Many Requests` with retry
///   information.
#[tracing::instrument(skip(state, request, next))]
pub async fn rate_limit_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    // Skip rate limiting if not configured
    let Some(ref rate_limiter) = state.rate_limiter else {
        return Ok(next.run(request).await);
    };

    let result = rate_limiter.check(&token);
    if !result.allowed {
        debug!(
            token = %token,
            retry_after = result.retry_after,
            "Rate limit exceeded"
        );
        return Err(RateLimitError::LimitExceeded(result));
    }

    Ok(next.run(request).await)
}
