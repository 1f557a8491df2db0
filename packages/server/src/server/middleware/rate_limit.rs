// Rate limiting using tower-governor
//
// Configuration:
// - /users/me: ME_RATE_LIMIT_PER_MINUTE requests per client IP (default 2)
// - The whole per-minute allowance is available as a burst, then one request
//   is replenished every 60s / limit
// - Keyed on the peer address (the server is started with connect info).
//   Forwarding headers are ignored since clients can set them freely.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

/// Milliseconds between replenished requests for a per-minute limit
pub fn replenish_interval_ms(per_minute: u32) -> u64 {
    60_000 / u64::from(per_minute.max(1))
}

/// Limit every route of `router` to `per_minute` requests per client IP
pub fn limit_per_client_ip<S>(router: Router<S>, per_minute: u32) -> Result<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(replenish_interval_ms(per_minute))
            .burst_size(per_minute.max(1))
            .use_headers() // x-ratelimit-* response headers
            .finish()
            .context("Invalid rate limiter configuration")?,
    );

    Ok(router.layer(GovernorLayer { config }))
}
