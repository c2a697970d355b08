//! Per-IP rate limiting for the contact endpoint.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc};

use crate::web::error::ApiError;

/// Message returned when a client exceeds its quota.
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";

/// Keyed limiter state for contact submissions.
pub struct RateLimitState {
    limiter: DefaultKeyedRateLimiter<String>,
    trust_proxy_headers: bool,
}

impl RateLimitState {
    /// Create a limiter allowing `requests_per_minute` per client IP.
    ///
    /// A value of 0 is treated as 1; callers skip the layer entirely when
    /// the limit is disabled. `X-Forwarded-For` and `X-Real-IP` are only
    /// consulted when `trust_proxy_headers` is set, since any client can
    /// send them.
    pub fn new(requests_per_minute: u32, trust_proxy_headers: bool) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            trust_proxy_headers,
        }
    }

    /// Check and consume one request for the given client.
    pub fn check(&self, ip: &str) -> bool {
        self.limiter.check_key(&ip.to_string()).is_ok()
    }

    /// Forget clients whose quota has fully replenished.
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
    }
}

/// Client address from a reverse proxy header.
fn forwarded_ip(req: &Request<Body>) -> Option<String> {
    let headers = req.headers();

    if let Some(forwarded) = headers.get("X-Forwarded-For").and_then(|v| v.to_str().ok()) {
        if let Some(ip) = forwarded.split(',').next().map(str::trim) {
            if !ip.is_empty() {
                return Some(ip.to_string());
            }
        }
    }

    headers
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// Extract client IP from request.
fn get_client_ip(req: &Request<Body>, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_ip(req) {
            return ip;
        }
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Rate limiting middleware for contact submissions.
pub async fn contact_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = get_client_ip(&req, state.trust_proxy_headers);

    if !state.check(&ip) {
        tracing::warn!(ip = %ip, "Contact rate limit exceeded");
        return ApiError::too_many_requests(RATE_LIMITED_MESSAGE).into_response();
    }

    // Opportunistic cleanup keeps the key map from growing without bound.
    state.cleanup();

    next.run(req).await
}
