//! Router configuration for Web API.

use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{repo_stats, send_contact, AppState};
use super::middleware::{contact_rate_limit, create_cors_layer, security_headers, RateLimitState};
use super::openapi::openapi_json;
use crate::config::ServerConfig;

/// Create the main router.
pub fn create_router(app_state: Arc<AppState>, config: &ServerConfig) -> Router {
    // Contact route, rate limited per client IP when enabled
    let mut contact_routes = Router::new().route("/contact", post(send_contact));
    if config.contact_rate_limit > 0 {
        let limiter = Arc::new(RateLimitState::new(
            config.contact_rate_limit,
            config.trust_proxy_headers,
        ));
        contact_routes =
            contact_routes.route_layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
                let state = limiter.clone();
                contact_rate_limit(state, req, next)
            }));
    }

    let api_routes = Router::new()
        .merge(contact_routes)
        .route("/github", get(repo_stats))
        .route("/openapi.json", get(openapi_json));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(CompressionLayer::new()),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
