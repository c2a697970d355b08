//! Test helpers for Web API tests.
//!
//! Provides fake mail transports, a stand-in GitHub API and router builders.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_test::TestServer;
use serde_json::json;
use tokio::net::TcpListener;

use folio::config::{GithubConfig, ServerConfig};
use folio::contact::{DispatchError, Dispatcher, MailTransport, OutboundMessage, SmtpSettings, TransportConfig};
use folio::github::RepoStatsProxy;
use folio::web::handlers::AppState;
use folio::web::router::create_router;

/// Transport configuration with every field present.
pub fn complete_transport_config() -> TransportConfig {
    TransportConfig {
        host: "smtp.example.dev".to_string(),
        port: 587,
        secure: false,
        user: Some("me@example.dev".to_string()),
        password: Some("hunter2".to_string()),
        from: None,
        to: Some("inbox@example.dev".to_string()),
        timeout: Duration::from_secs(5),
    }
}

/// Transport configuration lacking credentials.
pub fn transport_config_without_credentials() -> TransportConfig {
    TransportConfig {
        user: None,
        password: None,
        ..complete_transport_config()
    }
}

/// A delivered message, as seen by the fake transport.
#[derive(Debug, Clone)]
pub struct Delivered {
    pub to: String,
    pub from: String,
    pub message: OutboundMessage,
}

/// Transport that records deliveries and always succeeds.
#[derive(Default)]
pub struct RecordingTransport {
    delivered: Mutex<Vec<Delivered>>,
}

impl RecordingTransport {
    pub fn delivered(&self) -> Vec<Delivered> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(
        &self,
        settings: &SmtpSettings,
        message: &OutboundMessage,
    ) -> Result<(), DispatchError> {
        self.delivered.lock().unwrap().push(Delivered {
            to: settings.to.email.to_string(),
            from: settings.from.email.to_string(),
            message: message.clone(),
        });
        Ok(())
    }
}

/// Transport that always fails with a detailed error.
#[derive(Default)]
pub struct FailingTransport {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl MailTransport for FailingTransport {
    async fn deliver(
        &self,
        _settings: &SmtpSettings,
        _message: &OutboundMessage,
    ) -> Result<(), DispatchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DispatchError::Connection(
            "connection refused by smtp.example.dev:587 (auth user me@example.dev)".to_string(),
        ))
    }
}

/// Server configuration for tests: any origin, generous rate limit, client
/// IP taken from `X-Forwarded-For`.
pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        contact_rate_limit: 1000,
        trust_proxy_headers: true,
    }
}

/// GitHub configuration pointing at a local upstream.
pub fn github_config(base_url: &str) -> GithubConfig {
    GithubConfig {
        api_base_url: base_url.to_string(),
        token: None,
        cache_ttl_secs: 3600,
        connect_timeout_secs: 2,
        timeout_secs: 5,
    }
}

/// Build a test server around the given dispatcher and GitHub settings.
pub fn create_test_server_with(
    dispatcher: Dispatcher,
    github: &GithubConfig,
    server_config: &ServerConfig,
) -> TestServer {
    let repo_stats = RepoStatsProxy::new(github).expect("Failed to create stats proxy");
    let app_state = Arc::new(AppState::new(dispatcher, repo_stats));
    let router = create_router(app_state, server_config);
    TestServer::new(router).expect("Failed to create test server")
}

/// Build a test server with the given transport and config. GitHub points
/// at an address nothing listens on.
pub fn create_test_server(
    transport: Arc<dyn MailTransport>,
    transport_config: TransportConfig,
) -> TestServer {
    create_test_server_with(
        Dispatcher::new(transport_config, transport),
        &github_config("http://127.0.0.1:9"),
        &test_server_config(),
    )
}

/// State of the stand-in GitHub API.
#[derive(Default)]
pub struct FakeGithub {
    pub hits: AtomicUsize,
    pub last_authorization: Mutex<Option<String>>,
    pub last_accept: Mutex<Option<String>>,
}

async fn fake_repo(
    State(state): State<Arc<FakeGithub>>,
    Path((owner, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_accept.lock().unwrap() = headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match (owner.as_str(), name.as_str()) {
        ("octo", "hello") => Json(json!({
            "id": 1,
            "full_name": "octo/hello",
            "stargazers_count": 120,
            "forks_count": 8,
            "description": "Hello world",
            "language": "Rust",
            "topics": ["cli", "demo"]
        }))
        .into_response(),
        ("octo", "bare") => Json(json!({
            "stargazers_count": 1,
            "forks_count": 0,
            "description": null,
            "language": null
        }))
        .into_response(),
        ("octo", "garbage") => (StatusCode::OK, "<html>not json</html>").into_response(),
        ("octo", "limited") => (
            StatusCode::FORBIDDEN,
            Json(json!({"message": "API rate limit exceeded"})),
        )
            .into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))).into_response(),
    }
}

/// Start the stand-in GitHub API on a random port.
pub async fn spawn_fake_github() -> (SocketAddr, Arc<FakeGithub>) {
    let state = Arc::new(FakeGithub::default());
    let app = Router::new()
        .route("/repos/:owner/:name", get(fake_repo))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake GitHub");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}
