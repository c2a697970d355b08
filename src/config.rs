//! Configuration module for folio.
//!
//! Settings come from `config.toml` and are then overridden by environment
//! variables. The result is read once at startup and never mutated.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::{FolioError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin without credentials.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Contact submissions allowed per client IP per minute (0 disables the limit).
    #[serde(default = "default_contact_rate_limit")]
    pub contact_rate_limit: u32,
    /// Take the client IP from `X-Forwarded-For` / `X-Real-IP`. Only enable
    /// behind a reverse proxy that overwrites these headers.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_contact_rate_limit() -> u32 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            contact_rate_limit: default_contact_rate_limit(),
            trust_proxy_headers: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/folio.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Outbound SMTP configuration for the contact relay.
#[derive(Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server host.
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Use implicit TLS (usually port 465). When false, STARTTLS is used.
    #[serde(default)]
    pub secure: bool,
    /// Login user name.
    #[serde(default)]
    pub user: Option<String>,
    /// Login password.
    #[serde(default)]
    pub password: Option<String>,
    /// Sender address. Falls back to `user`.
    #[serde(default)]
    pub from: Option<String>,
    /// Recipient of contact submissions. Falls back to `user`.
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Upper bound for a single send, in seconds.
    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout() -> u64 {
    30
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            secure: false,
            user: None,
            password: None,
            from: None,
            contact_email: None,
            timeout_secs: default_smtp_timeout(),
        }
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("password", &redacted(&self.password))
            .field("from", &self.from)
            .field("contact_email", &self.contact_email)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SmtpConfig {
    /// Whether both login credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.user.is_some() && self.password.is_some()
    }
}

/// GitHub repository stats proxy configuration.
#[derive(Clone, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the GitHub REST API.
    #[serde(default = "default_github_api_base_url")]
    pub api_base_url: String,
    /// Optional access token to raise the upstream rate limit.
    #[serde(default)]
    pub token: Option<String>,
    /// Freshness window for cached stats, in seconds.
    #[serde(default = "default_github_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Connection timeout in seconds.
    #[serde(default = "default_github_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_github_timeout")]
    pub timeout_secs: u64,
}

fn default_github_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_cache_ttl() -> u64 {
    3600 // 1 hour
}

fn default_github_connect_timeout() -> u64 {
    5
}

fn default_github_timeout() -> u64 {
    10
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_github_api_base_url(),
            token: None,
            cache_ttl_secs: default_github_cache_ttl(),
            connect_timeout_secs: default_github_connect_timeout(),
            timeout_secs: default_github_timeout(),
        }
    }
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_base_url", &self.api_base_url)
            .field("token", &redacted(&self.token))
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Placeholder shown instead of a secret in `Debug` output.
pub(crate) fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// SMTP configuration.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// GitHub proxy configuration.
    #[serde(default)]
    pub github: GithubConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FolioError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FolioError::Config(format!("config parse error: {e}")))
    }

    /// Apply overrides from the process environment.
    ///
    /// Supported environment variables:
    /// - `FOLIO_HOST`, `FOLIO_PORT`: listen address
    /// - `FOLIO_TRUST_PROXY_HEADERS`: client IP from proxy headers
    /// - `SMTP_HOST`, `SMTP_PORT`, `SMTP_SECURE`, `SMTP_USER`, `SMTP_PASSWORD`,
    ///   `SMTP_FROM`, `CONTACT_EMAIL`: mail transport
    /// - `GITHUB_TOKEN`: GitHub API token
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = get("FOLIO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("FOLIO_PORT") {
            self.server.port = parse_port("FOLIO_PORT", &port)?;
        }

        if let Some(trust) = get("FOLIO_TRUST_PROXY_HEADERS") {
            self.server.trust_proxy_headers = trust.trim().eq_ignore_ascii_case("true");
        }

        if let Some(host) = get("SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Some(port) = get("SMTP_PORT") {
            self.smtp.port = parse_port("SMTP_PORT", &port)?;
        }
        if let Some(secure) = get("SMTP_SECURE") {
            self.smtp.secure = secure.trim().eq_ignore_ascii_case("true");
        }
        if let Some(user) = get("SMTP_USER") {
            self.smtp.user = Some(user);
        }
        if let Some(password) = get("SMTP_PASSWORD") {
            self.smtp.password = Some(password);
        }
        if let Some(from) = get("SMTP_FROM") {
            self.smtp.from = Some(from);
        }
        if let Some(contact_email) = get("CONTACT_EMAIL") {
            self.smtp.contact_email = Some(contact_email);
        }

        if let Some(token) = get("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Missing SMTP credentials are not an error here: the service still
    /// starts and every contact submission fails with a dispatch error.
    pub fn validate(&self) -> Result<()> {
        if self.smtp.port == 0 {
            return Err(FolioError::Config("smtp.port must not be 0".to_string()));
        }
        if self.smtp.timeout_secs == 0 {
            return Err(FolioError::Config(
                "smtp.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let base = url::Url::parse(&self.github.api_base_url).map_err(|e| {
            FolioError::Config(format!("github.api_base_url is not a valid URL: {e}"))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(FolioError::Config(format!(
                "github.api_base_url has unsupported scheme: {}",
                base.scheme()
            )));
        }

        Ok(())
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse()
        .map_err(|_| FolioError::Config(format!("{key} is not a valid port: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.server.contact_rate_limit, 5);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/folio.log");
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert!(!config.smtp.secure);
        assert!(config.smtp.user.is_none());
        assert!(config.smtp.password.is_none());
        assert!(config.smtp.from.is_none());
        assert!(config.smtp.contact_email.is_none());
        assert_eq!(config.smtp.timeout_secs, 30);
        assert_eq!(config.github.api_base_url, "https://api.github.com");
        assert!(config.github.token.is_none());
        assert_eq!(config.github.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080
cors_origins = ["https://example.dev"]
contact_rate_limit = 10

[logging]
level = "debug"
file = "custom/logs/app.log"

[smtp]
host = "mail.example.dev"
port = 465
secure = true
user = "me@example.dev"
password = "secret"
from = "Portfolio <noreply@example.dev>"
contact_email = "inbox@example.dev"
timeout_secs = 15

[github]
api_base_url = "http://localhost:9999"
token = "ghp_test"
cache_ttl_secs = 60
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origins, vec!["https://example.dev"]);
        assert_eq!(config.server.contact_rate_limit, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.smtp.host, "mail.example.dev");
        assert_eq!(config.smtp.port, 465);
        assert!(config.smtp.secure);
        assert_eq!(config.smtp.user.as_deref(), Some("me@example.dev"));
        assert_eq!(config.smtp.contact_email.as_deref(), Some("inbox@example.dev"));
        assert_eq!(config.smtp.timeout_secs, 15);
        assert_eq!(config.github.api_base_url, "http://localhost:9999");
        assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
        assert_eq!(config.github.cache_ttl_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[smtp]
user = "me@example.dev"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.smtp.user.as_deref(), Some("me@example.dev"));
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("[server]\nport = \"not a number\"");
        assert!(matches!(result, Err(FolioError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4000\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/folio/config.toml");
        assert!(matches!(result, Err(FolioError::Io(_))));
    }

    #[test]
    fn test_env_overrides_smtp() {
        let env = env_of(&[
            ("SMTP_HOST", "smtp.example.dev"),
            ("SMTP_PORT", "465"),
            ("SMTP_SECURE", "true"),
            ("SMTP_USER", "me@example.dev"),
            ("SMTP_PASSWORD", "hunter2"),
            ("SMTP_FROM", "noreply@example.dev"),
            ("CONTACT_EMAIL", "inbox@example.dev"),
            ("GITHUB_TOKEN", "ghp_abc"),
        ]);

        let mut config = Config::default();
        config
            .apply_overrides_from(|key| env.get(key).cloned())
            .unwrap();

        assert_eq!(config.smtp.host, "smtp.example.dev");
        assert_eq!(config.smtp.port, 465);
        assert!(config.smtp.secure);
        assert_eq!(config.smtp.user.as_deref(), Some("me@example.dev"));
        assert_eq!(config.smtp.password.as_deref(), Some("hunter2"));
        assert_eq!(config.smtp.from.as_deref(), Some("noreply@example.dev"));
        assert_eq!(config.smtp.contact_email.as_deref(), Some("inbox@example.dev"));
        assert_eq!(config.github.token.as_deref(), Some("ghp_abc"));
        assert!(config.smtp.has_credentials());
    }

    #[test]
    fn test_env_overrides_empty_values_ignored() {
        let env = env_of(&[("SMTP_HOST", ""), ("SMTP_USER", "")]);

        let mut config = Config::default();
        config
            .apply_overrides_from(|key| env.get(key).cloned())
            .unwrap();

        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert!(config.smtp.user.is_none());
        assert!(!config.smtp.has_credentials());
    }

    #[test]
    fn test_env_secure_only_true_enables_tls() {
        for (value, expected) in [("true", true), ("TRUE", true), ("1", false), ("yes", false)] {
            let env = env_of(&[("SMTP_SECURE", value)]);
            let mut config = Config::default();
            config
                .apply_overrides_from(|key| env.get(key).cloned())
                .unwrap();
            assert_eq!(config.smtp.secure, expected, "SMTP_SECURE={value}");
        }
    }

    #[test]
    fn test_trust_proxy_headers_defaults_off() {
        assert!(!Config::default().server.trust_proxy_headers);

        let config = Config::parse("[server]\ntrust_proxy_headers = true\n").unwrap();
        assert!(config.server.trust_proxy_headers);

        let env = env_of(&[("FOLIO_TRUST_PROXY_HEADERS", "true")]);
        let mut config = Config::default();
        config
            .apply_overrides_from(|key| env.get(key).cloned())
            .unwrap();
        assert!(config.server.trust_proxy_headers);
    }

    #[test]
    fn test_env_invalid_port() {
        let env = env_of(&[("SMTP_PORT", "smtp")]);
        let mut config = Config::default();
        let result = config.apply_overrides_from(|key| env.get(key).cloned());
        assert!(matches!(result, Err(FolioError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_github_url() {
        let mut config = Config::default();
        config.github.api_base_url = "ftp://example.dev".to_string();
        assert!(config.validate().is_err());

        config.github.api_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_smtp_port() {
        let mut config = Config::default();
        config.smtp.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_missing_credentials() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = Config::default();
        config.smtp.user = Some("me@example.dev".to_string());
        config.smtp.password = Some("hunter2".to_string());
        config.github.token = Some("ghp_secret".to_string());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("me@example.dev"));
        assert!(debug.contains("<redacted>"));
    }
}
