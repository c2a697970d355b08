use std::process::ExitCode;

use tracing::{error, info, warn};

use folio::{Config, WebServer};

/// Config file path, overridable with `FOLIO_CONFIG`.
fn config_path() -> String {
    std::env::var("FOLIO_CONFIG").unwrap_or_else(|_| "config.toml".to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let path = config_path();

    // Load configuration
    let mut config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = folio::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        folio::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.apply_env_overrides().and_then(|_| config.validate()) {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!("folio - portfolio backend");
    if !config.smtp.has_credentials() {
        warn!("SMTP_USER/SMTP_PASSWORD not set; contact submissions will fail");
    }
    info!(
        host = %config.smtp.host,
        port = config.smtp.port,
        secure = config.smtp.secure,
        "Mail transport configured"
    );

    let server = match WebServer::from_config(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server configured on {}", server.addr());

    match server.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Web server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
