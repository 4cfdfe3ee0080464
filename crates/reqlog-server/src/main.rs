//! # Reqlog Server
//!
//! Demo HTTP server showing the request/response logging middleware on a
//! small orders API.

use reqlog_config::ConfigLoader;
use reqlog_core::{telemetry::init_logging, ReqlogError, ReqlogResult};
use reqlog_rest::LoggingState;
use reqlog_server::{
    app::build_router,
    startup::{print_startup_info, shutdown_signal},
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // the subscriber may not be installed yet
        eprintln!("Application error: {}", e);
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> ReqlogResult<()> {
    let config = ConfigLoader::from_default_location().load()?;

    init_logging(&config.telemetry)?;

    info!("Starting Reqlog demo server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    print_startup_info(&config);

    let state = LoggingState::new(config.logging.request_response.clone())?;
    let router = build_router(state);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ReqlogError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ReqlogError::Internal(format!("HTTP server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}
