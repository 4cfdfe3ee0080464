//! Server startup utilities.

use reqlog_config::{AppConfig, LoggingOptions};
use tokio::signal;
use tracing::{info, warn};

/// Logs where the server listens and how exchanges are logged.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let options = &config.logging.request_response;

    info!("{}", separator);
    info!("HTTP:      http://{}", config.server.addr());
    info!("Health:    http://{}/health", config.server.addr());
    info!("Orders:    http://{}/api/orders", config.server.addr());
    info!("Correlation header: {}", options.correlation_id_header);
    info!("Ignored paths: {:?}", options.ignored_paths);
    info!("{}", separator);

    if !masking_effective(options) {
        warn!("Sensitive data masking is off; bodies are logged as received");
    }

    if !panics_unwind() {
        warn!("Built with panic = \"abort\"; a handler panic stops the process instead of being logged");
    }
}

/// Handler panics are only turned into logged 500 responses when panics unwind.
#[must_use]
pub const fn panics_unwind() -> bool {
    cfg!(panic = "unwind")
}

fn masking_effective(options: &LoggingOptions) -> bool {
    options.mask_sensitive_data && !options.sensitive_fields.is_empty()
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
