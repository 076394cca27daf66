use log::{error, info};
use sqlbridge_daemon::config::Config;
use sqlbridge_daemon::error::{DaemonError, IoContext};
use sqlbridge_daemon::handler::Handler;
use sqlbridge_daemon::paths::databases_path;
use sqlbridge_daemon::server::DaemonServer;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), DaemonError> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let databases_path = databases_path(&config)?;

    info!("Starting sqlbridge-daemon");
    info!("Socket path: {}", config.socket_path.display());
    info!("Databases path: {}", databases_path.display());

    let handler = Handler::new(databases_path);
    handler.set_debug(config.debug);

    let server = DaemonServer::new(handler.clone(), config.socket_path.clone());

    // Set up signal handlers
    let shutdown = shutdown_signal();

    // Run the server
    tokio::select! {
        result = server.serve() => {
            if let Err(e) = result {
                error!("Server error: {e}");
                return Err(DaemonError::io("Server error", e));
            }
        }
        _ = shutdown => {
            info!("Received shutdown signal");
        }
    }

    info!("Closing {} open databases", handler.registry().len());
    handler.registry().close_all();

    // Clean up: remove socket file
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path).io_context(|| {
            format!(
                "Failed to remove socket file at {}",
                config.socket_path.display()
            )
        })?;
    }

    info!("sqlbridge-daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
