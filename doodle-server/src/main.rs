use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

use doodle_core::WordCatalog;
use doodle_server::{
    config::Config, create_routes, profiles::ProfileRegistry, session_manager::SessionManager,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Doodle Arena server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let catalog = match &config.words_file {
        Some(path) => {
            info!("Loading words from {}", path);
            WordCatalog::from_file(path)
        }
        None => WordCatalog::builtin(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load word catalog: {:#}", e);
            error!("Set WORDS_FILE to a JSON word list or unset it to use the built-in words.");
            std::process::exit(1);
        }
    };

    let host: IpAddr = match config.host.parse() {
        Ok(host) => host,
        Err(e) => {
            error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    let profiles = Arc::new(ProfileRegistry::new());
    let session_manager = Arc::new(SessionManager::new(
        config.engine.clone(),
        catalog,
        profiles,
    ));

    let routes = create_routes(session_manager.clone());

    // Start cleanup task
    let cleanup_session_manager = session_manager.clone();
    let session_timeout = config.session_timeout();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let removed = cleanup_session_manager
                .cleanup_inactive_sessions(session_timeout)
                .await;
            if removed > 0 {
                info!("Reaped {} idle sessions", removed);
            }
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((host, config.port), shutdown_signal());

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use signal::unix::SignalKind;

        match (
            signal::unix::signal(SignalKind::interrupt()),
            signal::unix::signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
            }
            _ => {
                error!("Failed to install signal handlers, falling back to Ctrl+C");
                if signal::ctrl_c().await.is_ok() {
                    info!("Received Ctrl+C, shutting down gracefully...");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }
}
