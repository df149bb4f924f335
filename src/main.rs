use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use newsfeed::config::DEFAULT_CONFIG_PATH;
use newsfeed::{start_scheduler, Config, Fetcher, NewsStore, Scheduler, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            newsfeed::logging::init_console_only("info");
            error!("Failed to load {}: {}", config_path, e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    if let Err(e) = newsfeed::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        newsfeed::logging::init_console_only(&config.logging.level);
    }

    info!("newsfeed {}", env!("CARGO_PKG_VERSION"));
    info!(
        "{} feeds, polled every {} minutes",
        config.feeds.len(),
        config.period
    );

    let store = match NewsStore::open(&config.database.path).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Database opened at {}", config.database.path);

    let fetcher = match Fetcher::from_config(&config.fetch) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        }
    });

    let scheduler = Scheduler::from_config(&config, fetcher, store.clone());
    let scheduler_handle = start_scheduler(scheduler, wait_for_shutdown(shutdown_rx.clone()));

    let server = WebServer::new(&config.server, store.clone());
    let result = server.run(wait_for_shutdown(shutdown_rx)).await;

    scheduler_handle.abort();
    store.database().close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(
                "Web server failed on {}:{}: {}",
                config.server.host, config.server.port, e
            );
            ExitCode::FAILURE
        }
    }
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}
