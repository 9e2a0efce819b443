use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use equity_report_server::{
    config::Config,
    report::sample_records,
    server::{AppState, ReportServer},
    source::{CachedSource, ReportSource, SheetClient},
    store::ReportStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Equity report server starting..."
    );

    // Seed the store from bundled samples
    let mut store = ReportStore::new();
    store.merge_all(sample_records());
    info!(records = store.len(), "Store seeded from bundled samples");

    // Wire up the remote source, when configured
    let source: Option<Arc<dyn ReportSource>> = match &config.sheet {
        Some(sheet_config) => {
            let client = match SheetClient::new(sheet_config, config.request.clone()) {
                Ok(c) => {
                    info!(base_url = %sheet_config.base_url, "Sheet client initialized");
                    c
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to initialize sheet client");
                    return Err(e.into());
                }
            };
            let ttl = Duration::from_secs(config.cache.ttl_secs);
            Some(Arc::new(CachedSource::new(client, ttl)))
        }
        None => {
            warn!("SHEET_BASE_URL not set, running on bundled samples only");
            None
        }
    };

    // Create application state and start the server
    let state = Arc::new(AppState::new(config, store, source));
    let server = ReportServer::new(state);

    info!("Server ready, waiting for requests on stdin...");

    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        equity_report_server::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        equity_report_server::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
