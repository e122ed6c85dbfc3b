use std::sync::Arc;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sectorguide::{
    AppState, ConfigOverrides, DocumentStore, PgDocumentStore, ServerConfig, StoreSettings,
    cli_utils, create_router,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Args {
    #[arrrg(optional, "Host to bind the HTTP server")]
    host: Option<String>,
    #[arrrg(optional, "Port to bind the HTTP server")]
    port: Option<u16>,
    #[arrrg(optional, "PostgreSQL connection URL")]
    database_url: Option<String>,
    #[arrrg(optional, "Database name; replaces the path of the connection URL")]
    database_name: Option<String>,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

impl Args {
    fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host,
            port: self.port,
            database_url: self.database_url,
            database_name: self.database_name,
            verbose: self.verbose,
        }
    }
}

const HELP_TEXT: &str = r#"sectorguided - AI tools catalogue server

USAGE:
    sectorguided [OPTIONS]

OPTIONS:
    --host <HOST>             Host to bind the HTTP server [env: HOST] [default: 0.0.0.0]
    --port <PORT>             Port to bind the HTTP server [env: PORT] [default: 8000]
    --database-url <URL>      PostgreSQL connection URL [env: DATABASE_URL]
    --database-name <NAME>    Database name, replaces the URL path [env: DATABASE_NAME]
    --verbose                 Enable debug logging

DESCRIPTION:
    Serves sectors, tools, and comparisons over HTTP. The document store is used only
    when both a database URL and a database name are given. Without them, or when the
    database cannot be reached, the server still starts and reports the store as
    unavailable.

    Log filtering follows RUST_LOG. The server supports graceful shutdown via SIGTERM
    or Ctrl+C.

API ENDPOINTS:
    GET    /                  Liveness message
    GET    /schema            JSON schemas of sector, tool, and comparison
    GET    /test              Store diagnostics
    POST   /seed              Seed empty collections with starter data
    GET    /sectors           List sectors
    GET    /sectors/{slug}    Sector with its tools and comparison
    POST   /search            Search tools: {"q": "..."}"#;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "sectorguide=debug,tower_http=debug,info"
    } else {
        "sectorguide=info,tower_http=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connects to the configured store, or returns `None` to run degraded.
async fn connect_store(settings: &StoreSettings) -> Option<Arc<dyn DocumentStore>> {
    let url = match settings.connection_url() {
        Ok(Some(url)) => url,
        Ok(None) => {
            tracing::warn!("DATABASE_URL and DATABASE_NAME not both set; running without a store");
            return None;
        }
        Err(e) => {
            tracing::error!(error = %e, "running without a store");
            return None;
        }
    };
    match PgDocumentStore::connect(&url).await {
        Ok(store) => {
            tracing::info!(database = ?settings.database_name, "connected to document store");
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::error!(error = %e, "could not connect to document store; running without it");
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received, stopping server gracefully");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line("USAGE: sectorguided [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    let config = ServerConfig::load(args.into_overrides())
        .unwrap_or_else(|e| cli_utils::exit_with_error(&e.to_string()));
    init_tracing(config.verbose);

    tracing::debug!(
        host = %config.host,
        port = config.port,
        store_configured = config.store.is_configured(),
        "starting with configuration"
    );

    let store = connect_store(&config.store).await;
    let app = create_router(AppState::new(store, config.store.clone()));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}
