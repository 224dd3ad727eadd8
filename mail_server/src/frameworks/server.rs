// Framework bootstrap for the mail dashboard.

use crate::frameworks::config::{Config, ConfigError};
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::AppState;

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use tokio::net::TcpListener;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("serve: {0}")]
    Serve(#[source] io::Error),
}

fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: TcpListener, state: AppState) -> io::Result<()> {
    let address = listener.local_addr()?;
    let app = app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config(path: &Path) -> Result<(), ServerError> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let config = Config::load(path)?;
    init_tracing(config.log_filter());
    tracing::debug!(
        config = %path.display(),
        db_host = %config.database.host,
        db_port = config.database.port,
        connect_timeout_ms = config.database.connect_timeout_ms,
        query_timeout_ms = config.database.query_timeout_ms,
        "config loaded"
    );

    let address = config.listen_addr;
    let listener = TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })
        .map_err(|source| ServerError::Bind { address, source })?;

    run(listener, AppState::new(config))
        .await
        .map_err(ServerError::Serve)
}
