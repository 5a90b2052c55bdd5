//! Resource API server.
//!
//! Run from repo root: `cargo run -p resource-server`
//! Needs `DATABASE_URL` (a `postgres://` URL, or `memory://` for a throwaway store).

use resource_api::{app, open_store, seed_if_empty, AppConfig, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("resource_api=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let store = match open_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "database connection error");
            std::process::exit(1);
        }
    };

    if config.seed_on_boot {
        if let Err(e) = seed_if_empty(store.as_ref()).await {
            tracing::error!(error = %e, "error seeding data");
        }
    }

    let router = app(AppState::new(store), config.body_limit_bytes);
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("server running on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
