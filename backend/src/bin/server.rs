//! Elephant HTTP Server Binary
//!
//! Entry point for the analysis server. It loads the configuration, builds the
//! callable registry, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin elephant-server
//!
//! ELEPHANT_SERVER_PORT=8080 RUST_LOG=debug cargo run --bin elephant-server
//! ```
//!
//! # Environment Variables
//!
//! - `ELEPHANT_SERVER_CONFIG`: Path to a TOML config file (default: `elephant-server.toml`)
//! - `ELEPHANT_SERVER_HOST`: Server host (default: 127.0.0.1)
//! - `ELEPHANT_SERVER_PORT`: Server port (default: 5000)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use elephant_server::config::ServerConfig;
use elephant_server::dispatch::CallableRegistry;
use elephant_server::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Elephant server {}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env()?;
    let registry = Arc::new(CallableRegistry::with_builtins());
    info!(
        "Registered {} callables in {} modules",
        registry.len(),
        registry.modules().len()
    );

    let app = create_router(AppState::new(registry, &config));

    let addr = config.bind_address()?;
    info!("Server listening on http://{}", addr);
    info!("Module listing: http://{}/api", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
