//! Chat relay server - entry point
//!
//! Binds the TCP listener and hands it to the accept loop.

use std::env;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use linechat::{serve, AppError, Registry};

/// Default server address; port 9001 is the relay's traditional port
const DEFAULT_ADDR: &str = "127.0.0.1:9001";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=linechat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("linechat=info")),
        )
        .init();

    // Get bind address from command line or use default
    let addr = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    let listener = TcpListener::bind(&addr).await?;
    info!("Chat relay listening on {}", addr);

    serve(listener, Registry::new()).await;

    Ok(())
}
