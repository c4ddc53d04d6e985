//! Connection accept loop
//!
//! Accepts incoming TCP connections forever and spawns one session task per
//! connection. Sessions run independently; their only coordination point is
//! the shared registry.

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::registry::Registry;
use crate::session::run_session;

/// Accept connections on `listener` until the process exits
///
/// A failed accept is logged and the loop continues; a failed session is that
/// session's problem and is logged by its own task.
pub async fn serve(listener: TcpListener, registry: Registry) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let registry = registry.clone();

                tokio::spawn(async move {
                    if let Err(e) = run_session(stream, registry).await {
                        error!("Session error for {}: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
