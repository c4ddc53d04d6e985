//! Text-line chat relay server library
//!
//! A multi-client chat relay built on tokio. Each client negotiates a unique
//! display name over a small line-based handshake, then every line it sends
//! is relayed to all currently registered clients.
//!
//! # Protocol
//! Newline-delimited text, no framing beyond that:
//! - `SUBMITNAME` prompts the client for a candidate name (repeated until a
//!   unique, non-empty one arrives)
//! - `NAMEACCEPTED` acknowledges registration
//! - `NEWCLIENT <name>` announces a registration to everyone
//! - `MESSAGE <name>: <text>` relays a chat line to everyone, sender included
//!
//! # Architecture
//! One task per connection plus one writer task per connection:
//! - `Registry` is the single shared-state component, a locked name→endpoint
//!   map exposing atomic register/unregister/broadcast/send operations
//! - `run_session` drives the per-connection state machine and guarantees
//!   unregistration on every exit path
//! - `serve` accepts connections and spawns sessions; endpoints are unbounded
//!   channels drained by each connection's writer task, so fan-out never
//!   blocks on a slow peer
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use linechat::{serve, Registry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:9001").await.unwrap();
//!     serve(listener, Registry::new()).await;
//! }
//! ```

pub mod endpoint;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use endpoint::Outbound;
pub use error::{AppError, SendError};
pub use protocol::ServerLine;
pub use registry::Registry;
pub use server::serve;
pub use session::run_session;
pub use types::{ClientName, ConnId};
