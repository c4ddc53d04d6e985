//! Error types for the chat relay
//!
//! Defines application-level errors and endpoint send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// All variants are fatal to a single session (or, for `Io` during startup,
/// to the process); none of them is ever surfaced to a connected client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Line framing error: oversized line or transport failure mid-session
    #[error("line codec error: {0}")]
    Codec(#[from] tokio_util::codec::LinesCodecError),

    /// IO error (listener setup, socket failure)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Endpoint send errors
///
/// Occurs when delivering a line to a session whose writer task is gone.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("channel closed")]
    ChannelClosed,
}
