//! Outbound endpoint definition
//!
//! Represents the delivery side of one connected client: a cloneable handle
//! whose lines are drained by that client's single writer task.

use tokio::sync::mpsc;

use crate::error::SendError;

/// Handle for delivering lines to one connected client
///
/// The registry holds one clone per registered name; the owning session holds
/// another for its own prompts and acknowledgments. All clones feed the same
/// writer task, so writes to one peer never interleave within a line.
///
/// The channel is unbounded: delivery never blocks the caller, and a stalled
/// peer only delays its own writer task.
#[derive(Debug, Clone)]
pub struct Outbound {
    sender: mpsc::UnboundedSender<String>,
}

impl Outbound {
    /// Create an endpoint together with the receiver its writer task drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Queue a line for delivery to this client
    ///
    /// Returns an error if the writer task is gone (client disconnecting).
    /// That is the owning session's teardown signal, not the caller's problem.
    pub fn send(&self, line: impl Into<String>) -> Result<(), SendError> {
        self.sender
            .send(line.into())
            .map_err(|_| SendError::ChannelClosed)
    }
}
