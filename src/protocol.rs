//! Wire protocol definitions
//!
//! Newline-delimited text protocol. Server-to-client lines carry a leading
//! keyword; client-to-server lines are free text (a name candidate during the
//! handshake, a chat message afterwards), so only the server side needs a
//! typed vocabulary.

use crate::types::ClientName;

/// Server → Client protocol line
///
/// `Display` produces the exact wire form (without the trailing newline,
/// which the line codec appends).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerLine {
    /// Prompt the client to submit a candidate display name
    SubmitName,
    /// The submitted name was unique and is now registered
    NameAccepted,
    /// Broadcast: a client just registered under this name
    NewClient(ClientName),
    /// Broadcast: chat message from a registered client
    Message { from: ClientName, body: String },
}

impl std::fmt::Display for ServerLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerLine::SubmitName => f.write_str("SUBMITNAME"),
            ServerLine::NameAccepted => f.write_str("NAMEACCEPTED"),
            ServerLine::NewClient(name) => write!(f, "NEWCLIENT {}", name),
            ServerLine::Message { from, body } => write!(f, "MESSAGE {}: {}", from, body),
        }
    }
}

impl ServerLine {
    /// Parse one received line back into its protocol form
    ///
    /// Intended for client-side consumers (and tests); the server itself only
    /// emits these lines. Returns None for anything outside the protocol.
    /// A `MESSAGE` body containing `": "` parses at the first separator, so
    /// parsing is best-effort when names themselves contain that sequence.
    pub fn parse(line: &str) -> Option<Self> {
        if line == "SUBMITNAME" {
            return Some(ServerLine::SubmitName);
        }
        if line == "NAMEACCEPTED" {
            return Some(ServerLine::NameAccepted);
        }
        if let Some(rest) = line.strip_prefix("NEWCLIENT ") {
            return ClientName::new(rest.to_string()).map(ServerLine::NewClient);
        }
        if let Some(rest) = line.strip_prefix("MESSAGE ") {
            let (from, body) = rest.split_once(": ")?;
            let from = ClientName::new(from.to_string())?;
            return Some(ServerLine::Message {
                from,
                body: body.to_string(),
            });
        }
        None
    }
}
