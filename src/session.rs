//! Per-connection session handling
//!
//! Runs the protocol state machine for one accepted connection: negotiate a
//! unique display name, then relay every subsequent line through the shared
//! registry. The connection's socket is wrapped in a line codec and split;
//! a dedicated writer task drains the session's outbound endpoint into the
//! write half, so the session's own prompts and registry fan-out share one
//! ordered path to the peer.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, info};

use crate::endpoint::Outbound;
use crate::error::AppError;
use crate::protocol::ServerLine;
use crate::registry::Registry;
use crate::types::{ClientName, ConnId};

/// Longest accepted input line in bytes; a longer line ends the session
pub const MAX_LINE_LEN: usize = 8192;

/// Drive one connection from accept to close
///
/// Returns Ok on a clean close (peer hung up) and Err on a framing or
/// transport failure. Either way the name is unregistered and the connection
/// released before returning; a session failure never affects other sessions.
pub async fn run_session<S>(io: S, registry: Registry) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let conn_id = ConnId::new();
    let framed = Framed::new(io, LinesCodec::new_with_max_length(MAX_LINE_LEN));
    let (sink, mut lines) = framed.split();

    let (outbound, line_rx) = Outbound::channel();
    let writer = tokio::spawn(pump_lines(line_rx, sink));

    let mut name = None;
    let result = drive(conn_id, &mut lines, &outbound, &registry, &mut name).await;

    // Mandatory teardown, reached on every exit route including errors.
    if let Some(name) = name {
        registry.unregister(&name);
    }
    drop(outbound);
    let _ = writer.await;

    info!("Connection {} closed", conn_id);
    result
}

/// The `AwaitingName` → `Registered` state machine
///
/// The registered name is written through `name_slot` the moment it is
/// claimed so the caller can unregister it no matter how this returns.
async fn drive<S>(
    conn_id: ConnId,
    lines: &mut SplitStream<Framed<S, LinesCodec>>,
    outbound: &Outbound,
    registry: &Registry,
    name_slot: &mut Option<ClientName>,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // AwaitingName: prompt until a unique name is claimed. A client that
    // keeps submitting taken names is prompted indefinitely.
    let name = loop {
        if outbound.send(ServerLine::SubmitName.to_string()).is_err() {
            return Ok(());
        }
        let candidate = match lines.next().await {
            Some(line) => line?,
            // Peer left before claiming a name; nothing to unregister.
            None => return Ok(()),
        };
        let Some(candidate) = ClientName::new(candidate) else {
            continue;
        };
        if registry.try_register(candidate.clone(), outbound.clone()) {
            break candidate;
        }
        debug!("Connection {} requested taken name '{}'", conn_id, candidate);
    };
    *name_slot = Some(name.clone());
    info!("Connection {} registered as '{}'", conn_id, name);

    if outbound.send(ServerLine::NameAccepted.to_string()).is_err() {
        return Ok(());
    }
    // No exclusion: the new client sees its own join notice.
    registry.broadcast(&ServerLine::NewClient(name.clone()).to_string(), None);

    // Registered: relay every line to all clients, the sender included.
    while let Some(line) = lines.next().await {
        let body = line?;
        let message = ServerLine::Message {
            from: name.clone(),
            body,
        };
        registry.broadcast(&message.to_string(), None);
    }
    Ok(())
}

/// Writer task: drain queued lines into the socket's write half
///
/// Ends when every endpoint clone is dropped (session teardown) or a write
/// fails; the closed receiver is what the rest of the system observes.
async fn pump_lines<S>(
    mut line_rx: mpsc::UnboundedReceiver<String>,
    mut sink: SplitSink<Framed<S, LinesCodec>, String>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(line) = line_rx.recv().await {
        if let Err(e) = sink.send(line).await {
            debug!("Write failed, ending writer task: {}", e);
            break;
        }
    }
    let _ = sink.close().await;
}
