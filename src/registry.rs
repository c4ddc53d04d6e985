//! Shared client registry
//!
//! The single piece of shared mutable state in the relay: a name → endpoint
//! mapping behind one lock. Name uniqueness and the live-connection set are
//! the same map, so they cannot drift apart. All access goes through the
//! atomic operations here; the raw map is never exposed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::endpoint::Outbound;
use crate::types::ClientName;

/// Synchronized registry of currently connected, named clients
///
/// Cloneable handle; all clones share the same map. Every operation takes the
/// lock for an O(clients) critical section at most, and the lock is never
/// held across an endpoint delivery: broadcast and send snapshot the relevant
/// endpoints under the lock, release it, then deliver.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    clients: Arc<Mutex<HashMap<ClientName, Outbound>>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim `name` for the given endpoint
    ///
    /// Returns true and inserts the entry if the name was free; returns false
    /// and changes nothing if it was taken. Two concurrent claims on one name
    /// cannot both succeed.
    pub fn try_register(&self, name: ClientName, outbound: Outbound) -> bool {
        let mut clients = self.clients.lock();
        if clients.contains_key(&name) {
            return false;
        }
        clients.insert(name, outbound);
        true
    }

    /// Release `name`, making it immediately available for reuse
    ///
    /// No-op if the name is not registered, so teardown paths may call this
    /// unconditionally and more than once.
    pub fn unregister(&self, name: &ClientName) {
        if self.clients.lock().remove(name).is_some() {
            debug!("Unregistered '{}'", name);
        }
    }

    /// Deliver `line` to every registered client except `exclude`
    ///
    /// Fan-out is best-effort over a snapshot of the map: a client that
    /// unregisters mid-broadcast either receives the line or does not, but a
    /// half-inserted or half-removed entry is never observed. Delivery to a
    /// closed endpoint is skipped without aborting the rest; that session is
    /// already tearing itself down.
    pub fn broadcast(&self, line: &str, exclude: Option<&ClientName>) {
        let targets: Vec<(ClientName, Outbound)> = {
            let clients = self.clients.lock();
            clients
                .iter()
                .filter(|(name, _)| Some(*name) != exclude)
                .map(|(name, outbound)| (name.clone(), outbound.clone()))
                .collect()
        };

        for (name, outbound) in targets {
            if outbound.send(line).is_err() {
                debug!("Skipping broadcast to '{}': endpoint closed", name);
            }
        }
    }

    /// Deliver `line` to the single client registered under `name`
    ///
    /// Returns false if no such name is registered or its endpoint is closed.
    pub fn send_to(&self, name: &ClientName, line: &str) -> bool {
        let target = self.clients.lock().get(name).cloned();
        match target {
            Some(outbound) => outbound.send(line).is_ok(),
            None => false,
        }
    }

    /// Number of currently registered clients
    pub fn len(&self) -> usize {
        self.clients.lock().len()
    }

    /// Whether no client is currently registered
    pub fn is_empty(&self) -> bool {
        self.clients.lock().is_empty()
    }
}
