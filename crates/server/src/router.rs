//! Broadcast router: the single place that decides fan-out.
//!
//! Components hand the router a finished [`ServerMessage`] plus the
//! originating connection; [`Router::route`] maps the message to one of
//! three static policies. No other code sends to clients, so the whole
//! delivery policy is auditable in the one `match` below.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::protocol::ServerMessage;

/// Per-connection outbound senders, keyed by player id.
///
/// Senders are registered when a connection arrives and removed on
/// disconnect; a send to a closed channel is silently skipped (the
/// disconnect path is already tearing that client down).
pub struct Router {
    clients: HashMap<Uuid, UnboundedSender<ServerMessage>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    pub fn register(&mut self, id: Uuid, outbound: UnboundedSender<ServerMessage>) {
        self.clients.insert(id, outbound);
    }

    pub fn unregister(&mut self, id: Uuid) {
        self.clients.remove(&id);
    }

    /// The fan-out policy. `origin` is the connection whose inbound event
    /// produced this message.
    pub fn route(&self, origin: Uuid, message: ServerMessage) {
        use ServerMessage::*;
        match &message {
            // Originator only: the initial snapshot and the incremental
            // chunk stream are private state for that client.
            GameState { .. } | ChunkUpdate(_) => self.send_to(origin, message),

            // Everyone but the originator: the actor already knows its own
            // presence and position.
            PlayerJoined(_) | PlayerLeft(_) | PlayerMoved(_) => {
                self.broadcast_except(origin, message)
            }

            // Everyone including the originator: all participants must
            // converge on identical world and player state.
            BlockPlaced { .. }
            | BlockDestroyed { .. }
            | ChatMessage { .. }
            | PlayerDamaged { .. }
            | PlayerDied { .. }
            | PlayerRespawned { .. }
            | PlayerHealed { .. } => self.broadcast(message),
        }
    }

    fn send_to(&self, id: Uuid, message: ServerMessage) {
        if let Some(tx) = self.clients.get(&id) {
            let _ = tx.send(message);
        }
    }

    fn broadcast(&self, message: ServerMessage) {
        for tx in self.clients.values() {
            let _ = tx.send(message.clone());
        }
    }

    fn broadcast_except(&self, origin: Uuid, message: ServerMessage) {
        for (id, tx) in &self.clients {
            if *id != origin {
                let _ = tx.send(message.clone());
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
