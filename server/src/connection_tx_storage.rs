use std::collections::HashMap;

use canvas::ConnectionId;

use crate::connection::ConnectionEvent;

pub type ConnectionTx = tokio::sync::mpsc::Sender<ConnectionEvent>;

pub struct ConnectionTxStorage {
    connection_txs: HashMap<ConnectionId, ConnectionTx>,
    dead: Vec<ConnectionId>,
}

impl ConnectionTxStorage {
    pub fn new() -> Self {
        Self {
            connection_txs: HashMap::new(),
            dead: Vec::new(),
        }
    }

    pub fn insert(&mut self, connection_id: ConnectionId, tx: ConnectionTx) {
        self.connection_txs.insert(connection_id, tx);
    }

    /// A failed send means the receiving actor is gone; the id is recorded
    /// for the engine to reap via [`take_dead`](Self::take_dead).
    pub async fn send(&mut self, to: &ConnectionId, message: ConnectionEvent) {
        if let Some(tx) = self.connection_txs.get_mut(to) {
            if let Err(err) = tx.send(message).await {
                log::warn!("Egress to connection {} failed: {}", to, err);
                if !self.dead.contains(to) {
                    self.dead.push(*to);
                }
            }
        } else {
            log::warn!("Connection {} has no egress channel", to);
        }
    }

    /// Drains the connections whose egress channel closed mid-send.
    pub fn take_dead(&mut self) -> Vec<ConnectionId> {
        std::mem::take(&mut self.dead)
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<ConnectionTx> {
        self.connection_txs.remove(connection_id)
    }
}
