use std::time::Duration;

use tokio::sync::mpsc::{channel, Sender};

use canvas::{
    epoch_millis, CanvasSnapshot, ClientIntent, ConnectionId, RectangleStore, ServerEvent,
};

use super::connection::{ConnectionCommand, ConnectionEvent};
use crate::admin::{AdminCommand, ServerStatus};
use crate::connection_tx_storage::ConnectionTxStorage;
use crate::server_state::{CleanupToken, ServerState};

pub type ServerTx = Sender<ServerCommand>;

#[derive(Debug)]
pub enum ServerCommand {
    ConnectionCommand(ConnectionCommand),
    AdminCommand(AdminCommand),
    /// Internal tick enqueued when a departed connection's grace window
    /// elapses. Carries the token it was scheduled with; a stale token
    /// means the cleanup was canceled or superseded.
    SweepAbandoned {
        connection_id: ConnectionId,
        token: CleanupToken,
    },
}

/// Owns the authoritative canvas and the connection registry. Exactly one
/// task runs it; every mutation arrives through the command channel, so
/// commands apply in arrival order and that order is the conflict
/// resolution.
struct Server {
    server_state: ServerState,
    connections: ConnectionTxStorage,
    canvas: RectangleStore,
    grace_window: Duration,
    srv_tx: ServerTx,
}

impl Server {
    fn new(grace_window: Duration, srv_tx: ServerTx) -> Self {
        Self {
            server_state: ServerState::new(),
            connections: ConnectionTxStorage::new(),
            canvas: RectangleStore::new(),
            grace_window,
            srv_tx,
        }
    }

    async fn handle_command(&mut self, command: ServerCommand) {
        match command {
            ServerCommand::ConnectionCommand(command) => {
                self.handle_connection_command(command).await
            }
            ServerCommand::AdminCommand(command) => self.handle_admin_command(command),
            ServerCommand::SweepAbandoned {
                connection_id,
                token,
            } => self.sweep_abandoned(connection_id, token).await,
        }

        // An actor whose egress failed during this command is gone and will
        // never send a Disconnect of its own. Reaping broadcasts, which can
        // mark more connections dead.
        loop {
            let dead = self.connections.take_dead();
            if dead.is_empty() {
                break;
            }
            for connection_id in dead {
                self.handle_disconnect(connection_id).await;
            }
        }
    }

    async fn handle_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect { tx } => {
                let connection_id = self.server_state.create_connection();
                if self.server_state.cancel_cleanup(&connection_id).is_some() {
                    log::debug!("Connection {} canceled its pending cleanup", connection_id);
                }
                self.connections.insert(connection_id, tx);

                self.connections
                    .send(&connection_id, ConnectionEvent::Joined { connection_id })
                    .await;
                let snapshot = self.snapshot();
                self.connections
                    .send(
                        &connection_id,
                        ConnectionEvent::Event(ServerEvent::CanvasState(snapshot)),
                    )
                    .await;
                self.broadcast_all(ServerEvent::UserCount(self.server_state.count()))
                    .await;
            }
            ConnectionCommand::Disconnect { from } => self.handle_disconnect(from).await,
            ConnectionCommand::Intent { from, intent } => {
                if !self.server_state.is_connected(&from) {
                    log::warn!("Dropping intent from unknown connection {}", from);
                    return;
                }
                self.handle_intent(from, intent).await;
            }
        }
    }

    async fn handle_disconnect(&mut self, from: ConnectionId) {
        if !self.server_state.disconnect(&from) {
            log::debug!("Ignoring repeated disconnect for connection {}", from);
            return;
        }
        self.connections.remove(&from);
        log::info!("Connection {} disconnected", from);

        self.broadcast_all(ServerEvent::UserCount(self.server_state.count()))
            .await;
        self.schedule_sweep(from);
    }

    async fn handle_intent(&mut self, from: ConnectionId, intent: ClientIntent) {
        match intent {
            ClientIntent::AddRectangle(mut rectangle) => {
                rectangle.created_by = Some(from);
                rectangle.created_at = epoch_millis();
                if self.canvas.insert(rectangle.clone()) {
                    self.broadcast(ServerEvent::RectangleAdded(rectangle), Some(&from))
                        .await;
                } else {
                    log::debug!(
                        "Dropping duplicate rectangle {} from connection {}",
                        rectangle.id,
                        from
                    );
                }
            }
            ClientIntent::MoveRectangle { id, x, y } => {
                if self.canvas.move_to(&id, x, y) {
                    self.broadcast(ServerEvent::RectangleMoved { id, x, y }, Some(&from))
                        .await;
                } else {
                    log::debug!("Dropping move for unknown rectangle {}", id);
                }
            }
            ClientIntent::DeleteRectangle(id) => {
                // Relayed even when the id is already gone; delete fan-out
                // is idempotent.
                self.canvas.remove(&id);
                self.broadcast(ServerEvent::RectangleDeleted(id), Some(&from))
                    .await;
            }
        }
    }

    fn handle_admin_command(&mut self, command: AdminCommand) {
        match command {
            AdminCommand::GetStatus { tx } => {
                let status = ServerStatus {
                    connected_users: self.server_state.count(),
                    rectangle_count: self.canvas.len(),
                };
                if tx.send(status).is_err() {
                    log::warn!("Status requester went away");
                }
            }
            AdminCommand::DescribeCanvas { tx } => {
                if tx.send(self.snapshot()).is_err() {
                    log::warn!("Canvas requester went away");
                }
            }
        }
    }

    fn schedule_sweep(&mut self, connection_id: ConnectionId) {
        let token = self.server_state.schedule_cleanup(connection_id);
        let srv_tx = self.srv_tx.clone();
        let grace_window = self.grace_window;

        tokio::spawn(async move {
            tokio::time::sleep(grace_window).await;
            let _ = srv_tx
                .send(ServerCommand::SweepAbandoned {
                    connection_id,
                    token,
                })
                .await;
        });
    }

    async fn sweep_abandoned(&mut self, connection_id: ConnectionId, token: CleanupToken) {
        if !self.server_state.take_cleanup(&connection_id, token) {
            log::debug!("Skipping stale sweep for connection {}", connection_id);
            return;
        }

        let removed = self
            .canvas
            .remove_where(|r| r.created_by == Some(connection_id));
        if removed > 0 {
            log::info!(
                "Removed {} rectangle(s) abandoned by connection {}",
                removed,
                connection_id
            );
            let snapshot = self.snapshot();
            self.broadcast_all(ServerEvent::CanvasState(snapshot)).await;
        }
    }

    fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            rectangles: self.canvas.snapshot(),
            connected_users: self.server_state.count(),
        }
    }

    async fn broadcast(&mut self, event: ServerEvent, without: Option<&ConnectionId>) {
        let connection_ids = self.server_state.connection_ids().to_vec();
        for connection_id in connection_ids {
            if Some(&connection_id) == without {
                continue;
            }
            self.connections
                .send(&connection_id, ConnectionEvent::Event(event.clone()))
                .await;
        }
    }

    async fn broadcast_all(&mut self, event: ServerEvent) {
        self.broadcast(event, None).await;
    }
}

pub fn spawn_server(grace_window: Duration) -> ServerTx {
    let (srv_tx, mut srv_rx) = channel::<ServerCommand>(64);

    let tx = srv_tx.clone();
    tokio::spawn(async move {
        let mut server = Box::new(Server::new(grace_window, tx));

        while let Some(command) = srv_rx.recv().await {
            server.handle_command(command).await;
        }
    });

    return srv_tx;
}
