use std::collections::HashMap;
use std::num::Wrapping;

use canvas::ConnectionId;

pub type CleanupToken = u32;

/// Live connection registry plus the ledger of cleanups scheduled for
/// departed connections.
pub struct ServerState {
    connection_id_source: Wrapping<ConnectionId>,
    connections: Vec<ConnectionId>,

    cleanup_token_source: Wrapping<CleanupToken>,
    pending_cleanups: HashMap<ConnectionId, CleanupToken>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            connection_id_source: Wrapping(0),
            connections: Vec::new(),

            cleanup_token_source: Wrapping(0),
            pending_cleanups: HashMap::new(),
        }
    }

    pub fn create_connection(&mut self) -> ConnectionId {
        let connection_id = self.new_connection_id();
        self.connections.push(connection_id);
        log::info!("Connection {} registered", connection_id);
        connection_id
    }

    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c != connection_id);
        self.connections.len() < before
    }

    pub fn count(&self) -> usize {
        self.connections.len()
    }

    pub fn connection_ids(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains(connection_id)
    }

    /// Records a pending cleanup for a departed connection. The returned
    /// token identifies this particular schedule; a later schedule for the
    /// same id supersedes it.
    pub fn schedule_cleanup(&mut self, connection_id: ConnectionId) -> CleanupToken {
        self.cleanup_token_source += Wrapping(1);
        let token = self.cleanup_token_source.0;
        self.pending_cleanups.insert(connection_id, token);
        token
    }

    pub fn cancel_cleanup(&mut self, connection_id: &ConnectionId) -> Option<CleanupToken> {
        self.pending_cleanups.remove(connection_id)
    }

    /// Claims the pending cleanup iff `token` is still the current one.
    /// A sweep holding a stale token was canceled or superseded.
    pub fn take_cleanup(&mut self, connection_id: &ConnectionId, token: CleanupToken) -> bool {
        match self.pending_cleanups.get(connection_id) {
            Some(pending) if *pending == token => {
                self.pending_cleanups.remove(connection_id);
                true
            }
            _ => false,
        }
    }

    fn new_connection_id(&mut self) -> ConnectionId {
        // The counter wraps; skip ids still held by live connections.
        loop {
            self.connection_id_source += Wrapping(1);
            let candidate = self.connection_id_source.0;
            if !self.connections.contains(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_counts_live_connections() {
        let mut state = ServerState::new();
        let a = state.create_connection();
        let b = state.create_connection();
        assert_ne!(a, b);
        assert_eq!(state.count(), 2);

        assert!(state.disconnect(&a));
        assert_eq!(state.count(), 1);
        assert!(!state.is_connected(&a));
        assert!(state.is_connected(&b));
    }

    #[test]
    fn it_ignores_a_repeated_disconnect() {
        let mut state = ServerState::new();
        let a = state.create_connection();

        assert!(state.disconnect(&a));
        assert!(!state.disconnect(&a));
        assert_eq!(state.count(), 0);
    }

    #[test]
    fn it_claims_a_cleanup_only_with_the_current_token() {
        let mut state = ServerState::new();
        let a = state.create_connection();
        state.disconnect(&a);

        let stale = state.schedule_cleanup(a);
        let current = state.schedule_cleanup(a);

        assert!(!state.take_cleanup(&a, stale));
        assert!(state.take_cleanup(&a, current));
        assert!(!state.take_cleanup(&a, current));
    }

    #[test]
    fn it_cancels_a_pending_cleanup() {
        let mut state = ServerState::new();
        let a = state.create_connection();
        state.disconnect(&a);

        let token = state.schedule_cleanup(a);
        assert_eq!(state.cancel_cleanup(&a), Some(token));
        assert!(!state.take_cleanup(&a, token));
    }

    #[test]
    fn it_skips_live_ids_when_the_counter_wraps() {
        let mut state = ServerState::new();
        let first = state.create_connection();
        assert_eq!(first, 1);

        // Park the counter just before the first id recurs.
        state.connection_id_source = Wrapping(0);
        let next = state.create_connection();
        assert_eq!(next, 2);
    }
}
