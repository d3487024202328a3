use crate::message::{ClientIntent, ServerEvent};
use crate::rectangle_store::RectangleStore;
use crate::types::{Rectangle, RectangleId, RectangleSpec};

/// Client-side mirror of the server canvas. It never originates truth: local
/// edits are applied optimistically and the matching intent is handed to the
/// transport, while server events overwrite whatever they touch.
pub struct ClientCanvas {
    store: RectangleStore,
    connected: bool,
    connected_users: usize,
}

impl ClientCanvas {
    pub fn new() -> Self {
        Self {
            store: RectangleStore::new(),
            connected: false,
            connected_users: 0,
        }
    }

    pub fn handle_connected(&mut self) {
        self.connected = true;
    }

    /// Keeps the last known rectangles; the next snapshot replaces them.
    pub fn handle_disconnected(&mut self) {
        self.connected = false;
    }

    pub fn apply(&mut self, event: ServerEvent) {
        log::debug!("Apply server event: {:?}", event);
        match event {
            ServerEvent::CanvasState(snapshot) => {
                self.store.replace_all(snapshot.rectangles);
                self.connected_users = snapshot.connected_users;
            }
            ServerEvent::RectangleAdded(rectangle) => {
                if !self.store.insert(rectangle) {
                    log::debug!("Ignoring add for a rectangle already mirrored");
                }
            }
            ServerEvent::RectangleMoved { id, x, y } => {
                if !self.store.move_to(&id, x, y) {
                    log::debug!("Ignoring move for unknown rectangle {}", id);
                }
            }
            ServerEvent::RectangleDeleted(id) => {
                self.store.remove(&id);
            }
            ServerEvent::UserCount(count) => {
                self.connected_users = count;
            }
        }
    }

    pub fn add_rectangle(&mut self, spec: RectangleSpec) -> Option<ClientIntent> {
        if !self.connected {
            return None;
        }
        let rectangle = self.store.create(spec);
        Some(ClientIntent::AddRectangle(rectangle))
    }

    pub fn move_rectangle(&mut self, id: RectangleId, x: f64, y: f64) -> Option<ClientIntent> {
        if !self.connected {
            return None;
        }
        self.store.move_to(&id, x, y);
        Some(ClientIntent::MoveRectangle { id, x, y })
    }

    pub fn delete_rectangle(&mut self, id: RectangleId) -> Option<ClientIntent> {
        if !self.connected {
            return None;
        }
        self.store.remove(&id);
        Some(ClientIntent::DeleteRectangle(id))
    }

    pub fn rectangles(&self) -> &[Rectangle] {
        self.store.rectangles()
    }

    pub fn connected_users(&self) -> usize {
        self.connected_users
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl Default for ClientCanvas {
    fn default() -> Self {
        Self::new()
    }
}
