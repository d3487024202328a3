use serde::{Deserialize, Serialize};

use crate::types::{CanvasSnapshot, Rectangle, RectangleId};

/// Client to server. Relayed to every other connection after the server
/// applies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientIntent {
    #[serde(rename = "rectangle:add")]
    AddRectangle(Rectangle),
    #[serde(rename = "rectangle:move")]
    MoveRectangle { id: RectangleId, x: f64, y: f64 },
    #[serde(rename = "rectangle:delete")]
    DeleteRectangle(RectangleId),
}

/// Server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "canvas:state")]
    CanvasState(CanvasSnapshot),
    #[serde(rename = "rectangle:add")]
    RectangleAdded(Rectangle),
    #[serde(rename = "rectangle:move")]
    RectangleMoved { id: RectangleId, x: f64, y: f64 },
    #[serde(rename = "rectangle:delete")]
    RectangleDeleted(RectangleId),
    #[serde(rename = "user:count")]
    UserCount(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_frames_user_count_as_a_bare_number() {
        let event = ServerEvent::UserCount(3);
        let value = serde_json::to_value(&event).expect("must serialize");
        assert_eq!(value, json!({"event": "user:count", "data": 3}));
    }

    #[test]
    fn it_frames_moves_with_id_and_position() {
        let id: RectangleId = "67e55044-10b1-426f-9247-bb680e5fe0c8"
            .parse()
            .expect("uuid");
        let event = ServerEvent::RectangleMoved { id, x: 5.0, y: 9.5 };

        let value = serde_json::to_value(&event).expect("must serialize");
        assert_eq!(
            value,
            json!({
                "event": "rectangle:move",
                "data": {"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "x": 5.0, "y": 9.5}
            })
        );
    }

    #[test]
    fn it_frames_deletes_with_the_raw_id() {
        let id: RectangleId = "67e55044-10b1-426f-9247-bb680e5fe0c8"
            .parse()
            .expect("uuid");
        let value =
            serde_json::to_value(&ClientIntent::DeleteRectangle(id)).expect("must serialize");
        assert_eq!(
            value,
            json!({"event": "rectangle:delete", "data": "67e55044-10b1-426f-9247-bb680e5fe0c8"})
        );
    }

    #[test]
    fn it_parses_an_add_intent_without_server_stamps() {
        let frame = r##"{
            "event": "rectangle:add",
            "data": {
                "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "x": 40.0,
                "y": 25.0,
                "width": 150.0,
                "height": 100.0,
                "fill": "#fbbf24"
            }
        }"##;

        let intent: ClientIntent = serde_json::from_str(frame).expect("must parse");
        match intent {
            ClientIntent::AddRectangle(rectangle) => {
                assert_eq!(rectangle.created_by, None);
                assert_eq!(rectangle.fill, "#fbbf24");
            }
            other => panic!("unexpected intent: {:?}", other),
        }
    }

    #[test]
    fn it_frames_snapshots_under_canvas_state() {
        let event = ServerEvent::CanvasState(CanvasSnapshot {
            rectangles: vec![],
            connected_users: 1,
        });

        let value = serde_json::to_value(&event).expect("must serialize");
        assert_eq!(value["event"], "canvas:state");
        assert_eq!(value["data"]["connectedUsers"], 1);
    }
}
