use chrono::Utc;
use serde::{Deserialize, Serialize};

pub type ConnectionId = u16;
pub type RectangleId = uuid::Uuid;

pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub id: RectangleId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    /// Stamped by the server from the originating connection, never trusted
    /// from the payload.
    #[serde(rename = "createdBy", default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ConnectionId>,
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
}

/// Creation parameters before an id and timestamps exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub rectangles: Vec<Rectangle>,
    #[serde(rename = "connectedUsers")]
    pub connected_users: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_spells_wire_keys_in_camel_case() {
        let rectangle = Rectangle {
            id: uuid::Uuid::nil(),
            x: 10.0,
            y: 20.0,
            width: 120.0,
            height: 80.0,
            fill: "#f87171".into(),
            created_by: Some(3),
            created_at: 1700000000000,
        };

        let json = serde_json::to_value(&rectangle).expect("must serialize");
        assert_eq!(json["createdBy"], 3);
        assert_eq!(json["createdAt"], 1700000000000i64);
        assert_eq!(json["fill"], "#f87171");
        assert!(json.get("created_by").is_none());
    }

    #[test]
    fn it_omits_created_by_when_absent() {
        let rectangle = Rectangle {
            id: uuid::Uuid::nil(),
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            fill: "#60a5fa".into(),
            created_by: None,
            created_at: 0,
        };

        let json = serde_json::to_value(&rectangle).expect("must serialize");
        assert!(json.get("createdBy").is_none());
    }

    #[test]
    fn it_parses_a_minimal_client_payload() {
        let json = r##"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "x": 40.5,
            "y": 12.0,
            "width": 100.0,
            "height": 60.0,
            "fill": "#34d399"
        }"##;

        let rectangle: Rectangle = serde_json::from_str(json).expect("must parse");
        assert_eq!(rectangle.created_by, None);
        assert_eq!(rectangle.created_at, 0);
        assert_eq!(rectangle.width, 100.0);
    }

    #[test]
    fn it_serializes_snapshot_user_count() {
        let snapshot = CanvasSnapshot {
            rectangles: vec![],
            connected_users: 2,
        };

        let json = serde_json::to_value(&snapshot).expect("must serialize");
        assert_eq!(json["connectedUsers"], 2);
        assert!(json["rectangles"].as_array().expect("array").is_empty());
    }
}
