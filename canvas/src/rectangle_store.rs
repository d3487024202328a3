use crate::types::{epoch_millis, Rectangle, RectangleId, RectangleSpec};

/// Ordered rectangle collection. Absence means deleted; there are no
/// tombstones.
#[derive(Debug, Clone, Default)]
pub struct RectangleStore {
    rectangles: Vec<Rectangle>,
}

impl RectangleStore {
    pub fn new() -> Self {
        Self {
            rectangles: Vec::new(),
        }
    }

    pub fn create(&mut self, spec: RectangleSpec) -> Rectangle {
        let rectangle = Rectangle {
            id: uuid::Uuid::new_v4(),
            x: spec.x,
            y: spec.y,
            width: spec.width,
            height: spec.height,
            fill: spec.fill,
            created_by: None,
            created_at: epoch_millis(),
        };
        self.rectangles.push(rectangle.clone());
        rectangle
    }

    pub fn insert(&mut self, rectangle: Rectangle) -> bool {
        if self.contains(&rectangle.id) {
            return false;
        }
        self.rectangles.push(rectangle);
        true
    }

    pub fn move_to(&mut self, id: &RectangleId, x: f64, y: f64) -> bool {
        if let Some(rectangle) = self.rectangles.iter_mut().find(|r| &r.id == id) {
            rectangle.x = x;
            rectangle.y = y;
            true
        } else {
            false
        }
    }

    pub fn remove(&mut self, id: &RectangleId) -> bool {
        let before = self.rectangles.len();
        self.rectangles.retain(|r| &r.id != id);
        self.rectangles.len() < before
    }

    pub fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Rectangle) -> bool,
    {
        let before = self.rectangles.len();
        self.rectangles.retain(|r| !predicate(r));
        before - self.rectangles.len()
    }

    pub fn replace_all(&mut self, rectangles: Vec<Rectangle>) {
        self.rectangles = rectangles;
    }

    pub fn get(&self, id: &RectangleId) -> Option<&Rectangle> {
        self.rectangles.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RectangleId) -> bool {
        self.rectangles.iter().any(|r| &r.id == id)
    }

    pub fn snapshot(&self) -> Vec<Rectangle> {
        self.rectangles.clone()
    }

    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rectangles
    }

    pub fn len(&self) -> usize {
        self.rectangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty()
    }
}
