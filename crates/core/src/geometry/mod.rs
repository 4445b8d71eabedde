use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixels. Document-space unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn translate_y(&self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..*self
        }
    }

    /// Shrinks the box by `margin` on every side. A negative margin grows it.
    /// Width and height never go below zero.
    pub fn inset(&self, margin: f32) -> Self {
        let width = (self.width - 2.0 * margin).max(0.0);
        let height = (self.height - 2.0 * margin).max(0.0);
        Self {
            x: self.x + margin,
            y: self.y + margin,
            width,
            height,
        }
    }

    /// Area overlap test. Boxes that only share an edge do not intersect, and
    /// an empty box intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Whether this target box shows inside `root`. Like [`intersects`],
    /// except that a zero-width or zero-height target counts once it lies
    /// inside or on the edge of a non-empty root, so collapsed elements
    /// still trigger.
    ///
    /// [`intersects`]: Rect::intersects
    pub fn is_visible_in(&self, root: &Rect) -> bool {
        if root.is_empty() || self.width < 0.0 || self.height < 0.0 {
            return false;
        }
        if !self.is_empty() {
            return self.intersects(root);
        }
        self.left() <= root.right()
            && root.left() <= self.right()
            && self.top() <= root.bottom()
            && root.top() <= self.bottom()
    }
}

/// The visible scrollable area at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            width,
            height,
        }
    }

    pub fn scrolled_to(self, scroll_y: f32) -> Self {
        Self { scroll_y, ..self }
    }

    /// Viewport bounds in viewport space.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Bounds used for intersection tests after applying the inset margin.
    pub fn intersection_root(&self, margin: f32) -> Rect {
        self.bounds().inset(margin)
    }

    /// Maps a document-space box into viewport space.
    pub fn to_viewport_space(&self, rect: &Rect) -> Rect {
        rect.translate_y(-self.scroll_y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_contact_is_not_an_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(0.0, 100.0, 100.0, 50.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&b.translate_y(-1.0)));
    }

    #[test]
    fn inset_shrinks_on_all_sides() {
        let root = Viewport::new(1000.0, 800.0).intersection_root(100.0);
        assert_eq!(root, Rect::new(100.0, 100.0, 800.0, 600.0));
    }

    #[test]
    fn oversized_inset_collapses_to_empty() {
        let root = Viewport::new(150.0, 150.0).intersection_root(100.0);
        assert!(root.is_empty());
        assert!(!root.intersects(&Rect::new(0.0, 0.0, 150.0, 150.0)));
    }

    #[test]
    fn document_rects_follow_scroll() {
        let viewport = Viewport::new(800.0, 600.0).scrolled_to(250.0);
        let rect = viewport.to_viewport_space(&Rect::new(0.0, 900.0, 10.0, 10.0));
        assert_eq!(rect.top(), 650.0);
    }

    #[test]
    fn zero_area_targets_show_inside_root() {
        let root = Viewport::new(1000.0, 800.0).intersection_root(100.0);
        let divider = Rect::new(200.0, 300.0, 600.0, 0.0);
        assert!(!divider.intersects(&root));
        assert!(divider.is_visible_in(&root));
        assert!(Rect::new(500.0, 700.0, 0.0, 0.0).is_visible_in(&root));
        assert!(!divider.translate_y(500.0).is_visible_in(&root));

        let collapsed = Viewport::new(150.0, 150.0).intersection_root(100.0);
        assert!(!Rect::new(100.0, 100.0, 0.0, 0.0).is_visible_in(&collapsed));
    }
}
