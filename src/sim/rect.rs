//! Axis-aligned rectangle geometry
//!
//! Everything in the tile world collides as an AABB. Edges follow screen
//! convention: y grows downward, so `top < bottom`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0, "rect size must be non-negative");
        Self { x, y, width, height }
    }

    /// Build from a top-left position and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos() + self.size() / 2.0
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Move so the left edge lands on `value`
    pub fn set_left(&mut self, value: f32) {
        self.x = value;
    }

    /// Move so the right edge lands on `value`
    pub fn set_right(&mut self, value: f32) {
        self.x = value - self.width;
    }

    /// Move so the top edge lands on `value`
    pub fn set_top(&mut self, value: f32) {
        self.y = value;
    }

    /// Move so the bottom edge lands on `value`
    pub fn set_bottom(&mut self, value: f32) {
        self.y = value - self.height;
    }

    /// Inclusive point test (points on an edge are inside)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Open-interval overlap test.
    ///
    /// Rects that only share an edge do not intersect. The collision resolver
    /// relies on this: an entity snapped flush against a wall must not be
    /// reported as colliding with it again.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}
