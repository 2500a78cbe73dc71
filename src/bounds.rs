/*
 * Bounds Module
 *
 * Axis-aligned rectangles in arena space and the `ScreenBounds` provider the
 * host implements. Arena space has its origin at the top-left corner with y
 * growing downwards.
 */

use crate::vector::Vector;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    // Rectangle anchored at the origin
    pub const fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vector {
        Vector::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    // Inclusive on the min edges, exclusive on the max edges
    #[inline]
    pub fn contains(&self, point: &Vector) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn intersects_circle(&self, center: &Vector, radius: f32) -> bool {
        let dx = center.x - center.x.clamp(self.x, self.right());
        let dy = center.y - center.y.clamp(self.y, self.bottom());
        dx * dx + dy * dy <= radius * radius
    }

    // Split into top-left, top-right, bottom-left, bottom-right
    pub fn quadrants(&self) -> [Rect; 4] {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        [
            Rect::new(self.x, self.y, half_w, half_h),
            Rect::new(self.x + half_w, self.y, half_w, half_h),
            Rect::new(self.x, self.y + half_h, half_w, half_h),
            Rect::new(self.x + half_w, self.y + half_h, half_w, half_h),
        ]
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.width.is_finite() || !self.height.is_finite()
    }
}

// Source of the current arena size, read once per frame
pub trait ScreenBounds {
    fn bounds(&self) -> Rect;
}

// A fixed arena
impl ScreenBounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}
