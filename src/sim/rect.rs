//! Axis-aligned rectangle geometry for sprites and hitboxes
//!
//! All playfield objects are boxes in screen pixels (y grows downward).
//! Hitboxes are derived from visual bounds by insetting or outsetting
//! around the centre.

use glam::Vec2;

/// An axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centred on a point
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Move so the right edge sits at `x`
    pub fn set_right(&mut self, x: f32) {
        self.x = x - self.w;
    }

    /// Move so the horizontal centre sits at `x`
    pub fn set_center_x(&mut self, x: f32) {
        self.x = x - self.w / 2.0;
    }

    /// Grow (positive) or shrink (negative) by `dw`/`dh` keeping the centre
    pub fn inflate(&self, dw: f32, dh: f32) -> Self {
        Self::new(self.x - dw / 2.0, self.y - dh / 2.0, self.w + dw, self.h + dh)
    }

    /// Strict overlap test; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inflate_keeps_center() {
        let r = Rect::new(10.0, 20.0, 36.0, 36.0);
        let hb = r.inflate(-22.0, -22.0);
        assert_eq!(hb.w, 14.0);
        assert_eq!(hb.h, 14.0);
        assert_eq!(hb.center(), r.center());
    }

    #[test]
    fn test_overlap_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_set_right_and_center() {
        let mut r = Rect::new(0.0, 0.0, 40.0, 10.0);
        r.set_right(100.0);
        assert_eq!(r.x, 60.0);
        r.set_center_x(50.0);
        assert_eq!(r.x, 30.0);
        assert_eq!(r.center_x(), 50.0);
    }
}
