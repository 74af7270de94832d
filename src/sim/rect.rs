//! Axis-aligned rectangle geometry for every collidable entity
//!
//! Screen convention: x grows right, y grows down, `pos` is the top-left
//! corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn set_left(&mut self, x: f32) {
        self.pos.x = x;
    }

    pub fn set_right(&mut self, x: f32) {
        self.pos.x = x - self.size.x;
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    /// Strict overlap test: rectangles that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Indices of every item in `items` whose rect overlaps `query`, in order
pub fn overlapping<'a, T, F>(query: &Rect, items: &'a [T], rect_of: F) -> Vec<usize>
where
    F: Fn(&'a T) -> Option<&'a Rect>,
{
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| rect_of(item).filter(|r| query.overlaps(r)).map(|_| i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_edge_setters() {
        let mut r = Rect::new(0.0, 0.0, 4.0, 8.0);
        r.set_bottom(20.0);
        assert_eq!(r.top(), 12.0);
        r.set_right(30.0);
        assert_eq!(r.left(), 26.0);
    }

    #[test]
    fn test_overlapping_skips_filtered_items() {
        let query = Rect::new(0.0, 0.0, 10.0, 10.0);
        let items = [
            Some(Rect::new(1.0, 1.0, 2.0, 2.0)),
            None,
            Some(Rect::new(50.0, 50.0, 2.0, 2.0)),
            Some(Rect::new(9.0, 9.0, 2.0, 2.0)),
        ];
        let hits = overlapping(&query, &items, |r| r.as_ref());
        assert_eq!(hits, vec![0, 3]);
    }
}
