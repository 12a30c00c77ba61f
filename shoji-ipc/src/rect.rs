use serde::{Deserialize, Serialize};

use crate::Inset;

/// Screen-space rectangle in native (left, top, right, bottom) form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    /// Shrinks the rectangle by `inset` on each edge.
    pub fn inset(&self, inset: &Inset) -> Self {
        Self {
            left: self.left + inset.left,
            top: self.top + inset.top,
            right: self.right - inset.right,
            bottom: self.bottom - inset.bottom,
        }
    }

    /// Rectangles that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.left >= other.right
            || self.top >= other.bottom
            || self.right <= other.left
            || self.bottom <= other.top)
    }

    pub fn overlap_area(&self, other: &Rect) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let width = self.right.min(other.right) - self.left.max(other.left);
        let height = self.bottom.min(other.bottom) - self.top.max(other.top);
        width as i64 * height as i64
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} @ ({}, {})",
            self.width(),
            self.height(),
            self.left,
            self.top
        )
    }
}
