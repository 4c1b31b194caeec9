//! Integer screen geometry.
//!
//! Coordinates follow the usual GUI convention: origin at the top-left, `x`
//! grows to the right and `y` grows downwards.  The same [`Point`] type is
//! used for surface-local, element-local, and global coordinates; which space
//! a value lives in is stated by the field or parameter that carries it.

use std::fmt;
use std::ops::{Add, Sub};

/// A pixel position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle; `origin` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub origin: Point,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }

    /// Returns `true` if `p` lies inside the rectangle.
    ///
    /// The left/top edges are inclusive and the right/bottom edges exclusive,
    /// so adjacent rectangles never both contain the same point.
    pub fn contains(&self, p: Point) -> bool {
        let dx = i64::from(p.x) - i64::from(self.origin.x);
        let dy = i64::from(p.y) - i64::from(self.origin.y);
        dx >= 0 && dy >= 0 && dx < i64::from(self.width) && dy < i64::from(self.height)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
