//! Integer pixel geometry.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Point in pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Point {
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
}

impl Point {
    /// Origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a new point.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Shifts the point by `offset`.
    pub fn offset(&mut self, offset: Point) {
        self.x += offset.x;
        self.y += offset.y;
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Size in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Size {
    width: i64,
    height: i64,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// Width.
    pub fn width(&self) -> i64 {
        self.width
    }

    /// Height.
    pub fn height(&self) -> i64 {
        self.height
    }

    /// Half of the width, rounded towards zero.
    pub fn half_width(&self) -> i64 {
        self.width / 2
    }

    /// Half of the height, rounded towards zero.
    pub fn half_height(&self) -> i64 {
        self.height / 2
    }

    /// Returns true if either dimension is zero.
    pub fn is_zero(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis aligned pixel rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent.
    pub size: Size,
}

impl Rect {
    /// Creates a new rectangle.
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Right edge, exclusive.
    pub fn right(&self) -> i64 {
        self.origin.x + self.size.width()
    }

    /// Bottom edge, exclusive.
    pub fn bottom(&self) -> i64 {
        self.origin.y + self.size.height()
    }

    /// Returns true if the rectangles overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.origin.x < other.right()
            && other.origin.x < self.right()
            && self.origin.y < other.bottom()
            && other.origin.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_intersection() {
        let a = Rect::new(Point::new(0, 0), Size::new(256, 256));
        let b = Rect::new(Point::new(255, 255), Size::new(256, 256));
        let c = Rect::new(Point::new(256, 0), Size::new(256, 256));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(Rect::new(Point::new(255, 0), Size::new(2, 2)).intersects(&a));
    }

    #[test]
    fn point_arithmetic() {
        let mut p = Point::new(3, 4);
        p.offset(Point::new(-1, 1));
        assert_eq!(p, Point::new(2, 5));
        assert_eq!(p - Point::new(2, 5), Point::ZERO);
    }
}
