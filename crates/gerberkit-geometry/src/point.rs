//! 2D point in fixed-point nanometer coordinates.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::units::Length;

/// A point in board coordinate space, exact integer nanometers per axis.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Point {
    pub x: Length,
    pub y: Length,
}

impl Point {
    pub const fn new(x: Length, y: Length) -> Self {
        Point { x, y }
    }

    /// Creates a point from nanometer coordinates.
    pub const fn from_nm(x: i64, y: i64) -> Self {
        Point {
            x: Length::from_nm(x),
            y: Length::from_nm(y),
        }
    }

    /// Component-wise absolute value. Used for single-quadrant arc offsets,
    /// where the center offset carries no sign.
    pub const fn abs(self) -> Point {
        Point {
            x: self.x.abs(),
            y: self.y.abs(),
        }
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}
