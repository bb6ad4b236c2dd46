//! Plot input primitives: ellipses and segment-decomposed polygons.
//!
//! Polygons arrive already decomposed into ordered segments. Straight
//! segments carry only their end point; arc segments additionally carry the
//! precomputed center and the signed sweep angle (negative = clockwise).
//! The export engine does no geometric construction of its own.

use serde::{Deserialize, Serialize};

use crate::point::Point;
use crate::units::{Angle, Length};

/// One segment of a polygon path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathSegment {
    /// Straight segment to `end`.
    Line { end: Point },
    /// Circular arc to `end` around `center`, sweeping by `sweep`.
    Arc {
        end: Point,
        center: Point,
        sweep: Angle,
    },
}

impl PathSegment {
    pub fn end(&self) -> Point {
        match self {
            PathSegment::Line { end } => *end,
            PathSegment::Arc { end, .. } => *end,
        }
    }
}

/// An ordered polygon path with a stroke width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    pub start: Point,
    pub segments: Vec<PathSegment>,
    pub line_width: Length,
}

impl Polygon {
    pub fn new(start: Point, line_width: Length) -> Self {
        Polygon {
            start,
            segments: Vec::new(),
            line_width,
        }
    }

    /// Appends a straight segment.
    pub fn line_to(mut self, end: Point) -> Self {
        self.segments.push(PathSegment::Line { end });
        self
    }

    /// Appends an arc segment with a precomputed center.
    pub fn arc_to(mut self, end: Point, center: Point, sweep: Angle) -> Self {
        self.segments.push(PathSegment::Arc { end, center, sweep });
        self
    }

    /// The point where segment `index` begins.
    pub fn segment_start(&self, index: usize) -> Point {
        if index == 0 {
            self.start
        } else {
            self.segments[index - 1].end()
        }
    }

    /// The end of the last segment, or the start point for an empty path.
    pub fn end_pos(&self) -> Point {
        self.segments.last().map_or(self.start, PathSegment::end)
    }

    /// True when the traversal returns to the start point.
    pub fn is_closed(&self) -> bool {
        self.end_pos() == self.start
    }
}

/// An axis-aligned ellipse with a stroke width.
///
/// Only circular ellipses (equal radii) can be exported; the generator
/// checks [`Ellipse::is_circular`] and drops the rest with a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point,
    pub radius_x: Length,
    pub radius_y: Length,
    pub line_width: Length,
}

impl Ellipse {
    pub fn new(center: Point, radius_x: Length, radius_y: Length, line_width: Length) -> Self {
        Ellipse {
            center,
            radius_x,
            radius_y,
            line_width,
        }
    }

    /// Convenience constructor for a true circle.
    pub fn circle(center: Point, radius: Length, line_width: Length) -> Self {
        Self::new(center, radius, radius, line_width)
    }

    pub fn is_circular(&self) -> bool {
        self.radius_x == self.radius_y
    }
}
