//! # GerberKit Geometry
//!
//! Exact integer geometry value types consumed by the export engine.
//!
//! Gerber files are a manufacturing contract: a coordinate that drifts by a
//! single nanometer changes the produced artwork. All types here therefore
//! store fixed-point integers (`i64` nanometers for lengths, `i64`
//! microdegrees for angles) and all arithmetic is exact integer arithmetic.

pub mod path;
pub mod point;
pub mod units;

pub use path::{Ellipse, PathSegment, Polygon};
pub use point::Point;
pub use units::{Angle, Length};
