//! Geometry data models
//!
//! Plain value types shared by every stage of the pipeline. All lengths
//! are millimeters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StructureError;

/// A point in the XY plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate this point by an offset
    pub fn translated(&self, offset: Point2D) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    /// Round both coordinates to a number of decimal places
    pub fn rounded(&self, decimals: u32) -> Self {
        Self::new(round_to(self.x, decimals), round_to(self.y, decimals))
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Round a value to a number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Axis-aligned bounding box
///
/// Only ever built from at least one point, so an existing box is never
/// inverted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum X
    pub min_x: f64,
    /// Minimum Y
    pub min_y: f64,
    /// Maximum X
    pub max_x: f64,
    /// Maximum Y
    pub max_y: f64,
}

impl BoundingBox {
    /// Degenerate box containing a single point
    pub fn from_point(point: Point2D) -> Self {
        Self {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x,
            max_y: point.y,
        }
    }

    /// Bounding box of a set of points, `None` when the set is empty
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2D>,
    {
        points.into_iter().fold(None, |bbox, point| {
            Some(match bbox {
                None => Self::from_point(point),
                Some(b) => b.including(point),
            })
        })
    }

    /// Grow the box to include a point
    pub fn including(&self, point: Point2D) -> Self {
        Self {
            min_x: self.min_x.min(point.x),
            min_y: self.min_y.min(point.y),
            max_x: self.max_x.max(point.x),
            max_y: self.max_y.max(point.y),
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Midpoint of the extremes
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Width of the box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A fully known tool position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
}

impl Position {
    /// Create a new position with X, Y, Z coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{:.3} Y{:.3} Z{:.3}", self.x, self.y, self.z)
    }
}

/// Last known tool position
///
/// Each axis stays `None` until a motion instruction supplies it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolPose {
    /// X-axis position (if known)
    pub x: Option<f64>,
    /// Y-axis position (if known)
    pub y: Option<f64>,
    /// Z-axis position (if known)
    pub z: Option<f64>,
}

impl ToolPose {
    /// Create a new pose with no known axes
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite each axis that the update carries
    pub fn apply(&mut self, update: &ToolPose) {
        if update.x.is_some() {
            self.x = update.x;
        }
        if update.y.is_some() {
            self.y = update.y;
        }
        if update.z.is_some() {
            self.z = update.z;
        }
    }

    /// Check whether the pose carries no axis at all
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }

    /// Resolve to a full position, naming the first missing axis otherwise
    ///
    /// `line_number` is the line the pose was taken at and is only used for
    /// the error.
    pub fn resolve(&self, line_number: usize) -> Result<Position, StructureError> {
        let axis = |value: Option<f64>, axis: char| {
            value.ok_or(StructureError::UnknownPosition { axis, line_number })
        };
        Ok(Position::new(
            axis(self.x, 'X')?,
            axis(self.y, 'Y')?,
            axis(self.z, 'Z')?,
        ))
    }
}
