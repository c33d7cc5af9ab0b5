//! Drill-to-slicer coordinate alignment
//!
//! The slicer records the footprint of every placed object in an
//! `objects_info` metadata comment. Its center, together with the center of
//! the board outline, fixes the translation from drill coordinates into
//! printer coordinates.

use serde::{Deserialize, Serialize};

use pthfill_core::{BoundingBox, GeometryError, Point2D};
use pthfill_gcode::GcodeProgram;

/// Metadata key holding the object footprints
pub const OBJECTS_INFO_KEY: &str = "objects_info";

/// Payload of the `objects_info` metadata line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectsInfo {
    /// Placed objects
    pub objects: Vec<ObjectFootprint>,
}

/// One placed object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectFootprint {
    /// Footprint outline as `[x, y]` pairs
    pub polygon: Vec<[f64; 2]>,
}

/// Center of the union of every object footprint in the program
///
/// All `objects_info` lines contribute.
pub fn object_footprint_center(program: &GcodeProgram) -> Result<Point2D, GeometryError> {
    let mut bounds: Option<BoundingBox> = None;
    let mut found = 0usize;

    for (line_number, value) in program.settings(OBJECTS_INFO_KEY) {
        found += 1;
        let info: ObjectsInfo =
            serde_json::from_str(value).map_err(|err| GeometryError::MalformedMetadata {
                line_number,
                reason: err.to_string(),
            })?;

        let points = info
            .objects
            .iter()
            .flat_map(|object| object.polygon.iter())
            .map(|&[x, y]| Point2D::new(x, y));

        if let Some(footprint) = BoundingBox::from_points(points) {
            bounds = Some(match bounds {
                Some(b) => b.union(&footprint),
                None => footprint,
            });
        }
    }

    if found == 0 {
        return Err(GeometryError::MissingMetadata {
            key: OBJECTS_INFO_KEY.to_string(),
        });
    }
    if found > 1 {
        tracing::warn!("Found {} {} lines, using all of them", found, OBJECTS_INFO_KEY);
    }

    let bounds = bounds.ok_or_else(|| GeometryError::MalformedMetadata {
        line_number: program
            .settings(OBJECTS_INFO_KEY)
            .map(|(line, _)| line)
            .next()
            .unwrap_or(0),
        reason: "no polygon points".to_string(),
    })?;

    Ok(bounds.center())
}

/// Translation from drill space into printer space
///
/// The drawing's Y axis points down while the printer's points up, which the
/// `2 * design_center.y` term accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Board outline center
    pub design_center: Point2D,
    /// Slicer footprint center
    pub slicer_center: Point2D,
    /// Rounding applied to aligned coordinates
    pub decimals: u32,
}

impl Alignment {
    /// Create an alignment between two centers
    pub fn new(design_center: Point2D, slicer_center: Point2D, decimals: u32) -> Self {
        Self {
            design_center,
            slicer_center,
            decimals,
        }
    }

    /// Center difference (slicer minus design)
    pub fn delta(&self) -> Point2D {
        Point2D::new(
            self.slicer_center.x - self.design_center.x,
            self.slicer_center.y - self.design_center.y,
        )
    }

    /// Map one drill hole into printer coordinates
    pub fn apply(&self, hole: Point2D) -> Point2D {
        let delta = self.delta();
        Point2D::new(
            hole.x + delta.x,
            hole.y + delta.y + 2.0 * self.design_center.y,
        )
        .rounded(self.decimals)
    }
}

/// Map every hole, keeping order
pub fn align_holes(holes: &[Point2D], alignment: &Alignment) -> Vec<Point2D> {
    holes.iter().map(|&hole| alignment.apply(hole)).collect()
}
