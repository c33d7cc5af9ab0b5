//! Board outline extraction
//!
//! Reads the board-edge drawing exported by the PCB tool (SVG) and reduces
//! it to a single bounding box. Path data is parsed with `svgtypes`, which
//! turns relative commands, shorthand curves and arcs into absolute lines and
//! Bézier segments. Curve extents are taken from the exact segment bounds
//! rather than from the control points.
//!
//! Basic shapes (`rect`, `circle`, `ellipse`, `line`, `polyline`,
//! `polygon`) count as primitives as well. Transforms are not applied.

use std::str::FromStr;

use lyon::geom::{point, CubicBezierSegment, QuadraticBezierSegment};
use roxmltree::{Document, Node};
use svgtypes::{Length, PointsParser, SimplePathSegment, SimplifyingPathParser};

use pthfill_core::{BoundingBox, GeometryError, Point2D};

/// Bounding box of every primitive in a board outline drawing
#[derive(Debug, Clone, PartialEq)]
pub struct BoardOutline {
    /// Union of all primitive bounds
    pub bounds: BoundingBox,
    /// Number of primitives that contributed
    pub primitives: usize,
}

impl BoardOutline {
    /// Parse an SVG document
    ///
    /// # Errors
    /// `ParseError` if the XML or any path data is malformed,
    /// `EmptyDrawing` if no primitive is found.
    pub fn parse(svg: &str) -> Result<Self, GeometryError> {
        let doc = Document::parse(svg).map_err(|err| GeometryError::ParseError {
            reason: err.to_string(),
        })?;

        let mut bounds: Option<BoundingBox> = None;
        let mut primitives = 0;

        for node in doc.descendants().filter(|n| n.is_element()) {
            if let Some(shape) = primitive_bounds(&node)? {
                bounds = Some(match bounds {
                    Some(b) => b.union(&shape),
                    None => shape,
                });
                primitives += 1;
            }
        }

        let bounds = bounds.ok_or(GeometryError::EmptyDrawing)?;
        tracing::debug!(
            "Board outline: {} primitives, {:.3} x {:.3}",
            primitives,
            bounds.width(),
            bounds.height()
        );

        Ok(Self { bounds, primitives })
    }

    /// Center of the outline bounding box
    pub fn center(&self) -> Point2D {
        self.bounds.center()
    }
}

/// Center of the union bounding box of all primitives in an SVG drawing
pub fn board_outline_center(svg: &str) -> Result<Point2D, GeometryError> {
    BoardOutline::parse(svg).map(|outline| outline.center())
}

fn primitive_bounds(node: &Node) -> Result<Option<BoundingBox>, GeometryError> {
    let tag = node.tag_name().name();
    match tag {
        "path" => match node.attribute("d") {
            Some(data) => path_bounds(data),
            None => Ok(None),
        },
        "rect" => {
            let x = length(node, "x")?;
            let y = length(node, "y")?;
            let width = length(node, "width")?;
            let height = length(node, "height")?;
            Ok(BoundingBox::from_points([
                Point2D::new(x, y),
                Point2D::new(x + width, y + height),
            ]))
        }
        "circle" => {
            let cx = length(node, "cx")?;
            let cy = length(node, "cy")?;
            let r = length(node, "r")?;
            Ok(ellipse_bounds(cx, cy, r, r))
        }
        "ellipse" => {
            let cx = length(node, "cx")?;
            let cy = length(node, "cy")?;
            let rx = length(node, "rx")?;
            let ry = length(node, "ry")?;
            Ok(ellipse_bounds(cx, cy, rx, ry))
        }
        "line" => Ok(BoundingBox::from_points([
            Point2D::new(length(node, "x1")?, length(node, "y1")?),
            Point2D::new(length(node, "x2")?, length(node, "y2")?),
        ])),
        "polyline" | "polygon" => Ok(node.attribute("points").and_then(|points| {
            BoundingBox::from_points(PointsParser::from(points).map(|(x, y)| Point2D::new(x, y)))
        })),
        _ => Ok(None),
    }
}

fn ellipse_bounds(cx: f64, cy: f64, rx: f64, ry: f64) -> Option<BoundingBox> {
    BoundingBox::from_points([
        Point2D::new(cx - rx, cy - ry),
        Point2D::new(cx + rx, cy + ry),
    ])
}

/// Bounds of a path's geometry; `None` when the data draws nothing
fn path_bounds(data: &str) -> Result<Option<BoundingBox>, GeometryError> {
    let mut bounds: Option<BoundingBox> = None;
    let mut current = Point2D::new(0.0, 0.0);
    let mut subpath_start = current;

    let include = |bounds: &mut Option<BoundingBox>, p: Point2D| {
        *bounds = Some(match bounds {
            Some(b) => b.including(p),
            None => BoundingBox::from_point(p),
        });
    };

    for segment in SimplifyingPathParser::from(data) {
        let segment = segment.map_err(|err| GeometryError::ParseError {
            reason: format!("invalid path data: {}", err),
        })?;

        match segment {
            // A move alone draws nothing; its point counts once a segment
            // starts there.
            SimplePathSegment::MoveTo { x, y } => {
                current = Point2D::new(x, y);
                subpath_start = current;
            }
            SimplePathSegment::LineTo { x, y } => {
                include(&mut bounds, current);
                current = Point2D::new(x, y);
                include(&mut bounds, current);
            }
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                let curve = QuadraticBezierSegment {
                    from: point(current.x, current.y),
                    ctrl: point(x1, y1),
                    to: point(x, y),
                };
                let extent = curve.bounding_box();
                include(&mut bounds, Point2D::new(extent.min.x, extent.min.y));
                include(&mut bounds, Point2D::new(extent.max.x, extent.max.y));
                current = Point2D::new(x, y);
            }
            SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let curve = CubicBezierSegment {
                    from: point(current.x, current.y),
                    ctrl1: point(x1, y1),
                    ctrl2: point(x2, y2),
                    to: point(x, y),
                };
                let extent = curve.bounding_box();
                include(&mut bounds, Point2D::new(extent.min.x, extent.min.y));
                include(&mut bounds, Point2D::new(extent.max.x, extent.max.y));
                current = Point2D::new(x, y);
            }
            SimplePathSegment::ClosePath => {
                current = subpath_start;
            }
        }
    }

    Ok(bounds)
}

/// Numeric attribute, `0` when absent; units are ignored
fn length(node: &Node, name: &str) -> Result<f64, GeometryError> {
    match node.attribute(name) {
        Some(value) => Length::from_str(value)
            .map(|len| len.number)
            .map_err(|err| GeometryError::ParseError {
                reason: format!(
                    "invalid '{}' on <{}>: {}",
                    name,
                    node.tag_name().name(),
                    err
                ),
            }),
        None => Ok(0.0),
    }
}
