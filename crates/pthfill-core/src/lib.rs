//! # pthfill Core
//!
//! Core types and error handling for pthfill.
//! Provides the geometry value types shared by the drill, outline and
//! G-Code stages, and the unified error type they report through.

pub mod data;
pub mod error;
pub mod units;

pub use data::{round_to, BoundingBox, Point2D, Position, ToolPose};
pub use error::{DrillError, Error, GcodeError, GeometryError, Result, StructureError};
pub use units::{MeasurementSystem, MM_PER_INCH};
