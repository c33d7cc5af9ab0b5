//! # pthfill CAM Tools
//!
//! Everything between the three input files and the spliced program.
//!
//! ## Tools Included
//!
//! - **Board Outline**: bounding box center of the board-edge SVG drawing
//! - **Excellon**: hole coordinates for one drill tool
//! - **Alignment**: slicer footprint center and the drill-to-printer mapping
//! - **Hole Fill**: the per-hole deposit sequence
//! - **Injector**: insertion point search, planning and splicing

pub mod alignment;
pub mod board_outline;
pub mod excellon;
pub mod hole_fill;
pub mod injector;

pub use alignment::{
    align_holes, object_footprint_center, Alignment, ObjectFootprint, ObjectsInfo,
    OBJECTS_INFO_KEY,
};
pub use board_outline::{board_outline_center, BoardOutline};
pub use excellon::{holes_for_tool, parse_tool_id};
pub use hole_fill::{HoleFillParameters, HoleFillSynthesizer, FILL_TAG};
pub use injector::{locate_insertion, HoleFillInjector, InjectionPlan, InsertionPoint};
