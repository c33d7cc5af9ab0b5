//! # pthfill
//!
//! Patches a slicer's G-Code for a 3D printed circuit board so that the
//! plated through-holes are filled with conductive filament during the
//! filament change pause.
//!
//! ## Architecture
//!
//! pthfill is organized as a workspace with multiple crates:
//!
//! 1. **pthfill-core** - Geometry value types and errors
//! 2. **pthfill-gcode** - G-Code tokenizing, indexing, splicing and file I/O
//! 3. **pthfill-camtools** - Board outline, drill records, alignment, fill generation
//! 4. **pthfill-settings** - Run configuration
//! 5. **pthfill** - Command line binary that drives the pipeline

pub use pthfill_camtools::{
    board_outline_center, holes_for_tool, object_footprint_center, Alignment, HoleFillInjector,
    HoleFillParameters, HoleFillSynthesizer, InjectionPlan, InsertionPoint,
};
pub use pthfill_core::{
    BoundingBox, DrillError, Error, GcodeError, GeometryError, Point2D, Position, Result,
    StructureError, ToolPose,
};
pub use pthfill_gcode::{read_program, render, splice, write_program, GcodeProgram};
pub use pthfill_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output to stderr, so stdout only carries the run report
/// - RUST_LOG environment variable support (default `info`)
/// - JSON lines instead of human readable output when `json` is set
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
