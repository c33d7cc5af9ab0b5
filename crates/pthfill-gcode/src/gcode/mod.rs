//! G-Code tokenizing, indexing and splicing
//!
//! This module provides:
//! - Line tokenizing into a closed set of instruction shapes
//! - A single-pass structural index (sections, tool changes)
//! - Tool position and temperature queries over stream prefixes
//! - Splicing generated commands into an existing stream

pub mod command;
pub mod index;
pub mod parser;
pub mod program;
pub mod splice;

pub use command::*;
pub use index::{
    last_hotend_temperature, last_pose, sections, tool_changes, Section, StreamIndexer,
    ToolChange, HEADER_SECTION,
};
pub use parser::*;
pub use program::GcodeProgram;
pub use splice::{render, splice, splice_lines};
