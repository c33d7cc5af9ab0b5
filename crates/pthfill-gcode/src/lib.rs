//! # pthfill G-Code
//!
//! Reading, indexing and splicing of slicer-produced G-Code.
//!
//! A program is read once into a [`GcodeProgram`]: each line is kept
//! verbatim and tokenized into an [`InstructionKind`], and sections and tool
//! changes are indexed in the same pass. Generated commands are then spliced
//! in with [`splice`], leaving every other line byte-for-byte intact.

pub mod gcode;
pub mod utils;

pub use gcode::{
    last_hotend_temperature, last_pose, render, sections, splice, splice_lines, tool_changes,
    GcodeParser, GcodeProgram, Instruction, InstructionKind, MotionMode, Section, StreamIndexer,
    ToolChange, HEADER_SECTION,
};
pub use utils::{read_program, write_program};
