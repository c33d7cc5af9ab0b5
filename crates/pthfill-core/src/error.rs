//! Error handling for pthfill
//!
//! Provides error types for every stage of the hole-fill pipeline:
//! - Geometry errors (board outline and footprint metadata)
//! - Drill errors (drill program records)
//! - G-Code errors (instruction tokenizing)
//! - Structure errors (tool changes and purge sections)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised while extracting bounding-box centers from the board outline
/// drawing or from the slicer's object footprint metadata.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The drawing could not be parsed
    #[error("Failed to parse drawing: {reason}")]
    ParseError {
        /// The reason parsing failed.
        reason: String,
    },

    /// The drawing contains no path primitives, so it has no bounding box
    #[error("Drawing contains no path primitives")]
    EmptyDrawing,

    /// No `objects_info` metadata line was found in the G-Code
    #[error("No object footprint metadata ({key}) found in G-Code")]
    MissingMetadata {
        /// The metadata key that was searched for.
        key: String,
    },

    /// The metadata line exists but is not in the expected format
    #[error("Malformed object footprint metadata at line {line_number}: {reason}")]
    MalformedMetadata {
        /// Zero-based line index of the metadata line.
        line_number: usize,
        /// The reason the metadata could not be used.
        reason: String,
    },
}

/// Drill program error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrillError {
    /// A coordinate record is missing a parseable X or Y value
    #[error("Invalid coordinate record at line {line_number}: `{record}` ({reason})")]
    Format {
        /// One-based line number in the drill file.
        line_number: usize,
        /// The offending record.
        record: String,
        /// The reason the record was rejected.
        reason: String,
    },

    /// The requested tool identifier is not of the form `T<n>` or `<n>`
    #[error("Invalid drill tool identifier: {tool}")]
    InvalidTool {
        /// The identifier as given.
        tool: String,
    },
}

/// G-Code error type
///
/// Represents errors while tokenizing the instruction stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// Invalid parameter value on a recognized instruction
    #[error("Invalid parameter '{param}' at line {line_number}: {reason}")]
    InvalidParameter {
        /// Zero-based line index.
        line_number: usize,
        /// The parameter word letter.
        param: char,
        /// The reason the parameter is invalid.
        reason: String,
    },
}

/// Structure error type
///
/// The instruction stream is well-formed G-Code, but it does not have the
/// layout the hole-fill workflow needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// No tool change instruction at all
    #[error("No tool changes found in the input G-Code file")]
    NoToolChanges,

    /// Only a single tool change instruction
    #[error("Only one tool change found in the input G-Code file. At least two tools are required")]
    SingleToolChange,

    /// More tool changes than the workflow supports
    #[error("{found} tool changes found in the input G-Code file. Only {supported} are supported")]
    TooManyToolChanges {
        /// Number of tool changes found.
        found: usize,
        /// Number of tool changes supported.
        supported: usize,
    },

    /// No purge section follows the conductive tool change
    #[error("No '{section}' section found after the tool change at line {after_line}")]
    MissingPurgeSection {
        /// The purge section name searched for.
        section: String,
        /// Zero-based line index of the tool change.
        after_line: usize,
    },

    /// An axis has no known value at the insertion point
    #[error("Tool position on axis {axis} is unknown at line {line_number}")]
    UnknownPosition {
        /// The axis letter.
        axis: char,
        /// Zero-based line index of the insertion point.
        line_number: usize,
    },
}

/// Main error type for pthfill
///
/// A unified error type that can represent any error from the pipeline.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Drill program error
    #[error(transparent)]
    Drill(#[from] DrillError),

    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Structure error
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a structure error
    pub fn is_structure_error(&self) -> bool {
        matches!(self, Error::Structure(_))
    }

    /// Check if this is a format error in one of the input files
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::Drill(DrillError::Format { .. })
                | Error::Gcode(_)
                | Error::Geometry(GeometryError::MalformedMetadata { .. })
                | Error::Geometry(GeometryError::ParseError { .. })
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
