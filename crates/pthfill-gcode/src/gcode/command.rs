//! G-Code instruction types
//!
//! Every line of the stream becomes an [`Instruction`]: the exact raw text,
//! its position, and the shape the tokenizer recognized. Lines the tokenizer
//! does not recognize are kept as [`InstructionKind::Other`] and are never
//! interpreted.

use serde::{Deserialize, Serialize};
use std::fmt;

use pthfill_core::ToolPose;

/// Motion command family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionMode {
    /// G0 rapid positioning
    Rapid,
    /// G1 linear interpolation
    Linear,
    /// G2 clockwise arc
    ArcCw,
    /// G3 counter-clockwise arc
    ArcCcw,
}

impl MotionMode {
    /// Map a G number to a motion mode
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Rapid),
            1 => Some(Self::Linear),
            2 => Some(Self::ArcCw),
            3 => Some(Self::ArcCcw),
            _ => None,
        }
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rapid => write!(f, "G0"),
            Self::Linear => write!(f, "G1"),
            Self::ArcCw => write!(f, "G2"),
            Self::ArcCcw => write!(f, "G3"),
        }
    }
}

/// Recognized instruction shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// G0-G3 move; carries whichever of X/Y/Z the line sets
    Motion {
        /// Motion family
        mode: MotionMode,
        /// Axis values set by this move
        target: ToolPose,
    },
    /// `T<n>` tool select
    ToolSelect {
        /// Selected tool number
        tool: u32,
    },
    /// `M104`/`M109` hotend temperature setpoint
    TemperatureSet {
        /// Target temperature in degrees Celsius
        celsius: f64,
        /// Extruder named by a `T` word; `None` means the active one
        tool: Option<u32>,
        /// True for M109 (wait for temperature)
        wait: bool,
    },
    /// `;TYPE:<name>` process-phase marker
    SectionMarker {
        /// Phase name
        name: String,
    },
    /// `; key = value` slicer setting or metadata comment
    Setting {
        /// Setting key
        key: String,
        /// Raw value text, trimmed
        value: String,
    },
    /// Any other comment-only line
    Comment,
    /// Anything else, passed through untouched
    Other,
}

/// A single line of the instruction stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Zero-based line index in the stream
    pub index: usize,
    /// Exact line text including its terminator, if it had one
    pub raw: String,
    /// Recognized shape
    pub kind: InstructionKind,
}

impl Instruction {
    /// Line text without the trailing line terminator
    pub fn text(&self) -> &str {
        self.raw.trim_end_matches(['\n', '\r'])
    }

    /// Whether the raw text ends with a newline
    pub fn is_terminated(&self) -> bool {
        self.raw.ends_with('\n')
    }
}
