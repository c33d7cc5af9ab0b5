//! Tokenized instruction stream with its structural index
//!
//! [`GcodeProgram::parse`] reads the stream once: every line is tokenized,
//! kept verbatim, and fed to the [`StreamIndexer`] in the same pass.

use pthfill_core::{GcodeError, ToolPose};

use super::index::{self, Section, StreamIndexer, ToolChange};
use super::{GcodeParser, Instruction, InstructionKind};

/// An indexed G-Code program
#[derive(Debug, Clone)]
pub struct GcodeProgram {
    instructions: Vec<Instruction>,
    sections: Vec<Section>,
    tool_changes: Vec<ToolChange>,
}

impl GcodeProgram {
    /// Tokenize and index a complete program text
    pub fn parse(text: &str) -> Result<Self, GcodeError> {
        let parser = GcodeParser::new();
        let mut indexer = StreamIndexer::new();
        let mut instructions = Vec::new();

        for (index, raw) in text.split_inclusive('\n').enumerate() {
            let instruction = parser.parse_line(index, raw)?;
            indexer.observe(&instruction);
            instructions.push(instruction);
        }

        let (sections, tool_changes) = indexer.finish();
        tracing::debug!(
            "Indexed {} lines: {} sections, {} tool changes",
            instructions.len(),
            sections.len(),
            tool_changes.len()
        );

        Ok(Self {
            instructions,
            sections,
            tool_changes,
        })
    }

    /// All instructions in stream order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the program has no lines
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Line at an index
    pub fn line(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Named sections in start order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Tool changes in stream order
    pub fn tool_changes(&self) -> &[ToolChange] {
        &self.tool_changes
    }

    /// First section with `name` starting strictly after `line`
    pub fn find_section_after(&self, name: &str, line: usize) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.name == name && section.start_line > line)
    }

    /// Last known pose over lines `0..=through`
    pub fn last_pose(&self, through: usize) -> ToolPose {
        index::last_pose(self.prefix(through))
    }

    /// Last hotend setpoint for `tool` over lines `0..=through`
    pub fn last_hotend_temperature(&self, through: usize, tool: u32) -> Option<f64> {
        index::last_hotend_temperature(self.prefix(through), tool)
    }

    /// Every `; key = value` line with the given key, as (line, value)
    pub fn settings<'a>(&'a self, key: &'a str) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        self.instructions
            .iter()
            .filter_map(move |instruction| match &instruction.kind {
                InstructionKind::Setting { key: k, value } if k == key => {
                    Some((instruction.index, value.as_str()))
                }
                _ => None,
            })
    }

    fn prefix(&self, through: usize) -> &[Instruction] {
        let end = through.saturating_add(1).min(self.instructions.len());
        &self.instructions[..end]
    }
}
