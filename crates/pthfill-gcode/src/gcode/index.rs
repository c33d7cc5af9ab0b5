//! Structural index of an instruction stream
//!
//! Sections, tool changes and tool positions are all derived from the
//! tokenized [`Instruction`]s, never from raw string prefixes.

use serde::{Deserialize, Serialize};

use pthfill_core::ToolPose;

use super::{Instruction, InstructionKind};

/// Name of the implicit section before the first phase marker
pub const HEADER_SECTION: &str = "Header";

/// A contiguous run of lines sharing a process phase
///
/// `end_line` is the marker line that opens the next section, or the last
/// line index of the stream for the final section. The marker line itself
/// belongs to neither section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Phase name read from the marker
    pub name: String,
    /// First content line
    pub start_line: usize,
    /// End line (see type docs)
    pub end_line: usize,
}

/// A tool select instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolChange {
    /// Zero-based line index
    pub line_index: usize,
    /// Instruction text without terminator
    pub raw: String,
    /// Selected tool number
    pub tool: u32,
}

/// Incremental builder for sections and tool changes
///
/// Fed one instruction at a time so the index can be built in the same pass
/// that reads the stream.
#[derive(Debug)]
pub struct StreamIndexer {
    sections: Vec<Section>,
    tool_changes: Vec<ToolChange>,
    current_name: String,
    current_start: usize,
    last_index: Option<usize>,
}

impl Default for StreamIndexer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamIndexer {
    /// Create an indexer positioned before the first line
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            tool_changes: Vec::new(),
            current_name: HEADER_SECTION.to_string(),
            current_start: 0,
            last_index: None,
        }
    }

    /// Record one instruction; instructions must arrive in stream order
    pub fn observe(&mut self, instruction: &Instruction) {
        match &instruction.kind {
            InstructionKind::SectionMarker { name } => {
                let name = std::mem::replace(&mut self.current_name, name.clone());
                self.sections.push(Section {
                    name,
                    start_line: self.current_start,
                    end_line: instruction.index,
                });
                self.current_start = instruction.index + 1;
            }
            InstructionKind::ToolSelect { tool } => {
                self.tool_changes.push(ToolChange {
                    line_index: instruction.index,
                    raw: instruction.text().to_string(),
                    tool: *tool,
                });
            }
            _ => {}
        }
        self.last_index = Some(instruction.index);
    }

    /// Close the final section and return (sections, tool changes)
    pub fn finish(mut self) -> (Vec<Section>, Vec<ToolChange>) {
        self.sections.push(Section {
            name: self.current_name,
            start_line: self.current_start,
            end_line: self.last_index.unwrap_or(0),
        });
        (self.sections, self.tool_changes)
    }
}

/// Split a stream into its named sections
pub fn sections(lines: &[Instruction]) -> Vec<Section> {
    let mut indexer = StreamIndexer::new();
    lines.iter().for_each(|line| indexer.observe(line));
    indexer.finish().0
}

/// All tool select instructions, in stream order
pub fn tool_changes(lines: &[Instruction]) -> Vec<ToolChange> {
    let mut indexer = StreamIndexer::new();
    lines.iter().for_each(|line| indexer.observe(line));
    indexer.finish().1
}

/// Last known X/Y/Z over a stream prefix
///
/// Each axis is overwritten independently by every motion instruction that
/// carries it.
pub fn last_pose(lines: &[Instruction]) -> ToolPose {
    lines.iter().fold(ToolPose::new(), |mut pose, line| {
        if let InstructionKind::Motion { target, .. } = &line.kind {
            pose.apply(target);
        }
        pose
    })
}

/// Last hotend setpoint (`M104`/`M109`) for `tool` over a stream prefix
///
/// A setpoint applies to the extruder named by its `T` word, else to the
/// tool selected at that point. Setpoints before any tool select, with no
/// `T` word, count for every tool.
pub fn last_hotend_temperature(lines: &[Instruction], tool: u32) -> Option<f64> {
    let mut active: Option<u32> = None;
    let mut found = None;
    for line in lines {
        match line.kind {
            InstructionKind::ToolSelect { tool: selected } => active = Some(selected),
            InstructionKind::TemperatureSet {
                celsius,
                tool: target,
                ..
            } => {
                if target.or(active).is_none_or(|t| t == tool) {
                    found = Some(celsius);
                }
            }
            _ => {}
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcode::GcodeParser;

    fn tokenize(text: &str) -> Vec<Instruction> {
        let parser = GcodeParser::new();
        text.split_inclusive('\n')
            .enumerate()
            .map(|(i, raw)| parser.parse_line(i, raw).unwrap())
            .collect()
    }

    #[test]
    fn test_sections_partition_stream() {
        let lines = tokenize(
            "G28\n;TYPE:Perimeter\nG1 X1\nG1 X2\n;TYPE:Wipe tower\nG1 X3\nM107\n",
        );
        let sections = sections(&lines);

        assert_eq!(
            sections,
            vec![
                Section {
                    name: "Header".to_string(),
                    start_line: 0,
                    end_line: 1
                },
                Section {
                    name: "Perimeter".to_string(),
                    start_line: 2,
                    end_line: 4
                },
                Section {
                    name: "Wipe tower".to_string(),
                    start_line: 5,
                    end_line: 6
                },
            ]
        );
    }

    #[test]
    fn test_sections_without_markers() {
        let lines = tokenize("G28\nG1 X1\n");
        let sections = sections(&lines);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, HEADER_SECTION);
        assert_eq!(sections[0].end_line, 1);
    }

    #[test]
    fn test_tool_changes_in_order() {
        let lines = tokenize("T0\nG1 X1\n; T5 in a comment\nT1\n");
        let changes = tool_changes(&lines);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].line_index, 0);
        assert_eq!(changes[1].line_index, 3);
        assert_eq!(changes[1].raw, "T1");
        assert_eq!(changes[1].tool, 1);
    }

    #[test]
    fn test_last_pose_per_axis() {
        let lines = tokenize("G1 Z0.2\nG1 X10 Y20\nG1 X11 E1\nM104 S200\nG0 Y5\n");
        let pose = last_pose(&lines);
        assert_eq!(pose.x, Some(11.0));
        assert_eq!(pose.y, Some(5.0));
        assert_eq!(pose.z, Some(0.2));

        let prefix = last_pose(&lines[..2]);
        assert_eq!(prefix.x, Some(10.0));
        assert_eq!(prefix.y, Some(20.0));
    }

    #[test]
    fn test_last_pose_unknown_axes() {
        let lines = tokenize("G28\nG1 X1\n");
        let pose = last_pose(&lines);
        assert_eq!(pose.x, Some(1.0));
        assert_eq!(pose.y, None);
        assert_eq!(pose.z, None);
    }

    #[test]
    fn test_last_hotend_temperature() {
        let lines = tokenize("M109 S215\nG1 X1\nM104 S225\nG1 X2\n");
        assert_eq!(last_hotend_temperature(&lines, 0), Some(225.0));
        assert_eq!(last_hotend_temperature(&lines[..2], 0), Some(215.0));
        assert_eq!(last_hotend_temperature(&lines[1..2], 0), None);
    }

    #[test]
    fn test_setpoint_for_idle_tool_is_skipped() {
        let lines = tokenize("T0\nM104 S215\nT1\nM104 S230\nM104 T0 S0\nG1 X1\n");
        assert_eq!(last_hotend_temperature(&lines, 1), Some(230.0));
        assert_eq!(last_hotend_temperature(&lines, 0), Some(0.0));

        // Untagged setpoints follow the tool selected at that point.
        let lines = tokenize("T0\nM104 S200\nT1\nG1 X1\n");
        assert_eq!(last_hotend_temperature(&lines, 1), None);
    }
}
