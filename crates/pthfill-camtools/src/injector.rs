//! Hole fill injection
//!
//! Ties the stages together. The alignment is fixed and applied to every
//! hole before the insertion point is searched for, and nothing is written
//! here: the caller receives the spliced lines.

use serde::Serialize;

use pthfill_core::{Point2D, Position, Result, StructureError};
use pthfill_gcode::{splice, GcodeProgram};
use pthfill_settings::{Config, SpliceSettings};

use crate::alignment::{align_holes, object_footprint_center, Alignment};
use crate::board_outline::board_outline_center;
use crate::excellon::holes_for_tool;
use crate::hole_fill::{HoleFillParameters, HoleFillSynthesizer};

/// Where the fill goes in a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsertionPoint {
    /// Line of the tool change that selects the conductive tool
    pub tool_change_line: usize,
    /// Tool number that change selects
    pub conductive_tool: u32,
    /// Line after which the fill sequence is inserted
    pub insertion_line: usize,
}

/// Locate the conductive tool change and the purge section after it
///
/// # Errors
/// A [`StructureError`] when the tool change count is not the supported one
/// or no purge section follows the conductive tool change.
pub fn locate_insertion(
    program: &GcodeProgram,
    settings: &SpliceSettings,
) -> std::result::Result<InsertionPoint, StructureError> {
    let changes = program.tool_changes();
    match changes.len() {
        0 => return Err(StructureError::NoToolChanges),
        1 => return Err(StructureError::SingleToolChange),
        n if n > settings.required_tool_changes => {
            return Err(StructureError::TooManyToolChanges {
                found: n,
                supported: settings.required_tool_changes,
            })
        }
        _ => {}
    }

    // The second tool change switches to the conductive filament.
    let conductive = &changes[1];
    let tool_change_line = conductive.line_index;
    let section = program
        .find_section_after(&settings.purge_section, tool_change_line)
        .ok_or_else(|| StructureError::MissingPurgeSection {
            section: settings.purge_section.clone(),
            after_line: tool_change_line,
        })?;

    Ok(InsertionPoint {
        tool_change_line,
        conductive_tool: conductive.tool,
        insertion_line: section.end_line,
    })
}

/// Everything decided for one injection, before any output exists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InjectionPlan {
    /// Drill to printer translation
    pub alignment: Alignment,
    /// Holes in printer coordinates
    pub holes: Vec<Point2D>,
    /// Splice anchors
    pub insertion: InsertionPoint,
    /// Tool position at the insertion line
    pub origin: Position,
    /// Hotend setpoint restored after filling
    pub restore_temperature: f64,
    /// Commands inserted after the tool change
    pub pause: Vec<String>,
    /// Commands inserted after the insertion line
    pub fill: Vec<String>,
}

/// Plans and applies hole fill injection for one configuration
pub struct HoleFillInjector<'a> {
    config: &'a Config,
}

impl<'a> HoleFillInjector<'a> {
    /// Create an injector using `config`
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Work out the full injection for a program, drill file and outline
    ///
    /// # Errors
    /// Any geometry, drill or structure error; nothing is produced then.
    pub fn plan(&self, program: &GcodeProgram, drill: &str, outline: &str) -> Result<InjectionPlan> {
        let config = self.config;

        let design_center = board_outline_center(outline)?;
        let slicer_center = object_footprint_center(program)?;
        let alignment = Alignment::new(design_center, slicer_center, config.alignment.decimals);
        tracing::info!(
            "Board center {}, slicer center {}, delta {}",
            design_center,
            slicer_center,
            alignment.delta()
        );

        let raw_holes = holes_for_tool(drill, &config.drill.tool)?;
        let holes = align_holes(&raw_holes, &alignment);
        if holes.is_empty() {
            tracing::warn!("No holes found for tool {}", config.drill.tool);
        }

        let insertion = locate_insertion(program, &config.splice)?;
        let origin = program
            .last_pose(insertion.insertion_line)
            .resolve(insertion.insertion_line)?;
        let restore_temperature = program
            .last_hotend_temperature(insertion.insertion_line, insertion.conductive_tool)
            .unwrap_or(config.fill.restore_temperature);
        tracing::info!(
            "Pausing after line {}, filling after line {} from {}",
            insertion.tool_change_line,
            insertion.insertion_line,
            origin
        );

        let params = HoleFillParameters::from_settings(&config.fill, restore_temperature);
        let fill = HoleFillSynthesizer::new(params).synthesize(&holes, origin);

        Ok(InjectionPlan {
            alignment,
            holes,
            insertion,
            origin,
            restore_temperature,
            pause: config.splice.pause_commands.clone(),
            fill,
        })
    }

    /// Splice a plan into the program it was made for
    pub fn apply(&self, program: &GcodeProgram, plan: &InjectionPlan) -> Result<Vec<String>> {
        splice(
            program,
            plan.insertion.tool_change_line,
            plan.insertion.insertion_line,
            &plan.pause,
            &plan.fill,
        )
    }

    /// Plan and splice in one step
    pub fn inject(&self, program: &GcodeProgram, drill: &str, outline: &str) -> Result<Vec<String>> {
        let plan = self.plan(program, drill, outline)?;
        self.apply(program, &plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(text: &str) -> GcodeProgram {
        GcodeProgram::parse(text).unwrap()
    }

    #[test]
    fn test_tool_change_counts() {
        let settings = SpliceSettings::default();
        assert_eq!(
            locate_insertion(&program("G28\n"), &settings),
            Err(StructureError::NoToolChanges)
        );
        assert_eq!(
            locate_insertion(&program("T0\n;TYPE:Wipe tower\nG1 X1\n"), &settings),
            Err(StructureError::SingleToolChange)
        );
        assert_eq!(
            locate_insertion(&program("T0\nT1\nT0\n;TYPE:Wipe tower\n"), &settings),
            Err(StructureError::TooManyToolChanges {
                found: 3,
                supported: 2
            })
        );
    }

    #[test]
    fn test_purge_section_must_follow_second_change() {
        let settings = SpliceSettings::default();
        let text = "T0\n;TYPE:Wipe tower\nG1 X1\nT1\n;TYPE:Perimeter\nG1 X2\n";
        assert_eq!(
            locate_insertion(&program(text), &settings),
            Err(StructureError::MissingPurgeSection {
                section: "Wipe tower".to_string(),
                after_line: 3
            })
        );
    }

    #[test]
    fn test_insertion_at_purge_section_end() {
        let settings = SpliceSettings::default();
        let text = "T0\nT1\nG1 X1\n;TYPE:Wipe tower\nG1 X2\nG1 X3\n;TYPE:Perimeter\nG1 X4\n";
        assert_eq!(
            locate_insertion(&program(text), &settings).unwrap(),
            InsertionPoint {
                tool_change_line: 1,
                conductive_tool: 1,
                insertion_line: 6
            }
        );
    }

    #[test]
    fn test_custom_purge_section_name() {
        let settings = SpliceSettings {
            purge_section: "Prime tower".to_string(),
            ..SpliceSettings::default()
        };
        let text = "T0\nT1\n;TYPE:Prime tower\nG1 X2\n";
        let point = locate_insertion(&program(text), &settings).unwrap();
        assert_eq!(point.insertion_line, 3);
    }
}
