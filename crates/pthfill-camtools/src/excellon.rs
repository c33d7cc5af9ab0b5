//! Excellon drill record parsing
//!
//! Only what hole filling needs: tool selection, the unit directive and
//! decimal `X..Y..` coordinate records. Tool definitions (`T<n>C<d>`) are
//! recognized so they are never mistaken for a selection.

use pthfill_core::{DrillError, MeasurementSystem, Point2D};

/// Parse a tool identifier (`T1`, `T01`, `1`) into its number
pub fn parse_tool_id(tool: &str) -> Result<u32, DrillError> {
    let trimmed = tool.trim();
    let digits = trimmed
        .strip_prefix('T')
        .or_else(|| trimmed.strip_prefix('t'))
        .unwrap_or(trimmed);

    digits.parse::<u32>().map_err(|_| DrillError::InvalidTool {
        tool: tool.to_string(),
    })
}

#[derive(Debug, Default)]
struct ReaderState {
    units: MeasurementSystem,
    current_tool: Option<u32>,
}

/// Holes drilled with `tool`, in file order
///
/// Coordinate records seen before any tool selection belong to no tool.
/// Every coordinate record is validated, whichever tool it belongs to.
///
/// # Errors
/// `InvalidTool` for a malformed tool identifier, `Format` for a coordinate
/// record without a parseable X or Y value.
pub fn holes_for_tool(drill: &str, tool: &str) -> Result<Vec<Point2D>, DrillError> {
    let wanted = parse_tool_id(tool)?;
    let mut state = ReaderState::default();
    let mut holes = Vec::new();
    let mut orphans = 0usize;

    for (index, raw_line) in drill.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if apply_units_directive(line, &mut state) {
            continue;
        }

        if let Some(selected) = parse_tool_selection(line) {
            state.current_tool = Some(selected);
            continue;
        }

        if line.starts_with('X') && line.contains('Y') {
            let (x, y) = parse_xy(line, index + 1)?;
            let hole = Point2D::new(state.units.to_mm(x), state.units.to_mm(y));
            match state.current_tool {
                Some(current) if current == wanted => holes.push(hole),
                Some(_) => {}
                None => orphans += 1,
            }
        } else if line.starts_with('X') || line.starts_with('Y') {
            tracing::warn!(
                "Skipping drill record at line {} without both coordinates: {}",
                index + 1,
                line
            );
        }
    }

    if orphans > 0 {
        tracing::warn!("{} drill holes appear before any tool selection", orphans);
    }
    tracing::info!("Found {} holes for tool T{}", holes.len(), wanted);

    Ok(holes)
}

fn apply_units_directive(line: &str, state: &mut ReaderState) -> bool {
    if line.starts_with("METRIC") {
        state.units = MeasurementSystem::Metric;
    } else if line.starts_with("INCH") {
        state.units = MeasurementSystem::Imperial;
    } else {
        return false;
    }
    true
}

/// `T<n>` without a `C` parameter selects tool `n`
fn parse_tool_selection(line: &str) -> Option<u32> {
    let rest = line.strip_prefix('T')?;
    if line.contains('C') {
        return None;
    }
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

fn parse_xy(line: &str, line_number: usize) -> Result<(f64, f64), DrillError> {
    let format_error = |reason: String| DrillError::Format {
        line_number,
        record: line.to_string(),
        reason,
    };

    let coords = line
        .strip_prefix('X')
        .ok_or_else(|| format_error("missing X".to_string()))?;
    let (x, y) = coords
        .split_once('Y')
        .ok_or_else(|| format_error("missing Y".to_string()))?;

    let x = x
        .trim()
        .parse::<f64>()
        .map_err(|err| format_error(format!("X value: {}", err)))?;
    let y = y
        .trim()
        .parse::<f64>()
        .map_err(|err| format_error(format!("Y value: {}", err)))?;

    Ok((x, y))
}
