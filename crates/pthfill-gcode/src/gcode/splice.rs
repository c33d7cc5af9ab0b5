//! Stream splicing
//!
//! Inserts generated commands after two anchor lines of an existing program.
//! Anchors are original line indices, so the pause lines inserted after the
//! tool change never shift where the fill sequence lands.

use pthfill_core::{Error, Result};

use super::{GcodeProgram, Instruction};

/// Splice `pause` after `tool_change_line` and `fill` after `insertion_line`
///
/// Generated commands are given without terminators and are emitted with a
/// `\n`. Every original line is passed through with its exact text. If an
/// anchor line is the unterminated last line of the stream, a newline is
/// emitted before the inserted commands.
pub fn splice(
    program: &GcodeProgram,
    tool_change_line: usize,
    insertion_line: usize,
    pause: &[String],
    fill: &[String],
) -> Result<Vec<String>> {
    splice_lines(
        program.instructions(),
        tool_change_line,
        insertion_line,
        pause,
        fill,
    )
}

/// Slice-level form of [`splice`]
pub fn splice_lines(
    lines: &[Instruction],
    tool_change_line: usize,
    insertion_line: usize,
    pause: &[String],
    fill: &[String],
) -> Result<Vec<String>> {
    for anchor in [tool_change_line, insertion_line] {
        if anchor >= lines.len() {
            return Err(Error::other(format!(
                "Splice anchor line {} is outside the program ({} lines)",
                anchor,
                lines.len()
            )));
        }
    }

    let mut output = Vec::with_capacity(lines.len() + pause.len() + fill.len() + 1);
    for line in lines {
        output.push(line.raw.clone());

        let mut terminated = line.is_terminated();
        let mut insert = |commands: &[String]| {
            if commands.is_empty() {
                return;
            }
            if !terminated {
                output.push("\n".to_string());
                terminated = true;
            }
            output.extend(commands.iter().map(|command| format!("{command}\n")));
        };

        if line.index == tool_change_line {
            insert(pause);
        }
        if line.index == insertion_line {
            insert(fill);
        }
    }

    tracing::debug!(
        "Spliced {} pause and {} fill commands into {} lines",
        pause.len(),
        fill.len(),
        lines.len()
    );
    Ok(output)
}

/// Join spliced lines into the final program text
pub fn render(lines: &[String]) -> String {
    lines.concat()
}
