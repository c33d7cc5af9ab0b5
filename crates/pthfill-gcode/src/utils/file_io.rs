//! G-Code file reading and writing
//!
//! Reading loads the whole program so it can be indexed and spliced in
//! memory. Writing goes through a temporary file in the destination
//! directory that is persisted over the target only once fully written.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use pthfill_core::{Error, Result};

use crate::gcode::GcodeProgram;

/// Read and index a G-Code file
///
/// # Errors
/// Returns error if the path is not a readable file or a line has a
/// malformed numeric field
pub fn read_program(path: impl AsRef<Path>) -> Result<GcodeProgram> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(Error::other(format!(
            "G-Code file does not exist: {}",
            path.display()
        )));
    }

    let size = fs::metadata(path)?.len();
    if size > 500 * 1024 * 1024 {
        tracing::warn!(
            "Reading very large file ({}MB) into memory",
            size / (1024 * 1024)
        );
    }

    let text = fs::read_to_string(path)?;
    let program = GcodeProgram::parse(&text)?;
    tracing::info!("Read {} lines from {}", program.len(), path.display());
    Ok(program)
}

/// Write lines (terminators included) to `path`, replacing any existing file
///
/// # Errors
/// Returns error if the temporary file cannot be created, written or
/// persisted; the target is left untouched in that case
pub fn write_program(path: impl AsRef<Path>, lines: &[String]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        for line in lines {
            writer.write_all(line.as_bytes())?;
        }
        writer.flush()?;
    }
    temp.persist(path).map_err(|err| Error::Io(err.error))?;

    tracing::info!("Wrote {} lines to {}", lines.len(), path.display());
    Ok(())
}
