//! Atomic file write for assembled Gerber output.
//!
//! The format forbids multi-byte encodings, so the text is checked for
//! ASCII before anything touches the disk. The write goes through a named
//! temp file in the destination directory and is persisted over the target,
//! so a failed export never leaves a truncated file behind.

use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ExportError, Result};

/// Writes `text` atomically to `path` as single-byte text.
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    if !text.is_ascii() {
        return Err(ExportError::NonAsciiOutput);
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.persist(path).map_err(|e| ExportError::Io(e.error))?;
    Ok(())
}
