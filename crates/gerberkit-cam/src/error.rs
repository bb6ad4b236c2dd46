//! Error types for the export engine.
//!
//! Drawing and aperture registration are total operations and never fail;
//! errors are reserved for the assembly precondition and the I/O boundary.

use std::io;
use thiserror::Error;

/// Errors that can occur while assembling or writing a Gerber export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// `generate()` was called before any draw or flash call was recorded.
    #[error("nothing to export: no draw or flash calls were recorded")]
    EmptyExport,

    /// The output was requested before `generate()` assembled it.
    #[error("output has not been assembled yet; call generate() first")]
    NotGenerated,

    /// The assembled output contains non-ASCII text. The Gerber format
    /// forbids multi-byte encodings, so this is a hard error at the write
    /// boundary rather than a silent transcoding.
    #[error("gerber output must be single-byte text, found non-ASCII content")]
    NonAsciiOutput,

    /// I/O error while writing the export to disk.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
