//! # GerberKit CAM
//!
//! Gerber (RS-274X, with X2 attributes) export engine for PCB fabrication
//! output.
//!
//! The engine is a stateful codec with two tightly coupled parts:
//!
//! - [`ApertureList`] — a deduplicating registry of tool-shape descriptors,
//!   each assigned a stable D-code, emitting the `%ADD` definition block.
//! - [`GerberGenerator`] — a command-stream builder that tracks plotter
//!   modes, translates draw/flash calls into command lines and assembles
//!   the complete file (header, apertures, content, MD5 footer).
//!
//! Everything is synchronous, single-threaded and in-memory; the only
//! external resource is the final text, written through [`writer`].
//!
//! ```no_run
//! use gerberkit_cam::GerberGenerator;
//! use gerberkit_geometry::{Length, Point};
//! use uuid::Uuid;
//!
//! let mut gen = GerberGenerator::new("demo-board", Uuid::new_v4(), "v1");
//! gen.draw_line(
//!     Point::from_nm(0, 0),
//!     Point::from_nm(1_000_000, 0),
//!     Length::from_nm(200_000),
//! );
//! gen.generate()?;
//! gen.save_to_file("demo-board.gbr".as_ref())?;
//! # Ok::<(), gerberkit_cam::ExportError>(())
//! ```

pub mod aperture;
pub mod error;
pub mod generator;
pub mod writer;

pub use aperture::{ApertureDescriptor, ApertureEntry, ApertureList, FIRST_APERTURE_CODE};
pub use error::{ExportError, Result};
pub use generator::{content_checksum, GerberGenerator, LayerPolarity, QuadrantMode};
