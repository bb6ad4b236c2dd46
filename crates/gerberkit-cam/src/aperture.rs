//! Deduplicating aperture registry.
//!
//! Every draw or flash call needs a tool shape (aperture) selected by a
//! numeric D-code. Registering the same shape twice during one export must
//! return the same code and produce a single `%ADD` definition; that is the
//! invariant that keeps the aperture block small and reusable.

use std::collections::HashMap;
use std::fmt::Write as _;

use gerberkit_geometry::{Angle, Length};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// First D-code available for aperture definitions; codes below 10 are
/// reserved by the format.
pub const FIRST_APERTURE_CODE: i32 = 10;

/// A tool shape descriptor. Two descriptors are equal iff all fields match
/// exactly (no tolerance); structural equality is the dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApertureDescriptor {
    /// Round aperture. A hole diameter of zero means "no hole".
    Circle { diameter: Length, hole: Length },
    /// Rectangular aperture.
    Rect {
        width: Length,
        height: Length,
        rotation: Angle,
        hole: Length,
    },
    /// Obround (stadium) aperture.
    Obround {
        width: Length,
        height: Length,
        rotation: Angle,
        hole: Length,
    },
    /// Regular polygon aperture with `vertices` corners.
    RegularPolygon {
        diameter: Length,
        vertices: u32,
        rotation: Angle,
        hole: Length,
    },
}

impl ApertureDescriptor {
    /// The shape part of the `%ADD` definition, e.g. `C,0.2X0.1`.
    ///
    /// This grammar is a file-format compatibility contract: downstream CAM
    /// tools parse it literally.
    fn gerber_shape(&self) -> String {
        match self {
            ApertureDescriptor::Circle { diameter, hole } => {
                with_hole(format!("C,{}", diameter.to_mm_string()), *hole)
            }
            ApertureDescriptor::Rect {
                width,
                height,
                rotation,
                hole,
            } => {
                let (w, h) = oriented(*width, *height, *rotation, "rectangle");
                with_hole(
                    format!("R,{}X{}", w.to_mm_string(), h.to_mm_string()),
                    *hole,
                )
            }
            ApertureDescriptor::Obround {
                width,
                height,
                rotation,
                hole,
            } => {
                let (w, h) = oriented(*width, *height, *rotation, "obround");
                with_hole(
                    format!("O,{}X{}", w.to_mm_string(), h.to_mm_string()),
                    *hole,
                )
            }
            ApertureDescriptor::RegularPolygon {
                diameter,
                vertices,
                rotation,
                hole,
            } => {
                // Rotation is always printed because the optional hole is
                // the parameter after it.
                with_hole(
                    format!(
                        "P,{}X{}X{}",
                        diameter.to_mm_string(),
                        vertices,
                        rotation.to_deg_string()
                    ),
                    *hole,
                )
            }
        }
    }
}

fn with_hole(mut spec: String, hole: Length) -> String {
    if hole > Length::ZERO {
        spec.push('X');
        spec.push_str(&hole.to_mm_string());
    }
    spec
}

/// Resolves a rotation into the width/height ordering of the emitted
/// definition. Standard `R`/`O` apertures cannot be rotated: multiples of
/// 180 degrees keep the dimensions, odd multiples of 90 degrees swap them,
/// anything else is dropped with a diagnostic.
fn oriented(width: Length, height: Length, rotation: Angle, kind: &str) -> (Length, Length) {
    if rotation.is_multiple_of(Angle::DEG_180) {
        (width, height)
    } else if rotation.is_multiple_of(Angle::DEG_90) {
        (height, width)
    } else {
        warn!(
            "unsupported {} aperture rotation of {} degrees was ignored in gerber output",
            kind,
            rotation.to_deg_string()
        );
        (width, height)
    }
}

/// A registered aperture: descriptor plus its assigned D-code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApertureEntry {
    pub code: i32,
    pub descriptor: ApertureDescriptor,
}

/// Registry mapping shape descriptors to stable, minimal D-codes.
///
/// Codes start at [`FIRST_APERTURE_CODE`] and increment by one per distinct
/// descriptor, in first-seen order. Entries persist for the lifetime of one
/// export; [`ApertureList::reset`] clears the registry for reuse.
#[derive(Debug, Clone)]
pub struct ApertureList {
    entries: Vec<ApertureEntry>,
    codes: HashMap<ApertureDescriptor, i32>,
    next_code: i32,
}

impl ApertureList {
    pub fn new() -> Self {
        ApertureList {
            entries: Vec::new(),
            codes: HashMap::new(),
            next_code: FIRST_APERTURE_CODE,
        }
    }

    /// Registers a circular aperture and returns its D-code.
    pub fn add_circle(&mut self, diameter: Length, hole: Length) -> i32 {
        assert!(
            !diameter.is_negative(),
            "aperture diameter must not be negative"
        );
        assert!(!hole.is_negative(), "aperture hole must not be negative");
        self.insert(ApertureDescriptor::Circle { diameter, hole })
    }

    /// Registers a rectangular aperture and returns its D-code.
    pub fn add_rect(
        &mut self,
        width: Length,
        height: Length,
        rotation: Angle,
        hole: Length,
    ) -> i32 {
        assert!(
            !width.is_negative() && !height.is_negative(),
            "aperture dimensions must not be negative"
        );
        assert!(!hole.is_negative(), "aperture hole must not be negative");
        self.insert(ApertureDescriptor::Rect {
            width,
            height,
            rotation,
            hole,
        })
    }

    /// Registers an obround aperture and returns its D-code.
    pub fn add_obround(
        &mut self,
        width: Length,
        height: Length,
        rotation: Angle,
        hole: Length,
    ) -> i32 {
        assert!(
            !width.is_negative() && !height.is_negative(),
            "aperture dimensions must not be negative"
        );
        assert!(!hole.is_negative(), "aperture hole must not be negative");
        self.insert(ApertureDescriptor::Obround {
            width,
            height,
            rotation,
            hole,
        })
    }

    /// Registers a regular polygon aperture and returns its D-code.
    pub fn add_regular_polygon(
        &mut self,
        diameter: Length,
        vertices: u32,
        rotation: Angle,
        hole: Length,
    ) -> i32 {
        assert!(
            !diameter.is_negative(),
            "aperture diameter must not be negative"
        );
        assert!(!hole.is_negative(), "aperture hole must not be negative");
        assert!(
            vertices >= 3,
            "regular polygon aperture needs at least 3 vertices"
        );
        self.insert(ApertureDescriptor::RegularPolygon {
            diameter,
            vertices,
            rotation,
            hole,
        })
    }

    fn insert(&mut self, descriptor: ApertureDescriptor) -> i32 {
        if let Some(&code) = self.codes.get(&descriptor) {
            return code;
        }
        let code = self.next_code;
        self.next_code += 1;
        self.codes.insert(descriptor, code);
        self.entries.push(ApertureEntry { code, descriptor });
        code
    }

    /// Clears all entries and resets the code counter to the base value.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.codes.clear();
        self.next_code = FIRST_APERTURE_CODE;
    }

    /// Registered entries in allocation order.
    pub fn entries(&self) -> &[ApertureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The aperture-definition block: one `%ADD` line per entry, in
    /// allocation order, deterministic for a given registration sequence.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(out, "%ADD{}{}*%", entry.code, entry.descriptor.gerber_shape());
        }
        out
    }
}

impl Default for ApertureList {
    fn default() -> Self {
        Self::new()
    }
}
