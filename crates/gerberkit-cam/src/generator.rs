//! Stateful Gerber RS-274X command-stream builder.
//!
//! The generator translates draw/flash calls into plotter commands,
//! tracking just enough state (selected aperture, quadrant mode, region
//! mode) to avoid emitting redundant mode switches. Interpolation mode is
//! not tracked: G02/G03 is asserted before every arc and G01 restored
//! right after it.
//!
//! One instance serves one export: construct, issue draw/flash calls in
//! board-plot order, call [`GerberGenerator::generate`] once, then hand the
//! assembled text to [`GerberGenerator::save_to_file`]. Reuse requires an
//! explicit [`GerberGenerator::reset`].

use std::fmt::Write as _;
use std::path::Path;

use chrono::Local;
use gerberkit_geometry::{Angle, Ellipse, Length, PathSegment, Point, Polygon};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::aperture::ApertureList;
use crate::error::{ExportError, Result};
use crate::writer;

/// Polarity of a board layer. Dark (positive) polarity adds material,
/// clear (negative) polarity removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerPolarity {
    Positive,
    Negative,
}

/// Arc quadrant mode. Single-quadrant arcs span at most 90 degrees and
/// carry unsigned center offsets; multi-quadrant arcs keep the signed
/// offsets and may span any angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuadrantMode {
    Single,
    Multi,
}

/// Builds a complete RS-274X file body from a sequence of plot requests.
#[derive(Debug)]
pub struct GerberGenerator {
    /// Project name with commas stripped (reserved in `%TF.ProjectId`).
    project_id: String,
    /// Project UUID without hyphens.
    project_guid: String,
    project_revision: String,
    /// Assembled file text, valid after `generate()`.
    output: String,
    /// Accumulated draw/flash command lines, exclusively owned here.
    content: String,
    apertures: ApertureList,
    current_aperture: Option<i32>,
    quadrant_mode: QuadrantMode,
    region_mode: bool,
}

impl GerberGenerator {
    pub fn new(project_name: &str, project_uuid: Uuid, project_revision: &str) -> Self {
        GerberGenerator {
            project_id: project_name.replace(',', ""),
            project_guid: project_uuid.simple().to_string(),
            project_revision: project_revision.to_string(),
            output: String::new(),
            content: String::new(),
            apertures: ApertureList::new(),
            current_aperture: None,
            quadrant_mode: QuadrantMode::Single,
            region_mode: false,
        }
    }

    /// Switches the polarity of everything drawn afterwards.
    pub fn set_layer_polarity(&mut self, polarity: LayerPolarity) {
        // The original engine logged and ignored out-of-range polarity
        // values; the enum makes that case unrepresentable.
        match polarity {
            LayerPolarity::Positive => self.content.push_str("%LPD*%\n"),
            LayerPolarity::Negative => self.content.push_str("%LPC*%\n"),
        }
    }

    /// Strokes a straight line of the given width.
    pub fn draw_line(&mut self, start: Point, end: Point, width: Length) {
        let code = self.apertures.add_circle(width, Length::ZERO);
        self.set_current_aperture(code);
        self.move_to(start);
        self.linear_interpolate_to(end);
    }

    /// Strokes an ellipse outline. Only true circles are supported: the
    /// outline reduces to a flashed annulus whose inner diameter is clamped
    /// at zero. Non-circular ellipses are dropped with a diagnostic.
    pub fn draw_ellipse_outline(&mut self, ellipse: &Ellipse) {
        if ellipse.is_circular() {
            let outer = ellipse.radius_x * 2 + ellipse.line_width;
            let mut inner = ellipse.radius_x * 2 - ellipse.line_width;
            if inner < Length::ZERO {
                inner = Length::ZERO;
            }
            self.flash_circle(ellipse.center, outer, inner);
        } else {
            warn!("non-circular ellipse was ignored in gerber output");
        }
    }

    /// Fills an ellipse. Only true circles are supported (flashed as a
    /// full disc); non-circular ellipses are dropped with a diagnostic.
    pub fn draw_ellipse_area(&mut self, ellipse: &Ellipse) {
        if ellipse.is_circular() {
            self.flash_circle(ellipse.center, ellipse.radius_x * 2, Length::ZERO);
        } else {
            warn!("non-circular ellipse was ignored in gerber output");
        }
    }

    /// Strokes a polygon path with its line width.
    pub fn draw_polygon_outline(&mut self, polygon: &Polygon) {
        let code = self.apertures.add_circle(polygon.line_width, Length::ZERO);
        self.set_current_aperture(code);
        self.interpolate_path(polygon);
    }

    /// Fills a polygon as a region. An unclosed path is force-closed with a
    /// final linear interpolation back to the start point; an open fill
    /// region would be rejected or mis-rendered by most viewers.
    pub fn draw_polygon_area(&mut self, polygon: &Polygon) {
        let code = self.apertures.add_circle(Length::ZERO, Length::ZERO);
        self.set_current_aperture(code);
        self.set_region_mode_on();
        self.interpolate_path(polygon);
        if !polygon.is_closed() {
            warn!("unclosed fill polygon was force-closed in gerber output");
            self.linear_interpolate_to(polygon.start);
        }
        self.set_region_mode_off();
    }

    /// Flashes a circular aperture at `pos`.
    pub fn flash_circle(&mut self, pos: Point, diameter: Length, hole: Length) {
        let code = self.apertures.add_circle(diameter, hole);
        self.set_current_aperture(code);
        self.flash_at(pos);
    }

    /// Flashes a rectangular aperture at `pos`.
    pub fn flash_rect(
        &mut self,
        pos: Point,
        width: Length,
        height: Length,
        rotation: Angle,
        hole: Length,
    ) {
        let code = self.apertures.add_rect(width, height, rotation, hole);
        self.set_current_aperture(code);
        self.flash_at(pos);
    }

    /// Flashes an obround aperture at `pos`.
    pub fn flash_obround(
        &mut self,
        pos: Point,
        width: Length,
        height: Length,
        rotation: Angle,
        hole: Length,
    ) {
        let code = self.apertures.add_obround(width, height, rotation, hole);
        self.set_current_aperture(code);
        self.flash_at(pos);
    }

    /// Flashes a regular polygon aperture at `pos`.
    pub fn flash_regular_polygon(
        &mut self,
        pos: Point,
        diameter: Length,
        vertices: u32,
        rotation: Angle,
        hole: Length,
    ) {
        let code = self
            .apertures
            .add_regular_polygon(diameter, vertices, rotation, hole);
        self.set_current_aperture(code);
        self.flash_at(pos);
    }

    /// Clears all recorded content and state for a fresh export on the
    /// same instance.
    pub fn reset(&mut self) {
        self.output.clear();
        self.content.clear();
        self.apertures.reset();
        self.current_aperture = None;
        self.quadrant_mode = QuadrantMode::Single;
        self.region_mode = false;
    }

    /// Assembles the complete file: header, aperture definitions, content
    /// bracketed by board markers, and the checksum footer.
    ///
    /// Fails with [`ExportError::EmptyExport`] when no draw or flash call
    /// was recorded.
    pub fn generate(&mut self) -> Result<()> {
        if self.content.is_empty() {
            return Err(ExportError::EmptyExport);
        }
        self.output.clear();
        self.print_header();
        self.output.push_str(&self.apertures.serialize());
        self.print_content();
        self.print_footer();
        Ok(())
    }

    /// The assembled file text. Empty until `generate()` has run.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Registered apertures, mainly for inspection in tests and reports.
    pub fn apertures(&self) -> &ApertureList {
        &self.apertures
    }

    /// Writes the assembled output atomically to `path` as single-byte
    /// text. Must be called after `generate()`.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if self.output.is_empty() {
            return Err(ExportError::NotGenerated);
        }
        writer::write_atomic(path, &self.output)
    }

    fn interpolate_path(&mut self, polygon: &Polygon) {
        self.move_to(polygon.start);
        for (i, segment) in polygon.segments.iter().enumerate() {
            match *segment {
                PathSegment::Line { end } => self.linear_interpolate_to(end),
                PathSegment::Arc { end, center, sweep } => {
                    if sweep.abs() <= Angle::DEG_90 {
                        self.set_quadrant_mode(QuadrantMode::Single);
                    } else {
                        self.set_quadrant_mode(QuadrantMode::Multi);
                    }
                    if sweep.is_negative() {
                        self.switch_to_circular_cw_g02();
                    } else {
                        self.switch_to_circular_ccw_g03();
                    }
                    self.circular_interpolate_to(polygon.segment_start(i), center, end);
                    self.switch_to_linear_g01();
                }
            }
        }
    }

    fn set_current_aperture(&mut self, code: i32) {
        if self.current_aperture != Some(code) {
            let _ = writeln!(self.content, "D{code}*");
            self.current_aperture = Some(code);
        }
    }

    fn set_region_mode_on(&mut self) {
        if !self.region_mode {
            self.content.push_str("G36*\n");
            self.region_mode = true;
        }
    }

    fn set_region_mode_off(&mut self) {
        if self.region_mode {
            self.content.push_str("G37*\n");
            self.region_mode = false;
        }
    }

    fn set_quadrant_mode(&mut self, mode: QuadrantMode) {
        if self.quadrant_mode != mode {
            match mode {
                QuadrantMode::Single => self.content.push_str("G74*\n"),
                QuadrantMode::Multi => self.content.push_str("G75*\n"),
            }
            self.quadrant_mode = mode;
        }
    }

    fn switch_to_linear_g01(&mut self) {
        self.content.push_str("G01*\n");
    }

    fn switch_to_circular_cw_g02(&mut self) {
        self.content.push_str("G02*\n");
    }

    fn switch_to_circular_ccw_g03(&mut self) {
        self.content.push_str("G03*\n");
    }

    fn move_to(&mut self, pos: Point) {
        let _ = writeln!(self.content, "X{}Y{}D02*", pos.x.nm(), pos.y.nm());
    }

    fn linear_interpolate_to(&mut self, pos: Point) {
        let _ = writeln!(self.content, "X{}Y{}D01*", pos.x.nm(), pos.y.nm());
    }

    fn circular_interpolate_to(&mut self, start: Point, center: Point, end: Point) {
        let mut offset = center - start;
        if self.quadrant_mode == QuadrantMode::Single {
            // No sign allowed in single quadrant mode.
            offset = offset.abs();
        }
        let _ = writeln!(
            self.content,
            "X{}Y{}I{}J{}D01*",
            end.x.nm(),
            end.y.nm(),
            offset.x.nm(),
            offset.y.nm()
        );
    }

    fn flash_at(&mut self, pos: Point) {
        let _ = writeln!(self.content, "X{}Y{}D03*", pos.x.nm(), pos.y.nm());
    }

    fn print_header(&mut self) {
        self.output.push_str("G04 --- HEADER BEGIN --- *\n");

        // X2 file attributes.
        let _ = writeln!(
            self.output,
            "%TF.GenerationSoftware,gerberkit,{},{}*%",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        // ASCII-only ISO date; localized formats are not valid in gerber.
        let _ = writeln!(
            self.output,
            "%TF.CreationDate,{}*%",
            Local::now().format("%Y-%m-%dT%H:%M:%S")
        );
        let _ = writeln!(
            self.output,
            "%TF.ProjectId,{},{},{}*%",
            self.project_id, self.project_guid, self.project_revision
        );
        // "Single" means "this is a PCB".
        self.output.push_str("%TF.Part,Single*%\n");

        // Coordinate format 6.6, absolute, leading zeros omitted: integer
        // nanometer values serialize directly without scaling.
        self.output.push_str("%FSLAX66Y66*%\n");
        self.output.push_str("%MOMM*%\n");

        // Initial linear interpolation and single quadrant mode.
        self.output.push_str("G01*\n");
        self.output.push_str("G74*\n");

        self.output.push_str("G04 --- HEADER END --- *\n");
    }

    fn print_content(&mut self) {
        self.output.push_str("G04 --- BOARD BEGIN --- *\n");
        self.output.push_str(&self.content);
        self.output.push_str("G04 --- BOARD END --- *\n");
    }

    fn print_footer(&mut self) {
        let checksum = content_checksum(&self.output);
        let _ = writeln!(self.output, "%TF.MD5,{checksum}*%");
        self.output.push_str("M02*\n");
    }
}

/// MD5 checksum of `text` with all line-break characters removed, as
/// lowercase hex. The RS-274 convention excludes line breaks from the
/// checksum domain.
pub fn content_checksum(text: &str) -> String {
    let mut hasher = Md5::new();
    for piece in text.split(['\n', '\r']) {
        hasher.update(piece.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
