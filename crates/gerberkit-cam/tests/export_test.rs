//! End-to-end export tests: full file assembly, checksum verification and
//! the degraded-shape paths.

use gerberkit_cam::{content_checksum, ExportError, GerberGenerator, LayerPolarity};
use gerberkit_geometry::{Angle, Ellipse, Length, Point, Polygon};
use std::fs;
use uuid::Uuid;

fn generator() -> GerberGenerator {
    GerberGenerator::new("Test Project", Uuid::nil(), "rev1")
}

/// Lines between the board begin/end markers.
fn board_section(output: &str) -> Vec<&str> {
    let lines: Vec<&str> = output.lines().collect();
    let begin = lines
        .iter()
        .position(|l| *l == "G04 --- BOARD BEGIN --- *")
        .expect("board begin marker");
    let end = lines
        .iter()
        .position(|l| *l == "G04 --- BOARD END --- *")
        .expect("board end marker");
    lines[begin + 1..end].to_vec()
}

fn embedded_checksum(output: &str) -> &str {
    let line = output
        .lines()
        .find(|l| l.starts_with("%TF.MD5,"))
        .expect("checksum attribute");
    line.trim_start_matches("%TF.MD5,").trim_end_matches("*%")
}

#[test]
fn test_single_line_scenario() {
    let mut gen = generator();
    gen.draw_line(
        Point::from_nm(0, 0),
        Point::from_nm(1_000_000, 0),
        Length::from_nm(200_000),
    );
    gen.generate().unwrap();
    let output = gen.output();

    // Exactly one aperture definition, at the base code.
    let apertures: Vec<&str> = output.lines().filter(|l| l.starts_with("%ADD")).collect();
    assert_eq!(apertures, vec!["%ADD10C,0.2*%"]);

    // One select, one move, one linear interpolation.
    assert_eq!(
        board_section(output),
        vec!["D10*", "X0Y0D02*", "X1000000Y0D01*"]
    );

    // Fixed header declarations.
    for line in [
        "%TF.Part,Single*%",
        "%FSLAX66Y66*%",
        "%MOMM*%",
        "G01*",
        "G74*",
    ] {
        assert!(output.contains(line), "missing header line {line}");
    }

    // File ends with the checksum attribute and the end-of-file marker.
    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[lines.len() - 2].starts_with("%TF.MD5,"));
    assert_eq!(lines[lines.len() - 1], "M02*");
}

#[test]
fn test_checksum_round_trip() {
    let mut gen = generator();
    gen.set_layer_polarity(LayerPolarity::Positive);
    gen.draw_line(
        Point::from_nm(0, 0),
        Point::from_nm(1_000_000, 500_000),
        Length::from_nm(200_000),
    );
    gen.flash_rect(
        Point::from_nm(500_000, 500_000),
        Length::from_nm(800_000),
        Length::from_nm(400_000),
        Angle::ZERO,
        Length::ZERO,
    );
    gen.generate().unwrap();
    let output = gen.output();

    // Recompute over everything before the footer.
    let footer_start = output.find("%TF.MD5,").expect("checksum attribute");
    let body = &output[..footer_start];
    assert_eq!(embedded_checksum(output), content_checksum(body));

    // Any content byte flip changes the checksum.
    let mutated = body.replace("X1000000Y500000D01*", "X1000001Y500000D01*");
    assert_ne!(content_checksum(body), content_checksum(&mutated));
}

#[test]
fn test_region_closure_of_open_polygon() {
    let mut gen = generator();
    let open = Polygon::new(Point::from_nm(0, 0), Length::ZERO)
        .line_to(Point::from_nm(1000, 0))
        .line_to(Point::from_nm(1000, 1000));
    gen.draw_polygon_area(&open);
    gen.generate().unwrap();

    assert_eq!(
        board_section(gen.output()),
        vec![
            "D10*",
            "G36*",
            "X0Y0D02*",
            "X1000Y0D01*",
            "X1000Y1000D01*",
            // Forced closing segment back to the start point.
            "X0Y0D01*",
            "G37*",
        ]
    );
    // The degenerate region aperture has zero size and no hole.
    assert!(gen.output().contains("%ADD10C,0*%"));
}

#[test]
fn test_closed_polygon_area_needs_no_extra_segment() {
    let mut gen = generator();
    let closed = Polygon::new(Point::from_nm(0, 0), Length::ZERO)
        .line_to(Point::from_nm(1000, 0))
        .line_to(Point::from_nm(1000, 1000))
        .line_to(Point::from_nm(0, 0));
    gen.draw_polygon_area(&closed);
    gen.generate().unwrap();

    let section = board_section(gen.output());
    let d01_count = section.iter().filter(|l| l.ends_with("D01*")).count();
    assert_eq!(d01_count, 3);
    assert_eq!(*section.last().unwrap(), "G37*");
}

#[test]
fn test_quadrant_mode_boundary() {
    // |sweep| = 90 degrees stays in single quadrant mode.
    let mut gen = generator();
    let at_90 = Polygon::new(Point::from_nm(1000, 0), Length::from_nm(100_000)).arc_to(
        Point::from_nm(0, 1000),
        Point::from_nm(0, 0),
        Angle::from_deg(90),
    );
    gen.draw_polygon_outline(&at_90);
    gen.generate().unwrap();
    // The single G74 is the header declaration; no G75 anywhere.
    assert_eq!(gen.output().lines().filter(|l| *l == "G74*").count(), 1);
    assert!(!gen.output().contains("G75*"));
    assert!(gen.output().contains("G03*"));

    // |sweep| = 91 degrees switches to multi quadrant mode.
    let mut gen = generator();
    let at_91 = Polygon::new(Point::from_nm(1000, 0), Length::from_nm(100_000)).arc_to(
        Point::from_nm(0, 1000),
        Point::from_nm(0, 0),
        Angle::from_deg(91),
    );
    gen.draw_polygon_outline(&at_91);
    gen.generate().unwrap();
    assert!(gen.output().contains("G75*"));

    // Direction flips the interpolation command.
    let mut gen = generator();
    let cw = Polygon::new(Point::from_nm(1000, 0), Length::from_nm(100_000)).arc_to(
        Point::from_nm(0, 1000),
        Point::from_nm(0, 0),
        Angle::from_deg(-91),
    );
    gen.draw_polygon_outline(&cw);
    gen.generate().unwrap();
    assert!(gen.output().contains("G02*"));
    assert!(!gen.output().contains("G03*"));
}

#[test]
fn test_ellipse_outline_clamps_hole_at_zero() {
    let mut gen = generator();
    // Line width greater than the full diameter: inner diameter would be
    // negative and must clamp to "no hole".
    let fat = Ellipse::circle(
        Point::from_nm(0, 0),
        Length::from_nm(100_000),
        Length::from_nm(500_000),
    );
    gen.draw_ellipse_outline(&fat);
    gen.generate().unwrap();
    assert!(gen.output().contains("%ADD10C,0.7*%"));
    assert_eq!(board_section(gen.output()), vec!["D10*", "X0Y0D03*"]);
}

#[test]
fn test_ellipse_outline_with_hole() {
    let mut gen = generator();
    let ring = Ellipse::circle(
        Point::from_nm(0, 0),
        Length::from_nm(500_000),
        Length::from_nm(200_000),
    );
    gen.draw_ellipse_outline(&ring);
    gen.generate().unwrap();
    // outer = 1.0 + 0.2, inner = 1.0 - 0.2
    assert!(gen.output().contains("%ADD10C,1.2X0.8*%"));
}

#[test]
fn test_non_circular_ellipse_is_dropped() {
    let mut gen = generator();
    gen.flash_circle(
        Point::from_nm(0, 0),
        Length::from_nm(100_000),
        Length::ZERO,
    );
    let squashed = Ellipse::new(
        Point::from_nm(0, 0),
        Length::from_nm(100_000),
        Length::from_nm(200_000),
        Length::from_nm(50_000),
    );
    gen.draw_ellipse_outline(&squashed);
    gen.draw_ellipse_area(&squashed);
    gen.generate().unwrap();

    // No new content lines and no new aperture entries.
    assert_eq!(gen.apertures().len(), 1);
    assert_eq!(board_section(gen.output()), vec!["D10*", "X0Y0D03*"]);
}

#[test]
fn test_polygon_outline_mixes_lines_and_arcs() {
    let mut gen = generator();
    let poly = Polygon::new(Point::from_nm(0, 0), Length::from_nm(150_000))
        .line_to(Point::from_nm(2000, 0))
        .arc_to(
            Point::from_nm(2000, 2000),
            Point::from_nm(2000, 1000),
            Angle::from_deg(180),
        )
        .line_to(Point::from_nm(0, 0));
    gen.draw_polygon_outline(&poly);
    gen.generate().unwrap();

    assert_eq!(
        board_section(gen.output()),
        vec![
            "D10*",
            "X0Y0D02*",
            "X2000Y0D01*",
            "G75*",
            "G03*",
            "X2000Y2000I0J1000D01*",
            "G01*",
            "X0Y0D01*",
        ]
    );
}

#[test]
fn test_flash_operations_register_and_flash() {
    let mut gen = generator();
    let pos = Point::from_nm(1_000_000, 2_000_000);
    gen.flash_rect(
        pos,
        Length::from_nm(800_000),
        Length::from_nm(400_000),
        Angle::from_deg(90),
        Length::ZERO,
    );
    gen.flash_obround(
        pos,
        Length::from_nm(800_000),
        Length::from_nm(400_000),
        Angle::ZERO,
        Length::from_nm(200_000),
    );
    gen.flash_regular_polygon(
        pos,
        Length::from_nm(1_000_000),
        8,
        Angle::from_deg(22),
        Length::ZERO,
    );
    gen.generate().unwrap();
    let output = gen.output();

    assert!(output.contains("%ADD10R,0.4X0.8*%"));
    assert!(output.contains("%ADD11O,0.8X0.4X0.2*%"));
    assert!(output.contains("%ADD12P,1X8X22*%"));
    assert_eq!(
        board_section(output),
        vec![
            "D10*",
            "X1000000Y2000000D03*",
            "D11*",
            "X1000000Y2000000D03*",
            "D12*",
            "X1000000Y2000000D03*",
        ]
    );
}

#[test]
fn test_save_to_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("top-copper.gbr");

    let mut gen = generator();
    gen.draw_line(
        Point::from_nm(0, 0),
        Point::from_nm(1_000_000, 0),
        Length::from_nm(200_000),
    );
    gen.generate().unwrap();
    gen.save_to_file(&path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, gen.output());
    assert!(written.is_ascii());
}

#[test]
fn test_generate_without_content_is_an_error() {
    let mut gen = generator();
    assert!(matches!(gen.generate(), Err(ExportError::EmptyExport)));
    assert!(gen.output().is_empty());
}
