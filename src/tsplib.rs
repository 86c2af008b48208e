//! Minimal TSPLIB reader for `NODE_COORD_SECTION` instances.
//!
//! Only the parts needed for 2-D Euclidean instances are understood:
//! `DIMENSION` (either `DIMENSION: n` or `DIMENSION n`), the coordinate
//! section, and `EOF`. Every other header line is ignored.

use crate::error::{Result, TspError};
use crate::geometry::Point;
use std::fs;
use std::path::Path;

/// Reads and parses a TSPLIB file.
pub fn read_tsplib<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    let text = fs::read_to_string(path)?;
    parse_tsplib(&text)
}

/// Parses TSPLIB text into points indexed from 0.
///
/// Coordinate lines are `index x y`. Index `i` (1-based) fills slot
/// `i - 1`; indices outside `1..=DIMENSION` and lines with fewer than
/// three fields are skipped. Slots never mentioned stay at the origin.
/// Input without a coordinate section yields no points.
///
/// # Errors
/// [`TspError::Parse`] on a coordinate section without a prior
/// `DIMENSION`, or on a numeric field that does not parse.
pub fn parse_tsplib(text: &str) -> Result<Vec<Point>> {
    let mut dimension: Option<usize> = None;
    let mut points: Vec<Point> = Vec::new();
    let mut in_coords = false;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let line_no = lineno + 1;
        if line.is_empty() {
            continue;
        }

        if in_coords {
            if line.starts_with("EOF") {
                break;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                continue;
            }
            let idx: usize = parse_field(fields[0], line_no, "node index")?;
            let x: f64 = parse_field(fields[1], line_no, "x coordinate")?;
            let y: f64 = parse_field(fields[2], line_no, "y coordinate")?;
            if (1..=points.len()).contains(&idx) {
                points[idx - 1] = Point::new(x, y);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("DIMENSION") {
            let value = rest.trim_start().trim_start_matches(':').trim();
            let n: usize = parse_field(value, line_no, "DIMENSION")?;
            dimension = Some(n);
            points = vec![Point::new(0.0, 0.0); n];
        } else if line.starts_with("NODE_COORD_SECTION") {
            if dimension.is_none() {
                return Err(TspError::Parse {
                    line: line_no,
                    message: "NODE_COORD_SECTION before DIMENSION".into(),
                });
            }
            in_coords = true;
        }
    }

    if !in_coords {
        return Ok(Vec::new());
    }
    Ok(points)
}

fn parse_field<T: std::str::FromStr>(field: &str, line: usize, what: &str) -> Result<T> {
    field.parse().map_err(|_| TspError::Parse {
        line,
        message: format!("invalid {what}: {field:?}"),
    })
}
