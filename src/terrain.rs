/*
terrain.rs

Copyright 2025 Hervé Quatremain

This file is part of Dronepath.

Dronepath is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Dronepath is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Dronepath. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Parse a terrain description.
//!
//! A terrain file has the following format:
//!
//! ```text
//! <ceiling> <start x> <start y>
//! <target x> <target y> <rows> <columns>
//! <rows lines of columns altitudes>
//! ```
//!
//! For example, a 2x3 terrain where the drone starts at the top left corner and must reach the
//! bottom right corner without flying higher than 4:
//!
//! ```text
//! 4 0 0
//! 2 1 2 3
//! 0 1 9
//! 2 3 4
//! ```
//!
//! Blank lines are ignored.

use log::{debug, warn};
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::{FromStr, SplitWhitespace};

use crate::grid::{Coordinate, Grid};

/// Type of errors.
#[derive(Debug)]
pub enum TerrainError {
    /// The terrain file cannot be read.
    Io { path: PathBuf, error: io::Error },

    /// A header value is missing.
    MissingValue { line: usize, field: &'static str },

    /// A value is not a valid number.
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// The header declares zero rows or zero columns.
    EmptyGrid,

    /// The number of cells declared by the header does not fit in memory addresses.
    TooLarge { rows: usize, cols: usize },

    /// The file has fewer altitude rows than declared.
    MissingRows { expected: usize, found: usize },

    /// An altitude row does not have the declared number of columns.
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The starting cell is outside the grid.
    StartOutside {
        start: Coordinate,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TerrainError::Io { path, error } => {
                write!(f, "cannot read terrain file {}: {error}", path.display())
            }
            TerrainError::MissingValue { line, field } => {
                write!(f, "line {line}: missing {field}")
            }
            TerrainError::InvalidNumber { line, field, value } => {
                write!(f, "line {line}: invalid {field} '{value}'")
            }
            TerrainError::EmptyGrid => write!(f, "the terrain has no cells"),
            TerrainError::TooLarge { rows, cols } => {
                write!(f, "a {rows}x{cols} terrain is too large")
            }
            TerrainError::MissingRows { expected, found } => {
                write!(f, "expected {expected} altitude rows, found {found}")
            }
            TerrainError::RowLength {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected {expected} altitudes, found {found}"),
            TerrainError::StartOutside {
                start,
                width,
                height,
            } => write!(
                f,
                "starting position {start} is outside the {width}x{height} terrain"
            ),
        }
    }
}

impl Error for TerrainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TerrainError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Flight parameters from the terrain header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FlightParameters {
    /// Maximum altitude the drone can fly over.
    pub ceiling: i64,

    /// Where the drone takes off.
    pub start: Coordinate,

    /// Where the flight ends.
    pub target: Coordinate,
}

/// Terrain object.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    pub params: FlightParameters,

    /// Ground altitude of each cell.
    pub altitudes: Grid<i64>,
}

/// Non-blank lines with their line number (starting at 1).
struct SourceLines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,

    /// Number of the last line returned, used to report missing lines.
    last: usize,
}

impl<'a> SourceLines<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            inner: source.lines().enumerate(),
            last: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        for (i, l) in self.inner.by_ref() {
            self.last = i + 1;
            if !l.trim().is_empty() {
                return Some((i + 1, l));
            }
        }
        None
    }
}

/// Read the next value of a line.
fn parse_field<T: FromStr>(
    tokens: &mut SplitWhitespace,
    line: usize,
    field: &'static str,
) -> Result<T, TerrainError> {
    let value: &str = tokens
        .next()
        .ok_or(TerrainError::MissingValue { line, field })?;
    value.parse().map_err(|_| TerrainError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

impl Terrain {
    /// Read and parse a terrain file.
    pub fn load(path: &Path) -> Result<Self, TerrainError> {
        debug!("Terrain file: {path:?}");
        let source: String = fs::read_to_string(path).map_err(|error| TerrainError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::parse(&source)
    }

    /// Parse a terrain description.
    ///
    /// # Errors
    ///
    /// The method returns an error when a header value is missing or is not a number, when the
    /// altitude grid does not match the declared dimensions, or when the starting position is
    /// outside the grid.
    /// A target outside the grid is accepted; such a target can never be reached.
    pub fn parse(source: &str) -> Result<Self, TerrainError> {
        let mut lines: SourceLines = SourceLines::new(source);

        // First header line: ceiling and starting position
        let (n, l) = lines.next_line().ok_or(TerrainError::MissingValue {
            line: lines.last + 1,
            field: "ceiling",
        })?;
        let mut tokens: SplitWhitespace = l.split_whitespace();
        let ceiling: i64 = parse_field(&mut tokens, n, "ceiling")?;
        let start_x: usize = parse_field(&mut tokens, n, "start x")?;
        let start_y: usize = parse_field(&mut tokens, n, "start y")?;

        // Second header line: target position and grid dimensions
        let (n, l) = lines.next_line().ok_or(TerrainError::MissingValue {
            line: lines.last + 1,
            field: "target x",
        })?;
        let mut tokens: SplitWhitespace = l.split_whitespace();
        let target_x: usize = parse_field(&mut tokens, n, "target x")?;
        let target_y: usize = parse_field(&mut tokens, n, "target y")?;
        let rows: usize = parse_field(&mut tokens, n, "number of rows")?;
        let cols: usize = parse_field(&mut tokens, n, "number of columns")?;

        if rows == 0 || cols == 0 {
            return Err(TerrainError::EmptyGrid);
        }
        if rows.checked_mul(cols).is_none() {
            return Err(TerrainError::TooLarge { rows, cols });
        }

        // Altitude rows. The vectors grow with the file content, not with the header values.
        let mut altitude_rows: Vec<Vec<i64>> = Vec::new();
        while altitude_rows.len() < rows {
            let (n, l) = lines.next_line().ok_or(TerrainError::MissingRows {
                expected: rows,
                found: altitude_rows.len(),
            })?;
            let mut tokens: SplitWhitespace = l.split_whitespace();
            let mut row: Vec<i64> = Vec::new();
            while let Some(value) = tokens.next() {
                if row.len() == cols {
                    return Err(TerrainError::RowLength {
                        line: n,
                        expected: cols,
                        found: cols + 1 + tokens.count(),
                    });
                }
                row.push(value.parse().map_err(|_| TerrainError::InvalidNumber {
                    line: n,
                    field: "altitude",
                    value: value.to_string(),
                })?);
            }
            if row.len() != cols {
                return Err(TerrainError::RowLength {
                    line: n,
                    expected: cols,
                    found: row.len(),
                });
            }
            altitude_rows.push(row);
        }

        if let Some((n, _)) = lines.next_line() {
            warn!("Terrain: ignoring the lines after the altitude grid (from line {n})");
        }

        let altitudes: Grid<i64> =
            Grid::from_rows(altitude_rows).ok_or(TerrainError::EmptyGrid)?;

        let start: Coordinate = Coordinate::new(start_x, start_y);
        if !altitudes.contains(start) {
            return Err(TerrainError::StartOutside {
                start,
                width: cols,
                height: rows,
            });
        }
        let target: Coordinate = Coordinate::new(target_x, target_y);
        if !altitudes.contains(target) {
            warn!("Terrain: target {target} is outside the {cols}x{rows} grid");
        }

        debug!("Ceiling = {ceiling}  Start = {start}  Target = {target}");
        altitudes.debug("Terrain", |a| a.to_string());

        Ok(Self {
            params: FlightParameters {
                ceiling,
                start,
                target,
            },
            altitudes,
        })
    }

    /// Whether the ground at the given cell is higher than the ceiling.
    pub fn is_above_ceiling(&self, cell: Coordinate) -> bool {
        self.altitudes
            .get(cell)
            .is_some_and(|a| *a > self.params.ceiling)
    }

    /// Whether the drone can fly over the given cell.
    pub fn is_traversable(&self, cell: Coordinate) -> bool {
        self.altitudes
            .get(cell)
            .is_some_and(|a| *a <= self.params.ceiling)
    }

    /// Return the terrain in the file format accepted by [`Terrain::parse`].
    pub fn to_text(&self) -> String {
        let p: &FlightParameters = &self.params;
        let mut s: String = format!(
            "{} {} {}\n{} {} {} {}\n",
            p.ceiling,
            p.start.x,
            p.start.y,
            p.target.x,
            p.target.y,
            self.altitudes.height,
            self.altitudes.width
        );
        for row in self.altitudes.rows() {
            let r: Vec<String> = row.iter().map(|a| a.to_string()).collect();
            s.push_str(&r.join(" "));
            s.push('\n');
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_header_and_grid() {
        let t: Terrain = Terrain::parse("4 0 0\n2 1 2 3\n0 1 9\n2 3 4\n").unwrap();
        assert_eq!(t.params.ceiling, 4);
        assert_eq!(t.params.start, Coordinate::new(0, 0));
        assert_eq!(t.params.target, Coordinate::new(2, 1));
        assert_eq!(t.altitudes.width, 3);
        assert_eq!(t.altitudes.height, 2);
        assert!(t.is_above_ceiling(Coordinate::new(2, 0)));
        assert!(t.is_traversable(Coordinate::new(2, 1)));
        assert!(!t.is_traversable(Coordinate::new(3, 1)));
    }

    #[test]
    fn blank_lines_and_negative_altitudes() {
        let t: Terrain = Terrain::parse("\n1 0 0\n\n1 0 1 2\n\n-3 0\n\n").unwrap();
        assert_eq!(t.altitudes.get(Coordinate::new(0, 0)), Some(&-3));
    }

    #[test]
    fn to_text_parses_back() {
        let source: &str = "4 0 0\n2 1 2 3\n0 1 9\n2 3 4\n";
        let t: Terrain = Terrain::parse(source).unwrap();
        assert_eq!(t.to_text(), source);
    }

    #[test]
    fn missing_header_value() {
        match Terrain::parse("4 0\n2 1 2 3\n") {
            Err(TerrainError::MissingValue { line: 1, field }) => assert_eq!(field, "start y"),
            other => panic!("unexpected result: {other:?}"),
        }
        match Terrain::parse("4 0 0\n") {
            Err(TerrainError::MissingValue { line: 2, .. }) => (),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_numbers() {
        match Terrain::parse("a 0 0\n0 0 1 1\n0\n") {
            Err(TerrainError::InvalidNumber { line: 1, value, .. }) => assert_eq!(value, "a"),
            other => panic!("unexpected result: {other:?}"),
        }
        match Terrain::parse("1 0 0\n0 0 1 2\n0 x\n") {
            Err(TerrainError::InvalidNumber { line: 3, field, .. }) => {
                assert_eq!(field, "altitude")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn grid_must_match_dimensions() {
        assert!(matches!(
            Terrain::parse("1 0 0\n0 0 2 2\n0 0\n"),
            Err(TerrainError::MissingRows {
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            Terrain::parse("1 0 0\n0 0 1 2\n0 0 0 0\n"),
            Err(TerrainError::RowLength {
                line: 3,
                expected: 2,
                found: 4
            })
        ));
        assert!(matches!(
            Terrain::parse("1 0 0\n0 0 1 2\n0\n"),
            Err(TerrainError::RowLength { found: 1, .. })
        ));
        assert!(matches!(
            Terrain::parse("1 0 0\n0 0 0 2\n"),
            Err(TerrainError::EmptyGrid)
        ));
    }

    #[test]
    fn huge_dimensions() {
        let source: String = format!("1 0 0\n0 0 {} 1\n0\n", usize::MAX);
        assert!(matches!(
            Terrain::parse(&source),
            Err(TerrainError::MissingRows { found: 1, .. })
        ));

        let source: String = format!("1 0 0\n0 0 1 {}\n0\n", usize::MAX);
        assert!(matches!(
            Terrain::parse(&source),
            Err(TerrainError::RowLength {
                line: 3,
                found: 1,
                ..
            })
        ));

        let source: String = format!("1 0 0\n0 0 {} 2\n0 0\n", usize::MAX);
        assert!(matches!(
            Terrain::parse(&source),
            Err(TerrainError::TooLarge { cols: 2, .. })
        ));
    }

    #[test]
    fn start_must_be_inside() {
        assert!(matches!(
            Terrain::parse("1 2 0\n0 0 1 2\n0 0\n"),
            Err(TerrainError::StartOutside { .. })
        ));
        // An unreachable target is not a parsing error
        assert!(Terrain::parse("1 0 0\n5 5 1 2\n0 0\n").is_ok());
    }
}
