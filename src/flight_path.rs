/*
flight_path.rs

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

//! Claimed flight path.
//!
//! A path file has one line per terrain row, and one token per terrain column:
//!
//! ```text
//! 0 1 #
//! # 2 3
//! ```
//!
//! - `#` marks a cell the drone does not fly over.
//! - A number is the step at which the drone is over the cell. The first step is `0`.
//!
//! Loading is done in two stages so that the caller decides what to do with malformed rows:
//! [`PathSource`] keeps the raw lines and reports the rows that do not have the expected number
//! of tokens, and [`PathSource::to_grid`] builds the [`PathGrid`].

use log::debug;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::OBSTACLE;
use crate::grid::{Coordinate, Grid};
use crate::report::Violation;

/// Type of errors.
#[derive(Debug)]
pub enum PathGridError {
    /// The path file cannot be read.
    Io { path: PathBuf, error: io::Error },

    /// The file has fewer rows than the terrain.
    MissingRows { expected: usize, found: usize },

    /// A row has fewer tokens than the terrain has columns.
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A token is neither the obstacle marker nor a step number.
    InvalidToken {
        line: usize,
        column: usize,
        token: String,
    },
}

impl fmt::Display for PathGridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathGridError::Io { path, error } => {
                write!(f, "cannot read path file {}: {error}", path.display())
            }
            PathGridError::MissingRows { expected, found } => {
                write!(f, "expected {expected} path rows, found {found}")
            }
            PathGridError::ShortRow {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected {expected} tokens, found {found}"),
            PathGridError::InvalidToken {
                line,
                column,
                token,
            } => write!(
                f,
                "line {line}, column {column}: '{token}' is neither '{OBSTACLE}' nor a step number"
            ),
        }
    }
}

impl Error for PathGridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PathGridError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Content of a path cell.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Label {
    #[default]
    Obstacle,
    Step(usize),
}

impl Label {
    /// Convert a token from the path file.
    ///
    /// A step number must be written in decimal digits only, without a sign and without
    /// leading zeros, so that `+1` or `01` do not stand for step `1`.
    pub fn parse(token: &str) -> Option<Self> {
        if token == OBSTACLE {
            return Some(Label::Obstacle);
        }
        let canonical: bool = !token.is_empty()
            && token.bytes().all(|b| b.is_ascii_digit())
            && (token == "0" || !token.starts_with('0'));
        if !canonical {
            return None;
        }
        token.parse().ok().map(Label::Step)
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, Label::Obstacle)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Label::Obstacle => write!(f, "{OBSTACLE}"),
            Label::Step(n) => write!(f, "{n}"),
        }
    }
}

/// Raw lines of a path file.
#[derive(Debug, Clone)]
pub struct PathSource {
    /// Non-blank lines with their line number (starting at 1).
    lines: Vec<(usize, String)>,
}

impl PathSource {
    /// Keep the non-blank lines of the source.
    pub fn parse(source: &str) -> Self {
        Self {
            lines: source
                .lines()
                .enumerate()
                .filter(|(_, l)| !l.trim().is_empty())
                .map(|(i, l)| (i + 1, l.to_string()))
                .collect(),
        }
    }

    /// Read a path file.
    pub fn load(path: &Path) -> Result<Self, PathGridError> {
        debug!("Path file: {path:?}");
        let source: String = fs::read_to_string(path).map_err(|error| PathGridError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Ok(Self::parse(&source))
    }

    /// Return a violation for each line that does not have `cols` tokens.
    ///
    /// All the lines are inspected, including the lines after the expected last row.
    pub fn malformed_rows(&self, cols: usize) -> Vec<Violation> {
        self.lines
            .iter()
            .map(|(n, l)| (*n, l.split_whitespace().count()))
            .filter(|(_, found)| *found != cols)
            .map(|(line, found)| Violation::MalformedRow {
                line,
                expected: cols,
                found,
            })
            .collect()
    }

    /// Build the path grid from the first `rows` lines.
    ///
    /// Tokens after the `cols`th token of a line are ignored.
    ///
    /// # Errors
    ///
    /// The method returns an error if there are fewer than `rows` lines, if a line has fewer than
    /// `cols` tokens, or if a token is not valid.
    pub fn to_grid(&self, rows: usize, cols: usize) -> Result<PathGrid, PathGridError> {
        if self.lines.len() < rows {
            return Err(PathGridError::MissingRows {
                expected: rows,
                found: self.lines.len(),
            });
        }

        let mut label_rows: Vec<Vec<Label>> = Vec::with_capacity(rows);
        for (n, l) in self.lines.iter().take(rows) {
            let tokens: Vec<&str> = l.split_whitespace().collect();
            if tokens.len() < cols {
                return Err(PathGridError::ShortRow {
                    line: *n,
                    expected: cols,
                    found: tokens.len(),
                });
            }
            let row: Vec<Label> = tokens
                .iter()
                .take(cols)
                .enumerate()
                .map(|(i, t)| {
                    Label::parse(t).ok_or_else(|| PathGridError::InvalidToken {
                        line: *n,
                        column: i + 1,
                        token: t.to_string(),
                    })
                })
                .collect::<Result<Vec<Label>, PathGridError>>()?;
            label_rows.push(row);
        }

        // Every row has exactly `cols` labels at this point
        let labels: Grid<Label> = Grid::from_rows(label_rows)
            .unwrap_or_else(|| Grid::filled(cols, rows, Label::Obstacle));
        labels.debug("Path", |l| l.to_string());
        Ok(PathGrid { labels })
    }
}

/// Path grid object.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGrid {
    pub labels: Grid<Label>,
}

impl PathGrid {
    /// Create a [`PathGrid`] object with only obstacles.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            labels: Grid::filled(width, height, Label::Obstacle),
        }
    }

    /// Return the label of a cell, or [`None`] for a cell outside the grid.
    pub fn label(&self, cell: Coordinate) -> Option<Label> {
        self.labels.get(cell).copied()
    }

    /// Whether the cell is an obstacle. Cells outside the grid are obstacles.
    pub fn is_obstacle(&self, cell: Coordinate) -> bool {
        self.label(cell).is_none_or(|l| l.is_obstacle())
    }

    /// Return the path in the file format accepted by [`PathSource::parse`].
    pub fn to_text(&self) -> String {
        let mut s: String = String::new();
        for row in self.labels.rows() {
            let r: Vec<String> = row.iter().map(|l| l.to_string()).collect();
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
    fn labels() {
        assert_eq!(Label::parse("#"), Some(Label::Obstacle));
        assert_eq!(Label::parse("12"), Some(Label::Step(12)));
        assert_eq!(Label::parse("-1"), None);
        assert_eq!(Label::parse("x"), None);
        assert_eq!(Label::parse("0"), Some(Label::Step(0)));
        assert_eq!(Label::parse("10"), Some(Label::Step(10)));
        assert_eq!(Label::parse("+1"), None);
        assert_eq!(Label::parse("01"), None);
        assert_eq!(Label::parse("00"), None);
        assert_eq!(Label::parse(""), None);
        assert_eq!(Label::Step(3).to_string(), "3");
    }

    #[test]
    fn build_grid() {
        let source: PathSource = PathSource::parse("0 1 #\n\n# 2 3\n");
        assert!(source.malformed_rows(3).is_empty());

        let grid: PathGrid = source.to_grid(2, 3).unwrap();
        assert_eq!(grid.label(Coordinate::new(1, 0)), Some(Label::Step(1)));
        assert_eq!(grid.label(Coordinate::new(0, 1)), Some(Label::Obstacle));
        assert!(grid.is_obstacle(Coordinate::new(3, 0)));
        assert!(!grid.is_obstacle(Coordinate::new(2, 1)));
        assert_eq!(grid.to_text(), "0 1 #\n# 2 3\n");
    }

    #[test]
    fn malformed_rows_use_file_line_numbers() {
        let source: PathSource = PathSource::parse("0 1 #\n\n# 2\n# # # #\n4 5 6\n");
        assert_eq!(
            source.malformed_rows(3),
            vec![
                Violation::MalformedRow {
                    line: 3,
                    expected: 3,
                    found: 2
                },
                Violation::MalformedRow {
                    line: 4,
                    expected: 3,
                    found: 4
                },
            ]
        );
    }

    #[test]
    fn long_rows_are_truncated() {
        let source: PathSource = PathSource::parse("0 1 2\n");
        let grid: PathGrid = source.to_grid(1, 2).unwrap();
        assert_eq!(grid.labels.width, 2);
        assert_eq!(grid.to_text(), "0 1\n");
    }

    #[test]
    fn grid_errors() {
        assert!(matches!(
            PathSource::parse("0 1\n").to_grid(2, 2),
            Err(PathGridError::MissingRows {
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            PathSource::parse("0 1\n#\n").to_grid(2, 2),
            Err(PathGridError::ShortRow {
                line: 2,
                expected: 2,
                found: 1
            })
        ));
        match PathSource::parse("0 one\n").to_grid(1, 2) {
            Err(PathGridError::InvalidToken {
                line: 1,
                column: 2,
                token,
            }) => assert_eq!(token, "one"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
