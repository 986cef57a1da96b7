/*
report.rs

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

//! Result of a validation run.
//!
//! The [`Report`] object lists the [`Violation`]s found by the validator.
//! Violations that do not invalidate the path (malformed rows in lenient mode) are kept apart as
//! warnings.
//! The report is printed as text, one line per violation, or as JSON by using [`serde`].

use chrono::{DateTime, Local};
use std::io::{self, Write};

use serde::Serialize;
use strum_macros::IntoStaticStr;

use crate::grid::Coordinate;
use crate::messages::Locale;

/// Rule violation.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Violation {
    /// A path row does not have one token per terrain column.
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The cell is higher than the ceiling but the path does not mark it as an obstacle.
    Overflight { cell: Coordinate, altitude: i64 },

    /// The cell is not an obstacle but none of its neighbors can be reached.
    Isolated { cell: Coordinate },

    /// The walk reached a cell that does not have the expected step number.
    WrongPath {
        cell: Coordinate,
        expected: usize,
        found: String,
    },
}

impl Violation {
    /// Short name of the violation type, such as `wrong-path`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Validation result.
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct Report {
    /// Violations that make the path invalid, in the order they were found.
    pub violations: Vec<Violation>,

    /// Violations that were reported but tolerated.
    pub warnings: Vec<Violation>,

    /// Number of moves the walk made before stopping.
    pub steps: usize,

    /// Whether the walk ended on the target.
    pub reached_target: bool,
}

/// JSON document for a validation run.
#[derive(Serialize)]
struct JsonReport<'a> {
    valid: bool,
    checked_at: String,
    terrain: &'a str,
    path: &'a str,
    #[serde(flatten)]
    report: &'a Report,
}

impl Report {
    /// Create a [`Report`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the path passed all the checks.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty() && self.reached_target
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn warn(&mut self, violation: Violation) {
        self.warnings.push(violation);
    }

    /// Write one line per warning and violation, and optionally a summary line.
    pub fn write_text(&self, out: &mut impl Write, locale: Locale, summary: bool) -> io::Result<()> {
        for v in self.warnings.iter().chain(self.violations.iter()) {
            writeln!(out, "{}", locale.violation(v))?;
        }
        if summary {
            writeln!(
                out,
                "{}",
                locale.summary(self.is_valid(), self.steps, self.violations.len())
            )?;
        }
        Ok(())
    }

    /// Write the report in JSON format.
    ///
    /// `terrain` and `path` are the names of the input files.
    pub fn write_json(&self, out: &mut impl Write, terrain: &str, path: &str) -> io::Result<()> {
        let now: DateTime<Local> = Local::now();
        let doc: JsonReport = JsonReport {
            valid: self.is_valid(),
            checked_at: now.to_rfc3339(),
            terrain,
            path,
            report: self,
        };
        serde_json::to_writer_pretty(&mut *out, &doc)?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample() -> Report {
        let mut r: Report = Report::new();
        r.warn(Violation::MalformedRow {
            line: 3,
            expected: 2,
            found: 3,
        });
        r.push(Violation::Isolated {
            cell: Coordinate::new(1, 0),
        });
        r
    }

    #[test]
    fn validity() {
        let mut r: Report = Report::new();
        assert!(!r.is_valid());
        r.reached_target = true;
        assert!(r.is_valid());
        r.warn(Violation::MalformedRow {
            line: 1,
            expected: 1,
            found: 2,
        });
        assert!(r.is_valid());
        r.push(Violation::Isolated {
            cell: Coordinate::new(0, 0),
        });
        assert!(!r.is_valid());
    }

    #[test]
    fn kind_names() {
        let v: Violation = Violation::WrongPath {
            cell: Coordinate::new(0, 0),
            expected: 1,
            found: "#".to_string(),
        };
        assert_eq!(v.kind(), "wrong-path");
        assert_eq!(
            Violation::Overflight {
                cell: Coordinate::new(0, 0),
                altitude: 3
            }
            .kind(),
            "overflight"
        );
    }

    #[test]
    fn text_output() {
        let mut out: Vec<u8> = Vec::new();
        sample().write_text(&mut out, Locale::En, true).unwrap();
        let text: String = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Invalid instance: line 3 has 3 values instead of 2",
                "Movement from position (1,0) is isolated",
                "Invalid path: 1 violation(s)",
            ]
        );
    }

    #[test]
    fn json_output() {
        let mut out: Vec<u8> = Vec::new();
        sample()
            .write_json(&mut out, "terrain.txt", "path.txt")
            .unwrap();
        let doc: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["valid"], Value::Bool(false));
        assert_eq!(doc["terrain"], "terrain.txt");
        assert_eq!(doc["violations"][0]["kind"], "isolated");
        assert_eq!(doc["violations"][0]["cell"]["x"], 1);
        assert_eq!(doc["warnings"][0]["kind"], "malformed-row");
        assert_eq!(doc["warnings"][0]["found"], 3);
        assert!(doc["checked_at"].is_string());
    }
}
