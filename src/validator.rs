/*
validator.rs

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

//! Verify a claimed flight path against a terrain.
//!
//! The checks run in the following order and the first failing check stops the validation:
//!
//! 1. Row shape: every path row must have one token per terrain column (see
//!    [`crate::config::RowPolicy`]).
//! 2. Overflight: every cell higher than the ceiling must be an obstacle (`#`).
//! 3. Isolation: every cell that is not an obstacle must have at least one orthogonal neighbor
//!    that is not an obstacle.
//! 4. Walk: from the starting cell, follow the cells labeled `0`, `1`, `2`... with orthogonal
//!    moves until the target is reached.
//!
//! Whether the overflight and isolation checks stop at the first violation is controlled by the
//! [`ValidationPolicy`] object. The walk always stops at the first wrong cell.

use log::{debug, info};

use crate::config::{ReportMode, RowPolicy, ValidationPolicy};
use crate::flight_path::{Label, PathGrid, PathGridError, PathSource};
use crate::grid::{Coordinate, Grid};
use crate::report::{Report, Violation};
use crate::terrain::Terrain;

/// Validate the path lines against the terrain.
///
/// # Errors
///
/// The function returns an error when the path grid cannot be built: missing rows, short rows
/// in lenient mode, or invalid tokens. Rule violations are not errors; they are listed in the
/// returned [`Report`] object.
pub fn check(
    terrain: &Terrain,
    source: &PathSource,
    policy: &ValidationPolicy,
) -> Result<Report, PathGridError> {
    let mut report: Report = Report::new();
    let width: usize = terrain.altitudes.width;
    let height: usize = terrain.altitudes.height;

    let malformed: Vec<Violation> = source.malformed_rows(width);
    if !malformed.is_empty() {
        info!("{} path rows do not have {width} tokens", malformed.len());
        match policy.rows {
            RowPolicy::Strict => {
                for v in malformed {
                    report.push(v);
                }
                return Ok(report);
            }
            RowPolicy::Lenient => {
                for v in malformed {
                    report.warn(v);
                }
            }
        }
    }

    let path: PathGrid = source.to_grid(height, width)?;
    Validator::new(terrain, &path, *policy).run(&mut report);
    Ok(report)
}

/// Validator object.
///
/// The terrain and the path grid must have the same dimensions.
pub struct Validator<'a> {
    terrain: &'a Terrain,
    path: &'a PathGrid,
    policy: ValidationPolicy,
}

impl<'a> Validator<'a> {
    /// Create a [`Validator`] object.
    pub fn new(terrain: &'a Terrain, path: &'a PathGrid, policy: ValidationPolicy) -> Self {
        Self {
            terrain,
            path,
            policy,
        }
    }

    /// Run all the checks and return the result.
    pub fn validate(&self) -> Report {
        let mut report: Report = Report::new();
        self.run(&mut report);
        report
    }

    /// Run all the checks and add the violations to the given report.
    pub fn run(&self, report: &mut Report) {
        // Cells higher than the ceiling start as visited, so that the walk never enters them
        let mut visited: Grid<bool> = Grid::filled(
            self.terrain.altitudes.width,
            self.terrain.altitudes.height,
            false,
        );
        for (cell, _) in self
            .terrain
            .altitudes
            .iter()
            .filter(|(_, a)| **a > self.terrain.params.ceiling)
        {
            visited.set(cell, true);
        }

        if !self.check_overflight(&visited, report) {
            info!("Overflight check failed");
            return;
        }
        if !self.check_isolation(report) {
            info!("Isolation check failed");
            return;
        }
        if !self.walk(&mut visited, report) {
            info!("Walk failed after {} steps", report.steps);
            return;
        }
        info!("Target reached in {} steps", report.steps);
    }

    /// Verify that the cells higher than the ceiling are obstacles.
    fn check_overflight(&self, visited: &Grid<bool>, report: &mut Report) -> bool {
        let mut valid: bool = true;

        for (cell, _) in visited.iter().filter(|(_, v)| **v) {
            if self.path.is_obstacle(cell) {
                continue;
            }
            let altitude: i64 = self.terrain.altitudes.get(cell).copied().unwrap_or_default();
            debug!("Overflight at {cell}: altitude {altitude}");
            report.push(Violation::Overflight { cell, altitude });
            valid = false;
            if self.policy.overflight == ReportMode::FailFast {
                break;
            }
        }
        valid
    }

    /// Verify that no cell is isolated.
    fn check_isolation(&self, report: &mut Report) -> bool {
        let mut valid: bool = true;
        let labels: &Grid<Label> = &self.path.labels;

        for (cell, _) in labels.iter().filter(|(_, l)| !l.is_obstacle()) {
            if labels
                .neighbors(cell)
                .any(|n| !self.path.is_obstacle(n))
            {
                continue;
            }
            debug!("Isolated cell at {cell}");
            report.push(Violation::Isolated { cell });
            valid = false;
            if self.policy.isolation == ReportMode::FailFast {
                break;
            }
        }
        valid
    }

    /// Follow the step numbers from the starting cell to the target.
    ///
    /// At each step, the drone moves to the first unvisited neighbor (right, left, down, up)
    /// with the next step number. When there is no such neighbor the drone stays in place, and
    /// the next iteration fails because the cell does not have the new step number.
    /// Every move enters an unvisited cell, so the walk ends after at most one iteration per
    /// cell.
    fn walk(&self, visited: &mut Grid<bool>, report: &mut Report) -> bool {
        let target: Coordinate = self.terrain.params.target;
        let mut cell: Coordinate = self.terrain.params.start;
        let mut step: usize = 0;

        while cell != target {
            let label: Option<Label> = self.path.label(cell);
            if label != Some(Label::Step(step)) {
                debug!("Wrong path at {cell}: expected step {step}, found {label:?}");
                report.push(Violation::WrongPath {
                    cell,
                    expected: step,
                    found: label.map_or_else(|| String::from("?"), |l| l.to_string()),
                });
                report.steps = step;
                return false;
            }
            visited.set(cell, true);

            let next: Option<Coordinate> = self.path.labels.neighbors(cell).find(|n| {
                !visited.get(*n).copied().unwrap_or(true)
                    && self.path.label(*n) == Some(Label::Step(step + 1))
            });
            match next {
                Some(n) => cell = n,
                None => debug!("No cell with step {} next to {cell}", step + 1),
            }
            step += 1;
        }

        report.steps = step;
        report.reached_target = true;
        true
    }
}
