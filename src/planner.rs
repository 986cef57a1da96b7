/*
planner.rs

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

//! Compute a flight path for a terrain.
//!
//! The planner runs a depth-first search from the starting cell to the target, over the cells
//! that are not higher than the ceiling.
//! Neighbors are explored in the same order as the validator walk (right, left, down, up), and
//! each cell is explored only once.
//! The search stack is kept explicitly so that large terrains do not overflow the call stack.

use log::debug;
use std::error::Error;
use std::fmt;

use crate::flight_path::{Label, PathGrid};
use crate::grid::{Coordinate, Grid};
use crate::terrain::Terrain;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum PlanError {
    /// The starting cell is higher than the ceiling.
    StartBlocked(Coordinate),

    /// The target is outside the terrain or higher than the ceiling.
    TargetBlocked(Coordinate),

    /// No possible path.
    NoPath,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlanError::StartBlocked(c) => {
                write!(f, "the starting position {c} is above the ceiling")
            }
            PlanError::TargetBlocked(c) => {
                write!(f, "the target {c} is outside the terrain or above the ceiling")
            }
            PlanError::NoPath => write!(f, "no path from the start to the target"),
        }
    }
}

impl Error for PlanError {}

/// Return the list of cells from the start to the target, both included.
pub fn find_route(terrain: &Terrain) -> Result<Vec<Coordinate>, PlanError> {
    let start: Coordinate = terrain.params.start;
    let target: Coordinate = terrain.params.target;

    if !terrain.is_traversable(start) {
        return Err(PlanError::StartBlocked(start));
    }
    if !terrain.is_traversable(target) {
        return Err(PlanError::TargetBlocked(target));
    }

    let altitudes: &Grid<i64> = &terrain.altitudes;
    let mut explored: Grid<bool> = Grid::filled(altitudes.width, altitudes.height, false);
    let mut iteration: usize = 0;

    // Each entry is a cell of the current route and the number of its neighbors already tried
    let mut stack: Vec<(Coordinate, usize)> = vec![(start, 0)];
    explored.set(start, true);

    while let Some(top) = stack.last_mut() {
        let (cell, tried) = *top;
        if cell == target {
            break;
        }
        iteration += 1;

        let neighbors: Vec<Coordinate> = altitudes.neighbors(cell).collect();
        match neighbors.get(tried) {
            None => {
                stack.pop();
            }
            Some(n) => {
                top.1 += 1;
                if terrain.is_traversable(*n) && explored.get(*n) == Some(&false) {
                    explored.set(*n, true);
                    stack.push((*n, 0));
                }
            }
        }
    }
    debug!("Iterations = {iteration}  Route length = {}", stack.len());

    if stack.is_empty() {
        return Err(PlanError::NoPath);
    }
    Ok(stack.into_iter().map(|(c, _)| c).collect())
}

/// Compute a path grid that the validator accepts.
///
/// The cells of the route are labeled with their step number, and all the other cells are
/// obstacles.
pub fn plan(terrain: &Terrain) -> Result<PathGrid, PlanError> {
    let route: Vec<Coordinate> = find_route(terrain)?;
    let mut path: PathGrid = PathGrid::new(terrain.altitudes.width, terrain.altitudes.height);

    for (step, cell) in route.into_iter().enumerate() {
        path.labels.set(cell, Label::Step(step));
    }
    path.labels.debug("Planned path", |l| l.to_string());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationPolicy;
    use crate::report::Report;
    use crate::validator::Validator;

    #[test]
    fn route_around_a_wall() {
        let t: Terrain = Terrain::parse("3 0 0\n0 2 3 3\n0 9 0\n0 9 0\n0 0 0\n").unwrap();
        let route: Vec<Coordinate> = find_route(&t).unwrap();
        assert_eq!(route.first(), Some(&Coordinate::new(0, 0)));
        assert_eq!(route.last(), Some(&Coordinate::new(0, 2)));
        assert!(!route.contains(&Coordinate::new(1, 0)));
        assert!(!route.contains(&Coordinate::new(1, 1)));

        // Consecutive cells are orthogonal neighbors
        for w in route.windows(2) {
            assert_eq!(w[0].x.abs_diff(w[1].x) + w[0].y.abs_diff(w[1].y), 1);
        }
    }

    #[test]
    fn planned_path_is_accepted() {
        let terrains: [&str; 3] = [
            "1 0 0\n1 0 1 2\n0 0\n",
            "3 0 0\n0 2 3 3\n0 9 0\n0 9 0\n0 0 0\n",
            "2 3 0\n1 3 4 4\n0 0 0 0\n0 5 5 0\n0 0 5 0\n5 0 0 0\n",
        ];
        for source in terrains {
            let t: Terrain = Terrain::parse(source).unwrap();
            let p: PathGrid = plan(&t).unwrap();
            let r: Report = Validator::new(&t, &p, ValidationPolicy::default()).validate();
            assert!(r.is_valid(), "{source}: {:?}\n{}", r.violations, p.to_text());
        }
    }

    #[test]
    fn plan_output() {
        let t: Terrain = Terrain::parse("1 0 0\n2 0 1 3\n0 0 0\n").unwrap();
        assert_eq!(plan(&t).unwrap().to_text(), "0 1 2\n");

        let t: Terrain = Terrain::parse("1 0 0\n1 0 2 2\n0 0\n0 0\n").unwrap();
        assert_eq!(plan(&t).unwrap().to_text(), "0 1\n# #\n");
    }

    #[test]
    fn blocked_routes() {
        let t: Terrain = Terrain::parse("1 0 0\n2 0 1 3\n0 9 0\n").unwrap();
        assert_eq!(find_route(&t), Err(PlanError::NoPath));

        let t: Terrain = Terrain::parse("1 0 0\n1 0 1 2\n9 0\n").unwrap();
        assert_eq!(
            find_route(&t),
            Err(PlanError::StartBlocked(Coordinate::new(0, 0)))
        );

        let t: Terrain = Terrain::parse("1 0 0\n5 0 1 2\n0 0\n").unwrap();
        assert_eq!(
            find_route(&t),
            Err(PlanError::TargetBlocked(Coordinate::new(5, 0)))
        );
    }
}
