/*
generator.rs

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

//! Generate random terrains.
//!
//! Developers use these terrains to exercise the planner and the validator.
//! Altitudes are drawn uniformly between `0` and the maximum altitude.
//! The starting cell and the target are always at or under the ceiling.
//!
//! When [`TerrainGenerator::solvable`] is set, the generator draws terrains until the planner
//! finds a route, and gives up after [`MAX_GENERATE_ATTEMPTS`] terrains.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fmt;

use crate::config::{MAX_GENERATE_ATTEMPTS, MAX_GENERATE_CELLS};
use crate::grid::{Coordinate, Grid};
use crate::planner;
use crate::terrain::{FlightParameters, Terrain};

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum GenerateError {
    /// Zero rows or zero columns.
    EmptyGrid,

    /// More than [`MAX_GENERATE_CELLS`] cells.
    TooLarge { rows: usize, cols: usize },

    /// The ceiling or the maximum altitude is negative.
    NegativeAltitude,

    /// The start or the target is outside the grid.
    OutsideGrid(Coordinate),

    /// No solvable terrain found after the maximum number of attempts.
    AttemptsExceeded,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerateError::EmptyGrid => write!(f, "the terrain must have at least one cell"),
            GenerateError::TooLarge { rows, cols } => write!(
                f,
                "a {rows}x{cols} terrain has more than {MAX_GENERATE_CELLS} cells"
            ),
            GenerateError::NegativeAltitude => {
                write!(f, "the ceiling and the maximum altitude cannot be negative")
            }
            GenerateError::OutsideGrid(c) => write!(f, "position {c} is outside the terrain"),
            GenerateError::AttemptsExceeded => write!(
                f,
                "no solvable terrain found after {MAX_GENERATE_ATTEMPTS} attempts"
            ),
        }
    }
}

impl Error for GenerateError {}

/// [`TerrainGenerator`] object.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    pub rows: usize,
    pub cols: usize,

    /// Ceiling written in the terrain header.
    pub ceiling: i64,

    /// Highest altitude a cell can get.
    pub max_altitude: i64,

    /// Starting cell. Defaults to the top left corner.
    pub start: Option<Coordinate>,

    /// Target. Defaults to the bottom right corner.
    pub target: Option<Coordinate>,

    /// Whether the terrain must have a route from the start to the target.
    pub solvable: bool,

    /// Number of terrains drawn by the last call to [`TerrainGenerator::generate`].
    pub iteration: usize,
}

impl TerrainGenerator {
    /// Create a [`TerrainGenerator`] object.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ceiling: 5,
            max_altitude: 9,
            start: None,
            target: None,
            solvable: false,
            iteration: 0,
        }
    }

    /// Generate a terrain. With a seed, the same parameters always give the same terrain.
    pub fn generate(&mut self, seed: Option<u64>) -> Result<Terrain, GenerateError> {
        match seed {
            Some(s) => self.generate_with(&mut StdRng::seed_from_u64(s)),
            None => self.generate_with(&mut rand::rng()),
        }
    }

    /// Generate a terrain by using the given random number generator.
    pub fn generate_with<R: Rng>(&mut self, rng: &mut R) -> Result<Terrain, GenerateError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GenerateError::EmptyGrid);
        }
        if self
            .rows
            .checked_mul(self.cols)
            .is_none_or(|n| n > MAX_GENERATE_CELLS)
        {
            return Err(GenerateError::TooLarge {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.ceiling < 0 || self.max_altitude < 0 {
            return Err(GenerateError::NegativeAltitude);
        }
        let start: Coordinate = self.start.unwrap_or_default();
        let target: Coordinate = self
            .target
            .unwrap_or(Coordinate::new(self.cols - 1, self.rows - 1));
        for c in [start, target] {
            if c.x >= self.cols || c.y >= self.rows {
                return Err(GenerateError::OutsideGrid(c));
            }
        }

        let params: FlightParameters = FlightParameters {
            ceiling: self.ceiling,
            start,
            target,
        };
        let low: i64 = self.ceiling.min(self.max_altitude);

        self.iteration = 0;
        while self.iteration < MAX_GENERATE_ATTEMPTS {
            self.iteration += 1;

            let mut altitudes: Grid<i64> = Grid::filled(self.cols, self.rows, 0);
            for y in 0..self.rows {
                for x in 0..self.cols {
                    altitudes.set(Coordinate::new(x, y), rng.random_range(0..=self.max_altitude));
                }
            }
            altitudes.set(start, rng.random_range(0..=low));
            altitudes.set(target, rng.random_range(0..=low));

            let terrain: Terrain = Terrain { params, altitudes };
            if !self.solvable || planner::find_route(&terrain).is_ok() {
                debug!("Terrain generated after {} attempts", self.iteration);
                return Ok(terrain);
            }
        }
        Err(GenerateError::AttemptsExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_terrain() {
        let mut g: TerrainGenerator = TerrainGenerator::new(6, 8);
        let a: Terrain = g.generate(Some(42)).unwrap();
        let b: Terrain = g.generate(Some(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.altitudes.width, 8);
        assert_eq!(a.altitudes.height, 6);
    }

    #[test]
    fn altitudes_within_range_and_endpoints_flyable() {
        let mut g: TerrainGenerator = TerrainGenerator::new(10, 10);
        g.ceiling = 2;
        g.max_altitude = 20;
        g.start = Some(Coordinate::new(3, 4));
        g.target = Some(Coordinate::new(9, 0));
        for seed in 0..20 {
            let t: Terrain = g.generate(Some(seed)).unwrap();
            assert!(t.altitudes.iter().all(|(_, a)| (0..=20).contains(a)));
            assert!(t.is_traversable(Coordinate::new(3, 4)));
            assert!(t.is_traversable(Coordinate::new(9, 0)));
            assert_eq!(t.params.target, Coordinate::new(9, 0));
        }
    }

    #[test]
    fn output_parses_back() {
        let mut g: TerrainGenerator = TerrainGenerator::new(3, 5);
        let t: Terrain = g.generate(Some(7)).unwrap();
        assert_eq!(Terrain::parse(&t.to_text()).unwrap(), t);
        assert_eq!(t.params.target, Coordinate::new(4, 2));
    }

    #[test]
    fn solvable_terrain_has_a_route() {
        let mut g: TerrainGenerator = TerrainGenerator::new(8, 8);
        g.solvable = true;
        for seed in 0..5 {
            let t: Terrain = g.generate(Some(seed)).unwrap();
            assert!(planner::find_route(&t).is_ok());
            assert!(g.iteration >= 1);
        }
    }

    #[test]
    fn solvable_search_retries() {
        let mut g: TerrainGenerator = TerrainGenerator::new(1, 3);
        g.ceiling = 0;
        g.max_altitude = 0;
        assert!(g.generate(Some(1)).is_ok());
        assert_eq!(g.iteration, 1);

        // The middle cell is above the ceiling half of the time
        g.solvable = true;
        g.max_altitude = 1;
        for seed in 0..10 {
            let t: Terrain = g.generate(Some(seed)).unwrap();
            assert_eq!(t.altitudes.get(Coordinate::new(1, 0)), Some(&0));
        }
    }

    #[test]
    fn invalid_parameters() {
        assert_eq!(
            TerrainGenerator::new(0, 3).generate(Some(1)),
            Err(GenerateError::EmptyGrid)
        );

        assert_eq!(
            TerrainGenerator::new(usize::MAX, 2).generate(Some(1)),
            Err(GenerateError::TooLarge {
                rows: usize::MAX,
                cols: 2
            })
        );
        assert!(matches!(
            TerrainGenerator::new(1 << 13, 1 << 12).generate(Some(1)),
            Err(GenerateError::TooLarge { .. })
        ));

        let mut g: TerrainGenerator = TerrainGenerator::new(2, 2);
        g.ceiling = -1;
        assert_eq!(g.generate(Some(1)), Err(GenerateError::NegativeAltitude));

        let mut g: TerrainGenerator = TerrainGenerator::new(2, 2);
        g.target = Some(Coordinate::new(2, 0));
        assert_eq!(
            g.generate(Some(1)),
            Err(GenerateError::OutsideGrid(Coordinate::new(2, 0)))
        );
    }
}
