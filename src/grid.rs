/*
grid.rs

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

//! Rectangular cell matrix shared by the terrain, the flight path, and the visited state.
//!
//! Cells are addressed with a [`Coordinate`], where `x` is the column and `y` is the row.
//! Moves are restricted to the four orthogonal [`Direction`]s.

use log::{Level, debug, log_enabled};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell coordinates.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Column.
    pub x: usize,

    /// Row.
    pub y: usize,
}

impl Coordinate {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Orthogonal moves.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    /// Order in which the neighbors of a cell are searched.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Column and row offsets for the move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Up => (0, -1),
        }
    }
}

/// Matrix of cells stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    /// Number of columns.
    pub width: usize,

    /// Number of rows.
    pub height: usize,

    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a [`Grid`] object with all the cells set to the given value.
    ///
    /// The dimensions come from an existing grid or from validated parameters: `width * height`
    /// must not overflow.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Create a [`Grid`] object from a list of rows.
    ///
    /// Return [`None`] if the rows do not all have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let height: usize = rows.len();
        let width: usize = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Whether the coordinates are inside the grid.
    pub fn contains(&self, cell: Coordinate) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Get the cell at the given coordinates.
    pub fn get(&self, cell: Coordinate) -> Option<&T> {
        if self.contains(cell) {
            self.cells.get(cell.y * self.width + cell.x)
        } else {
            None
        }
    }

    /// Replace the value of the cell. Coordinates outside the grid are ignored.
    pub fn set(&mut self, cell: Coordinate, value: T) {
        if self.contains(cell) {
            let width: usize = self.width;
            self.cells[cell.y * width + cell.x] = value;
        }
    }

    /// Return the cell next to the given one in the given direction, or [`None`] if the move
    /// leaves the grid.
    pub fn step(&self, cell: Coordinate, direction: Direction) -> Option<Coordinate> {
        let (dx, dy) = direction.delta();
        let next: Coordinate = Coordinate {
            x: cell.x.checked_add_signed(dx)?,
            y: cell.y.checked_add_signed(dy)?,
        };
        if self.contains(next) { Some(next) } else { None }
    }

    /// Iterate over the in-bounds neighbors of a cell, in [`Direction::SEARCH_ORDER`].
    pub fn neighbors(&self, cell: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        Direction::SEARCH_ORDER
            .into_iter()
            .filter_map(move |d| self.step(cell, d))
    }

    /// Iterate over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // `max(1)` because `chunks` does not accept a zero size
        self.cells.chunks(self.width.max(1))
    }

    /// Iterate over the grid in row-major order.
    ///
    /// # Example:
    ///
    /// ```
    /// for (cell, altitude) in terrain.altitudes.iter().filter(|(_, a)| **a > ceiling) {
    ///     println!("{cell} -> {altitude}");
    /// }
    /// ```
    pub fn iter(&self) -> GridIterator<'_, T> {
        GridIterator {
            grid: self,
            index: 0,
        }
    }

    /// Print the grid at the debug log level.
    pub fn debug(&self, title: &str, render: impl Fn(&T) -> String) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        debug!("{title}: {} x {}", self.width, self.height);
        let mut s: String = String::new();
        for row in self.rows() {
            s.clear();
            for c in row {
                s.push_str(&format!("{:>4}", render(c)));
            }
            debug!("{s}");
        }
    }
}

/// Iterator for the grid cells.
pub struct GridIterator<'a, T> {
    grid: &'a Grid<T>,
    index: usize,
}

/// Iterator implementation.
impl<'a, T> Iterator for GridIterator<'a, T> {
    type Item = (Coordinate, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let value: &T = self.grid.cells.get(self.index)?;
        let cell: Coordinate = Coordinate {
            x: self.index % self.grid.width,
            y: self.index / self.grid.width,
        };
        self.index += 1;
        Some((cell, value))
    }
}
