/*
config.rs

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

//! Constants and validation policy.
//!
//! The [`ValidationPolicy`] object decides, for each check, whether the validator stops at the
//! first violation or reports all of them, and how malformed path rows are handled.
//! The policy can be loaded from a JSON file:
//!
//! ```json
//! {
//!     "rows": "lenient",
//!     "overflight": "collect-all",
//!     "isolation": "collect-all"
//! }
//! ```
//!
//! Missing fields take their default values.

use log::debug;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Token that marks a cell the drone must not occupy.
pub const OBSTACLE: &str = "#";

/// Text displayed by `--version`.
pub const COPYRIGHT_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nCopyright 2025 Hervé Quatremain\n",
    "License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>"
);

/// Number of random terrains the generator tries before giving up on a solvable one.
pub const MAX_GENERATE_ATTEMPTS: usize = 1000;

/// Largest number of cells of a generated terrain.
pub const MAX_GENERATE_CELLS: usize = 1 << 24;

/// How a check reports its violations.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
    /// Stop at the first violation.
    FailFast,

    /// Scan the whole grid and report every violation.
    CollectAll,
}

/// What to do with path rows that do not have the expected number of tokens.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RowPolicy {
    /// A malformed row makes the path invalid.
    Strict,

    /// A malformed row is reported and the checks run anyway. Extra tokens are ignored.
    Lenient,
}

/// Validation settings.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Handling of malformed path rows.
    pub rows: RowPolicy,

    /// Reporting mode of the overflight check.
    pub overflight: ReportMode,

    /// Reporting mode of the isolation check.
    pub isolation: ReportMode,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            rows: RowPolicy::Strict,
            overflight: ReportMode::CollectAll,
            isolation: ReportMode::FailFast,
        }
    }
}

impl ValidationPolicy {
    /// Load the policy from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        debug!("Policy file: {path:?}");
        let file: File = File::open(path)?;
        let reader: BufReader<File> = BufReader::new(file);
        let policy: ValidationPolicy = serde_json::from_reader(reader)?;
        debug!("Policy: {policy:?}");
        Ok(policy)
    }

    /// Report every violation, for all the checks that support it.
    pub fn collect_all(&mut self) {
        self.overflight = ReportMode::CollectAll;
        self.isolation = ReportMode::CollectAll;
    }
}
