/*
cli_options.rs

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

//! Process command-line options.
//!
//! # Examples
//!
//! Verify a flight path:
//!
//! ```text
//! $ dronepath check --terrain terrain.txt --path path.txt
//! The drone cannot fly over position (2,0): altitude 9 is above the ceiling
//! $ echo $?
//! 1
//! ```
//!
//! Compute a flight path for a terrain:
//!
//! ```text
//! $ dronepath plan --terrain terrain.txt
//! 0 1 #
//! # 2 3
//! ```
//!
//! Generate a random terrain that has a route from the top left corner to the bottom right corner:
//!
//! ```text
//! $ dronepath generate --rows 4 --cols 6 --solvable --seed 12
//! ```
//!
//! Exit codes:
//!
//! - `0`: the path is valid, or the plan or the terrain has been written.
//! - `1`: the path is not valid.
//! - `2`: an input file cannot be read or parsed, or there is no route for the plan.

use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{COPYRIGHT_NOTICE, RowPolicy, ValidationPolicy};
use crate::flight_path::{PathGrid, PathSource};
use crate::generator::TerrainGenerator;
use crate::grid::Coordinate;
use crate::messages::Locale;
use crate::planner;
use crate::report::Report;
use crate::terrain::Terrain;
use crate::validator;

/// Exit code for a valid path.
pub const EXIT_VALID: u8 = 0;

/// Exit code for an invalid path.
pub const EXIT_INVALID: u8 = 1;

/// Exit code for unreadable input.
pub const EXIT_ERROR: u8 = 2;

/// Validate, plan, and generate drone flight paths.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Verify that a flight path is valid for a terrain
    Check(CheckArgs),

    /// Compute a valid flight path for a terrain
    Plan(PlanArgs),

    /// Generate a random terrain
    Generate(GenerateArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Terrain file (ceiling, start, target, dimensions, and altitudes)
    #[arg(short, long)]
    terrain: PathBuf,

    /// Flight path file (one `#` or step number per cell)
    #[arg(short, long)]
    path: PathBuf,

    /// Report malformed path rows but continue the validation
    #[arg(long, default_value_t = false)]
    lenient_rows: bool,

    /// Report all the overflight and isolation violations instead of stopping at the first one
    #[arg(long, default_value_t = false)]
    collect_all: bool,

    /// JSON file with the validation policy
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report in JSON format
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Language of the diagnostic messages
    #[arg(value_enum, short, long, default_value_t = Locale::En)]
    lang: Locale,

    /// Print a summary line after the diagnostic messages
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Args)]
struct PlanArgs {
    /// Terrain file
    #[arg(short, long)]
    terrain: PathBuf,

    /// Write the path to this file instead of the standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of rows
    #[arg(short, long)]
    rows: usize,

    /// Number of columns
    #[arg(short, long)]
    cols: usize,

    /// Maximum altitude the drone can fly over
    #[arg(long, default_value_t = 5)]
    ceiling: i64,

    /// Highest altitude of the generated cells
    #[arg(long, default_value_t = 9)]
    max_altitude: i64,

    /// Starting position, as `x,y` (defaults to the top left corner)
    #[arg(long, value_parser = parse_coordinate)]
    start: Option<Coordinate>,

    /// Target position, as `x,y` (defaults to the bottom right corner)
    #[arg(long, value_parser = parse_coordinate)]
    target: Option<Coordinate>,

    /// Only generate a terrain with a route from the start to the target
    #[arg(long, default_value_t = false)]
    solvable: bool,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Write the terrain to this file instead of the standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Parse an `x,y` command-line value.
fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("'{s}' is not in the x,y format"))?;
    let x: usize = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{x}'"))?;
    let y: usize = y.trim().parse().map_err(|_| format!("invalid row '{y}'"))?;
    Ok(Coordinate::new(x, y))
}

/// Write text to the given file, or to the standard output.
fn write_output(output: Option<&Path>, text: &str) -> Result<(), Box<dyn Error>> {
    match output {
        Some(p) => {
            debug!("Output file: {p:?}");
            let file: File = File::create(p)?;
            let mut writer: BufWriter<File> = BufWriter::new(file);
            writer.write_all(text.as_bytes())?;
            writer.flush()?;
        }
        None => {
            let mut out = io::stdout().lock();
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

/// Run the `check` command. Return whether the path is valid.
fn check(args: &CheckArgs) -> Result<bool, Box<dyn Error>> {
    let mut policy: ValidationPolicy = match &args.config {
        Some(p) => ValidationPolicy::from_file(p)?,
        None => ValidationPolicy::default(),
    };
    if args.lenient_rows {
        policy.rows = RowPolicy::Lenient;
    }
    if args.collect_all {
        policy.collect_all();
    }
    debug!("Validation policy: {policy:?}");

    let terrain: Terrain = Terrain::load(&args.terrain)?;
    let source: PathSource = PathSource::load(&args.path)?;
    let report: Report = validator::check(&terrain, &source, &policy)?;

    let mut out = io::stdout().lock();
    if args.json {
        report.write_json(
            &mut out,
            &args.terrain.to_string_lossy(),
            &args.path.to_string_lossy(),
        )?;
    } else {
        report.write_text(&mut out, args.lang, args.verbose)?;
    }
    out.flush()?;

    info!(
        "{} violations, {} warnings",
        report.violations.len(),
        report.warnings.len()
    );
    Ok(report.is_valid())
}

/// Run the `plan` command.
fn plan(args: &PlanArgs) -> Result<(), Box<dyn Error>> {
    let terrain: Terrain = Terrain::load(&args.terrain)?;
    let path: PathGrid = planner::plan(&terrain)?;
    write_output(args.output.as_deref(), &path.to_text())
}

/// Run the `generate` command.
fn generate(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let mut generator: TerrainGenerator = TerrainGenerator::new(args.rows, args.cols);
    generator.ceiling = args.ceiling;
    generator.max_altitude = args.max_altitude;
    generator.start = args.start;
    generator.target = args.target;
    generator.solvable = args.solvable;

    let terrain: Terrain = generator.generate(args.seed)?;
    info!("Terrain generated in {} attempts", generator.iteration);
    write_output(args.output.as_deref(), &terrain.to_text())
}

/// Parse and process command-line options. Return the process exit code.
pub fn parse() -> u8 {
    let cli: Cli = Cli::parse();

    if cli.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let ret: Result<u8, Box<dyn Error>> = match &cli.command {
        Command::Check(args) => check(args).map(|valid| {
            if valid { EXIT_VALID } else { EXIT_INVALID }
        }),
        Command::Plan(args) => plan(args).map(|()| EXIT_VALID),
        Command::Generate(args) => generate(args).map(|()| EXIT_VALID),
    };

    match ret {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_ERROR
        }
    }
}
