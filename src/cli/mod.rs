//! Command-line parsing for the drillhole trace builder.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the geometry code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{DEFAULT_MAX_DEPTH_WARNING, VerticalGuard};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dht", version, about = "Drillhole traces by minimum curvature")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build traces from collar and survey CSVs, print a summary, and optionally export.
    Trace(TraceArgs),
    /// Print the summary of a previously exported trace JSON.
    Show(ShowArgs),
    /// Write a seeded synthetic collar/survey pair to a directory.
    Demo(DemoArgs),
}

/// Options for building traces.
#[derive(Debug, Parser, Clone)]
pub struct TraceArgs {
    /// Collar table (HoleID, DH_X, DH_Y, DH_Z).
    #[arg(long, env = "DHT_COLLAR", value_name = "CSV")]
    pub collar: PathBuf,

    /// Survey table (HoleID, Depth, Dip, Azimuth).
    #[arg(long, env = "DHT_SURVEY", value_name = "CSV")]
    pub survey: PathBuf,

    /// TOML file overriding the accepted column names.
    #[arg(long, env = "DHT_COLUMNS", value_name = "TOML")]
    pub columns: Option<PathBuf>,

    /// Dip for the implicit depth-0 station (defaults to the first reading).
    #[arg(long, allow_hyphen_values = true, requires = "start_azimuth")]
    pub start_dip: Option<f64>,

    /// Azimuth for the implicit depth-0 station.
    #[arg(long, requires = "start_dip")]
    pub start_azimuth: Option<f64>,

    /// Which end of a segment must be vertical for the straight-down shortcut.
    #[arg(long, value_enum, default_value_t = VerticalGuard::Start)]
    pub vertical_guard: VerticalGuard,

    /// Depth (m) above which a station is flagged as suspicious.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH_WARNING)]
    pub max_depth_warning: f64,

    /// Worker threads (default: one per core).
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Show at most N skipped holes and N notices.
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Export the trace table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export failures and notices to CSV.
    #[arg(long = "export-issues")]
    pub export_issues: Option<PathBuf>,

    /// Export traces, segments and issues to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,

    /// Write a markdown debug bundle under ./debug.
    #[arg(long)]
    pub debug: bool,
}

/// Options for summarizing a saved trace file.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Trace JSON file produced by `dht trace --export-json`.
    #[arg(long, value_name = "JSON")]
    pub traces: PathBuf,

    /// Show at most N issues per section.
    #[arg(long, default_value_t = 20)]
    pub top: usize,
}

/// Options for synthetic data.
#[derive(Debug, Parser)]
pub struct DemoArgs {
    /// Number of holes.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub holes: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Survey station spacing (m).
    #[arg(long, default_value_t = 30.0)]
    pub spacing: f64,

    /// Output directory for collar.csv and survey.csv.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trace_with_negative_start_dip() {
        let cli = Cli::try_parse_from([
            "dht",
            "trace",
            "--collar",
            "c.csv",
            "--survey",
            "s.csv",
            "--start-dip",
            "-60",
            "--start-azimuth",
            "45",
            "--vertical-guard",
            "both",
        ])
        .unwrap();
        let Command::Trace(args) = cli.command else {
            panic!("expected trace command");
        };
        assert_eq!(args.start_dip, Some(-60.0));
        assert_eq!(args.start_azimuth, Some(45.0));
        assert_eq!(args.vertical_guard, VerticalGuard::Both);
        assert_eq!(args.top, 20);
    }

    #[test]
    fn start_dip_requires_azimuth() {
        let res = Cli::try_parse_from([
            "dht",
            "trace",
            "--collar",
            "c.csv",
            "--survey",
            "s.csv",
            "--start-dip",
            "-60",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn demo_defaults() {
        let cli = Cli::try_parse_from(["dht", "demo", "--holes", "3"]).unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo command");
        };
        assert_eq!(args.holes, 3);
        assert_eq!(args.seed, 42);
        assert_eq!(args.out_dir, PathBuf::from("."));
    }
}
