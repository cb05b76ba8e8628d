//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the trace pipeline
//! - prints the summary
//! - writes optional exports

use clap::Parser;
use tracing::{info, warn};

use crate::cli::{Command, DemoArgs, ShowArgs, TraceArgs};
use crate::data::{SampleConfig, generate_sample, write_sample_csv};
use crate::domain::{Orientation, TraceConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `dht` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Trace(args) => handle_trace(args),
        Command::Show(args) => handle_show(args),
        Command::Demo(args) => handle_demo(args),
    }
}

fn handle_trace(args: TraceArgs) -> Result<(), AppError> {
    let config = trace_config_from_args(&args);
    let run = pipeline::run_traces(&config)?;
    let batch = &run.batch;
    let issues = batch.issues();
    info!(
        collar_rows = run.collar_rows,
        survey_rows = run.survey_rows,
        traced = batch.traces.len(),
        "trace run finished"
    );

    println!(
        "{}",
        crate::report::format_summary(&batch.traces, &issues, config.top_issues)
    );

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::write_traces_csv(path, batch)?;
        info!(path = %path.display(), "wrote trace CSV");
    }
    if let Some(path) = &config.export_issues {
        crate::io::write_issues_csv(path, &issues)?;
        info!(path = %path.display(), "wrote issue CSV");
    }
    if let Some(path) = &config.export_json {
        crate::io::write_trace_json(path, batch, config.vertical_guard)?;
        info!(path = %path.display(), "wrote trace JSON");
    }
    if config.debug {
        let path = crate::debug::write_debug_bundle(batch, &config)?;
        println!("Debug bundle: {}", path.display());
    }

    if batch.traces.is_empty() {
        warn!(failures = batch.failures.len(), "no hole could be traced");
        return Err(AppError::new(3, "No hole could be traced."));
    }

    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let file = crate::io::read_trace_json(&args.traces)?;

    println!("Trace file: {} ({}, generated {})", args.traces.display(), file.tool, file.generated_at);
    println!("Conventions: {} | vertical guard: {:?}", file.dip_convention, file.vertical_guard);
    println!("{}", crate::report::format_summary(&file.traces, &file.issues, args.top));
    Ok(())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        holes: args.holes,
        seed: args.seed,
        station_spacing: args.spacing,
        ..SampleConfig::default()
    };
    let sample = generate_sample(&config)?;
    let (collar, survey) = write_sample_csv(&args.out_dir, &sample)?;

    println!(
        "Wrote {} collars to {} and {} survey stations to {}",
        sample.collars.len(),
        collar.display(),
        sample.surveys.len(),
        survey.display()
    );
    Ok(())
}

pub fn trace_config_from_args(args: &TraceArgs) -> TraceConfig {
    let start_orientation = match (args.start_dip, args.start_azimuth) {
        (Some(dip), Some(azimuth)) => Some(Orientation { dip, azimuth }),
        _ => None,
    };

    TraceConfig {
        collar_path: args.collar.clone(),
        survey_path: args.survey.clone(),
        columns_path: args.columns.clone(),
        start_orientation,
        vertical_guard: args.vertical_guard,
        max_depth_warning: args.max_depth_warning,
        jobs: args.jobs,
        top_issues: args.top,
        export_csv: args.export.clone(),
        export_issues: args.export_issues.clone(),
        export_json: args.export_json.clone(),
        debug: args.debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn config_carries_start_orientation_and_exports() {
        let cli = Cli::try_parse_from([
            "dht",
            "trace",
            "--collar",
            "c.csv",
            "--survey",
            "s.csv",
            "--start-dip",
            "-55",
            "--start-azimuth",
            "120",
            "--export",
            "out.csv",
            "--jobs",
            "2",
        ])
        .unwrap();
        let Command::Trace(args) = cli.command else {
            panic!("expected trace command");
        };
        let config = trace_config_from_args(&args);
        assert_eq!(
            config.start_orientation,
            Some(Orientation {
                dip: -55.0,
                azimuth: 120.0
            })
        );
        assert_eq!(config.jobs, Some(2));
        assert_eq!(config.export_csv.as_deref(), Some(std::path::Path::new("out.csv")));
        assert!(config.export_json.is_none());
        assert!(!config.debug);
    }
}
