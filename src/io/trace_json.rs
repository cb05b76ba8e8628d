//! Read/write trace JSON files.
//!
//! Trace JSON is the "portable" representation of a run:
//! - every solved trace, with points and segment diagnostics
//! - the failures and notices of the batch
//! - run metadata (timestamp, dip convention, vertical guard)
//!
//! The schema is defined by `domain::TraceFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{TraceBatch, TraceFile, VerticalGuard};
use crate::error::AppError;

/// Human-readable statement of the angle conventions used in the file.
pub const DIP_CONVENTION: &str = "dip from horizontal, negative down; azimuth clockwise from north; Z up";

pub fn trace_file(batch: &TraceBatch, vertical_guard: VerticalGuard) -> TraceFile {
    TraceFile {
        tool: "dht".to_string(),
        generated_at: Utc::now(),
        dip_convention: DIP_CONVENTION.to_string(),
        vertical_guard,
        traces: batch.traces.clone(),
        issues: batch.issues(),
    }
}

/// Write a trace JSON file.
pub fn write_trace_json(path: &Path, batch: &TraceBatch, vertical_guard: VerticalGuard) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create trace JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &trace_file(batch, vertical_guard))
        .map_err(|e| AppError::new(2, format!("Failed to write trace JSON: {e}")))?;

    Ok(())
}

/// Read a trace JSON file.
pub fn read_trace_json(path: &Path) -> Result<TraceFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open trace JSON '{}': {e}", path.display())))?;
    let traces: TraceFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid trace JSON: {e}")))?;
    Ok(traces)
}
