//! Export the trace table and the issue list to CSV.
//!
//! The trace export is the flat output table (one row per hole and depth) and is
//! meant to be easy to consume in spreadsheets or 3D viewers.

use std::fs::File;
use std::path::Path;

use crate::domain::{IssueRecord, TraceBatch};
use crate::error::AppError;

const TRACE_HEADER: [&str; 8] = ["HoleID", "Depth", "X", "Y", "Z", "dX", "dY", "dZ"];

/// Write every trace point of `batch` to a CSV file.
pub fn write_traces_csv(path: &Path, batch: &TraceBatch) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create trace CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(TRACE_HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write trace CSV header: {e}")))?;

    for p in batch.to_rows() {
        writer
            .write_record([
                p.hole_id.clone(),
                p.depth.to_string(),
                p.x.to_string(),
                p.y.to_string(),
                p.z.to_string(),
                p.dx.to_string(),
                p.dy.to_string(),
                p.dz.to_string(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write trace CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush trace CSV: {e}")))?;
    Ok(())
}

/// Write failures and notices to a CSV file (`hole_id,severity,kind,message`).
pub fn write_issues_csv(path: &Path, issues: &[IssueRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create issue CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    for issue in issues {
        writer
            .serialize(issue)
            .map_err(|e| AppError::new(2, format!("Failed to write issue CSV row: {e}")))?;
    }
    if issues.is_empty() {
        // serde writes the header with the first row; keep the file self-describing.
        writer
            .write_record(["hole_id", "severity", "kind", "message"])
            .map_err(|e| AppError::new(2, format!("Failed to write issue CSV header: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush issue CSV: {e}")))?;
    Ok(())
}
