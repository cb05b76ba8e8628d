//! Debug bundle writer for inspecting per-segment geometry.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{TraceBatch, TraceConfig};
use crate::error::AppError;

/// Write `debug/dht_debug_<timestamp>.md` under the working directory.
pub fn write_debug_bundle(batch: &TraceBatch, config: &TraceConfig) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), batch, config)
}

pub fn write_debug_bundle_in(dir: &Path, batch: &TraceBatch, config: &TraceConfig) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("dht_debug_{ts}.md"));

    let mut file = File::create(&path).map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
    write_bundle(&mut file, batch, config).map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;

    Ok(path)
}

fn write_bundle(file: &mut File, batch: &TraceBatch, config: &TraceConfig) -> std::io::Result<()> {
    writeln!(file, "# dht debug bundle")?;
    writeln!(file, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(file, "- collar: {}", config.collar_path.display())?;
    writeln!(file, "- survey: {}", config.survey_path.display())?;
    writeln!(file, "- vertical_guard: {:?}", config.vertical_guard)?;
    match config.start_orientation {
        Some(o) => writeln!(file, "- start_orientation: dip={:.3} az={:.3}", o.dip, o.azimuth)?,
        None => writeln!(file, "- start_orientation: first station")?,
    }
    writeln!(
        file,
        "- traces: {} | failures: {} | notices: {}",
        batch.traces.len(),
        batch.failures.len(),
        batch.notices.len()
    )?;

    for trace in &batch.traces {
        writeln!(file, "\n## {}", trace.hole_id)?;
        if let Some(c) = trace.collar() {
            writeln!(file, "Collar: X={:.3} Y={:.3} Z={:.3}", c.x, c.y, c.z)?;
        }
        if trace.segments.is_empty() {
            writeln!(file, "No survey; collar point only.")?;
            continue;
        }

        writeln!(file, "| from | to | md | dogleg_deg | dls_30m | rf | dN | dE | dV |")?;
        writeln!(file, "| - | - | - | - | - | - | - | - | - |")?;
        for s in &trace.segments {
            writeln!(
                file,
                "| {:.2} | {:.2} | {:.3} | {:.4} | {:.4} | {:.8} | {:.4} | {:.4} | {:.4} |",
                s.from_depth,
                s.to_depth,
                s.md,
                s.dogleg_deg(),
                s.dogleg_severity(),
                s.ratio_factor,
                s.d_north,
                s.d_east,
                s.d_vertical
            )?;
        }
    }

    if !batch.failures.is_empty() {
        writeln!(file, "\n## Skipped holes")?;
        for f in &batch.failures {
            writeln!(file, "- {} ({}): {}", f.hole_id, f.error.kind(), f.error)?;
        }
    }
    if !batch.notices.is_empty() {
        writeln!(file, "\n## Notices")?;
        for n in &batch.notices {
            writeln!(file, "- [{}] {}: {}", n.severity().label(), n.hole_id, n.message())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::assemble::{AssembleOptions, assemble};
    use crate::domain::{CollarRecord, SurveyStation, VerticalGuard};

    fn config() -> TraceConfig {
        TraceConfig {
            collar_path: PathBuf::from("collar.csv"),
            survey_path: PathBuf::from("survey.csv"),
            columns_path: None,
            start_orientation: None,
            vertical_guard: VerticalGuard::Start,
            max_depth_warning: 10_000.0,
            jobs: None,
            top_issues: 20,
            export_csv: None,
            export_issues: None,
            export_json: None,
            debug: true,
        }
    }

    #[test]
    fn bundle_has_segment_table_per_hole() {
        let collars = vec![CollarRecord {
            hole_id: "DH1".to_string(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }];
        let surveys = vec![
            SurveyStation {
                hole_id: "DH1".to_string(),
                depth: 0.0,
                dip: -75.0,
                azimuth: 20.0,
            },
            SurveyStation {
                hole_id: "DH1".to_string(),
                depth: 100.0,
                dip: -65.0,
                azimuth: 45.0,
            },
        ];
        let batch = assemble(&collars, &surveys, &AssembleOptions::default());

        let dir = tempfile::tempdir().unwrap();
        let path = write_debug_bundle_in(dir.path(), &batch, &config()).unwrap();
        let text = fs::read_to_string(path).unwrap();

        assert!(text.starts_with("# dht debug bundle"));
        assert!(text.contains("## DH1"));
        // Dogleg of the reference pair.
        assert!(text.contains("12.9517"));
    }
}
