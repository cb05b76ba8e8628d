//! CSV ingest for collar and survey tables.
//!
//! This module turns delimited text into typed [`CollarRecord`] and
//! [`SurveyStation`] rows that the core can trust.
//!
//! Design goals:
//! - **Strict schema**: a missing required column is reported before any row is read
//! - **Strict types**: a blank hole id or a non-numeric/non-finite value is a
//!   validation error for the whole batch (with the offending line)
//! - **Forgiving headers**: case-insensitive, trimmed, BOM-stripped, with aliases
//!   from [`ColumnMap`](crate::io::ColumnMap)
//! - **Separation of concerns**: no ordering or geometry checks here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::domain::{CollarRecord, SurveyStation, TableKind};
use crate::error::{AppError, TraceError};
use crate::io::columns::{CollarColumns, SurveyColumns};

/// Read a collar CSV file.
pub fn load_collars(path: &Path, columns: &CollarColumns) -> Result<Vec<CollarRecord>, AppError> {
    let file = open(path, TableKind::Collar)?;
    let rows = read_collars(file, columns)?;
    debug!(path = %path.display(), rows = rows.len(), "loaded collar table");
    Ok(rows)
}

/// Read a survey CSV file.
pub fn load_surveys(path: &Path, columns: &SurveyColumns) -> Result<Vec<SurveyStation>, AppError> {
    let file = open(path, TableKind::Survey)?;
    let rows = read_surveys(file, columns)?;
    debug!(path = %path.display(), rows = rows.len(), "loaded survey table");
    Ok(rows)
}

fn open(path: &Path, table: TableKind) -> Result<File, AppError> {
    File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open {} CSV '{}': {e}", table.display_name(), path.display()),
        )
    })
}

/// Parse collar rows from any reader.
pub fn read_collars<R: Read>(reader: R, columns: &CollarColumns) -> Result<Vec<CollarRecord>, TraceError> {
    let table = TableKind::Collar;
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader, table)?;

    let &[hole_role, x_role, y_role, z_role] = table.required_roles() else {
        return Err(layout_error(table));
    };
    let hole_idx = resolve_column(&header_map, table, hole_role, &columns.hole_id)?;
    let x_idx = resolve_column(&header_map, table, x_role, &columns.x)?;
    let y_idx = resolve_column(&header_map, table, y_role, &columns.y)?;
    let z_idx = resolve_column(&header_map, table, z_role, &columns.z)?;

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| TraceError::Validation(format!("collar line {line}: CSV parse error: {e}")))?;

        out.push(CollarRecord {
            hole_id: get_hole_id(&record, hole_idx, table, line)?,
            x: get_number(&record, x_idx, table, line, x_role)?,
            y: get_number(&record, y_idx, table, line, y_role)?,
            z: get_number(&record, z_idx, table, line, z_role)?,
        });
    }
    Ok(out)
}

/// Parse survey rows from any reader.
pub fn read_surveys<R: Read>(reader: R, columns: &SurveyColumns) -> Result<Vec<SurveyStation>, TraceError> {
    let table = TableKind::Survey;
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader, table)?;

    let &[hole_role, depth_role, dip_role, azimuth_role] = table.required_roles() else {
        return Err(layout_error(table));
    };
    let hole_idx = resolve_column(&header_map, table, hole_role, &columns.hole_id)?;
    let depth_idx = resolve_column(&header_map, table, depth_role, &columns.depth)?;
    let dip_idx = resolve_column(&header_map, table, dip_role, &columns.dip)?;
    let azimuth_idx = resolve_column(&header_map, table, azimuth_role, &columns.azimuth)?;
    let dip_sign = if columns.dip_positive_down { -1.0 } else { 1.0 };

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| TraceError::Validation(format!("survey line {line}: CSV parse error: {e}")))?;

        out.push(SurveyStation {
            hole_id: get_hole_id(&record, hole_idx, table, line)?,
            depth: get_number(&record, depth_idx, table, line, depth_role)?,
            dip: dip_sign * get_number(&record, dip_idx, table, line, dip_role)?,
            azimuth: get_number(&record, azimuth_idx, table, line, azimuth_role)?,
        });
    }
    Ok(out)
}

fn layout_error(table: TableKind) -> TraceError {
    TraceError::Validation(format!(
        "{} table: expected four required columns, found {}",
        table.display_name(),
        table.required_roles().join(", ")
    ))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_header_map<R: Read>(reader: &mut csv::Reader<R>, table: TableKind) -> Result<HashMap<String, usize>, TraceError> {
    let headers = reader
        .headers()
        .map_err(|e| TraceError::Validation(format!("Failed to read {} CSV headers: {e}", table.display_name())))?;
    Ok(build_header_map(headers))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // Keep the first occurrence of a repeated header.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_column(
    header_map: &HashMap<String, usize>,
    table: TableKind,
    role: &str,
    candidates: &[String],
) -> Result<usize, TraceError> {
    candidates
        .iter()
        .find_map(|c| header_map.get(&normalize_header_name(c)).copied())
        .ok_or_else(|| {
            TraceError::Validation(format!(
                "{} table: missing required column `{role}` (looked for: {})",
                table.display_name(),
                candidates.join(", ")
            ))
        })
}

fn get_hole_id(record: &StringRecord, idx: usize, table: TableKind, line: usize) -> Result<String, TraceError> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TraceError::Validation(format!("{} line {line}: blank HoleID", table.display_name())))
}

fn get_number(record: &StringRecord, idx: usize, table: TableKind, line: usize, role: &str) -> Result<f64, TraceError> {
    let raw = record.get(idx).map(str::trim).unwrap_or("");
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TraceError::Validation(format!(
            "{} line {line}: `{role}` value '{raw}' is not a finite number",
            table.display_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_collars_with_aliases_and_bom() {
        let csv = "\u{feff}HOLEID,EAST,NORTH,RL,Comment\nDH1, 1000.5 ,2000,350.25,ok\nDH2,1010,2010,351,\n";
        let rows = read_collars(csv.as_bytes(), &CollarColumns::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].hole_id, "DH1");
        assert_eq!(rows[0].x, 1000.5);
        assert_eq!(rows[1].z, 351.0);
    }

    #[test]
    fn reads_surveys_and_flips_positive_down_dips() {
        let csv = "HoleID,Depth,Dip,Azimuth\nDH1,0,60,90\nDH1,30,61.5,91\n";
        let cols = SurveyColumns {
            dip_positive_down: true,
            ..SurveyColumns::default()
        };
        let rows = read_surveys(csv.as_bytes(), &cols).unwrap();
        assert_eq!(rows[0].dip, -60.0);
        assert_eq!(rows[1].dip, -61.5);
        assert_eq!(rows[1].azimuth, 91.0);
    }

    #[test]
    fn missing_column_is_validation_error() {
        let csv = "HoleID,Depth,Azimuth\nDH1,0,90\n";
        let err = read_surveys(csv.as_bytes(), &SurveyColumns::default()).unwrap_err();
        match err {
            TraceError::Validation(msg) => assert!(msg.contains("`Dip`"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_collar_column_names_its_role() {
        let csv = "HoleID,DH_X,DH_Z\nDH1,1,3\n";
        let err = read_collars(csv.as_bytes(), &CollarColumns::default()).unwrap_err();
        let role = TableKind::Collar.required_roles()[2];
        assert_eq!(role, "DH_Y");
        assert!(err.to_string().contains(&format!("`{role}`")), "{err}");
    }

    #[test]
    fn bad_number_reports_line() {
        let csv = "HoleID,Depth,Dip,Azimuth\nDH1,0,-60,90\nDH1,abc,-60,90\n";
        let err = read_surveys(csv.as_bytes(), &SurveyColumns::default()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn blank_hole_id_is_rejected() {
        let csv = "HoleID,X,Y,Z\n ,1,2,3\n";
        let err = read_collars(csv.as_bytes(), &CollarColumns::default()).unwrap_err();
        assert!(err.to_string().contains("blank HoleID"), "{err}");
    }
}
