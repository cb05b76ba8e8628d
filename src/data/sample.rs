//! Synthetic drillhole sample generation.
//!
//! Produces a small, plausible drilling programme: collars scattered around a
//! grid, each hole starting steep and slowly drifting in dip and azimuth down
//! the hole. The same seed always gives the same tables.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{CollarRecord, SurveyStation};
use crate::error::AppError;

/// Dip is kept between these bounds while drifting (negative down).
/// Holes never turn past horizontal and never flip past vertical.
const DIP_STEEPEST: f64 = -90.0;
const DIP_SHALLOWEST: f64 = -5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub holes: usize,
    pub seed: u64,
    /// Distance between survey stations (m).
    pub station_spacing: f64,
    pub depth_min: f64,
    pub depth_max: f64,
    /// Collar grid spacing (m).
    pub grid_spacing: f64,
    /// Std dev of the dip change per station (degrees).
    pub dip_drift: f64,
    /// Std dev of the azimuth change per station (degrees).
    pub azimuth_drift: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            holes: 10,
            seed: 42,
            station_spacing: 30.0,
            depth_min: 120.0,
            depth_max: 450.0,
            grid_spacing: 50.0,
            dip_drift: 0.8,
            azimuth_drift: 1.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleData {
    pub collars: Vec<CollarRecord>,
    pub surveys: Vec<SurveyStation>,
}

pub fn generate_sample(config: &SampleConfig) -> Result<SampleData, AppError> {
    if config.holes == 0 {
        return Err(AppError::new(2, "Hole count must be > 0."));
    }
    if !(config.station_spacing.is_finite() && config.station_spacing >= 0.1) {
        return Err(AppError::new(2, "Station spacing must be at least 0.1 m."));
    }
    if !(config.depth_min.is_finite() && config.depth_max.is_finite() && config.depth_max >= config.depth_min)
        || config.depth_min <= 0.0
    {
        return Err(AppError::new(2, "Invalid depth range for sample generation."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let dip_noise = Normal::new(0.0, config.dip_drift)
        .map_err(|e| AppError::new(2, format!("Dip drift distribution error: {e}")))?;
    let az_noise = Normal::new(0.0, config.azimuth_drift)
        .map_err(|e| AppError::new(2, format!("Azimuth drift distribution error: {e}")))?;

    let side = (config.holes as f64).sqrt().ceil() as usize;
    let mut collars = Vec::with_capacity(config.holes);
    let mut surveys = Vec::new();

    for i in 0..config.holes {
        let hole_id = format!("DH{:03}", i + 1);
        let jitter = config.grid_spacing * 0.2;
        let x = 500_000.0 + (i % side) as f64 * config.grid_spacing + rng.gen_range(-jitter..=jitter);
        let y = 7_000_000.0 + (i / side) as f64 * config.grid_spacing + rng.gen_range(-jitter..=jitter);
        let z = 350.0 + rng.gen_range(-5.0..=5.0);
        collars.push(CollarRecord {
            hole_id: hole_id.clone(),
            x: round2(x),
            y: round2(y),
            z: round2(z),
        });

        // Rounded up front so the last station never collapses onto the one before it.
        let total = round2(rng.gen_range(config.depth_min..=config.depth_max));
        let mut dip: f64 = rng.gen_range(-90.0..=-50.0);
        let mut azimuth: f64 = rng.gen_range(0.0..360.0);
        let mut depth = 0.0;

        // Collar reading at depth 0, then one reading per spacing down to `total`.
        loop {
            surveys.push(SurveyStation {
                hole_id: hole_id.clone(),
                depth: round2(depth),
                dip: round2(dip),
                azimuth: round2(azimuth),
            });
            // Half a centimetre: anything closer rounds onto the same depth.
            if depth >= total - 0.005 {
                break;
            }
            depth = (depth + config.station_spacing).min(total);
            dip = (dip + dip_noise.sample(&mut rng)).clamp(DIP_STEEPEST, DIP_SHALLOWEST);
            azimuth = (azimuth + az_noise.sample(&mut rng)).rem_euclid(360.0);
        }
    }

    Ok(SampleData { collars, surveys })
}

/// Write `collar.csv` and `survey.csv` into `dir` using the default headers.
pub fn write_sample_csv(dir: &Path, sample: &SampleData) -> Result<(PathBuf, PathBuf), AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create output dir '{}': {e}", dir.display())))?;

    let collar_path = dir.join("collar.csv");
    let mut writer = csv_writer(&collar_path)?;
    write_row(&mut writer, ["HoleID", "DH_X", "DH_Y", "DH_Z"].map(String::from))?;
    for c in &sample.collars {
        write_row(&mut writer, [c.hole_id.clone(), c.x.to_string(), c.y.to_string(), c.z.to_string()])?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush collar CSV: {e}")))?;

    let survey_path = dir.join("survey.csv");
    let mut writer = csv_writer(&survey_path)?;
    write_row(&mut writer, ["HoleID", "Depth", "Dip", "Azimuth"].map(String::from))?;
    for s in &sample.surveys {
        write_row(
            &mut writer,
            [s.hole_id.clone(), s.depth.to_string(), s.dip.to_string(), s.azimuth.to_string()],
        )?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush survey CSV: {e}")))?;

    Ok((collar_path, survey_path))
}

fn csv_writer(path: &Path) -> Result<csv::Writer<File>, AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    Ok(csv::Writer::from_writer(file))
}

fn write_row(writer: &mut csv::Writer<File>, row: [String; 4]) -> Result<(), AppError> {
    writer
        .write_record(&row)
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_tables() {
        let config = SampleConfig {
            holes: 4,
            ..SampleConfig::default()
        };
        let a = generate_sample(&config).unwrap();
        let b = generate_sample(&config).unwrap();
        assert_eq!(a.collars, b.collars);
        assert_eq!(a.surveys, b.surveys);
    }

    #[test]
    fn stations_start_at_collar_and_stay_in_range() {
        let config = SampleConfig {
            holes: 6,
            seed: 7,
            ..SampleConfig::default()
        };
        let sample = generate_sample(&config).unwrap();
        assert_eq!(sample.collars.len(), 6);

        for collar in &sample.collars {
            let stations: Vec<&SurveyStation> =
                sample.surveys.iter().filter(|s| s.hole_id == collar.hole_id).collect();
            assert!(stations.len() >= 2);
            assert_eq!(stations[0].depth, 0.0);
            for w in stations.windows(2) {
                assert!(w[1].depth > w[0].depth, "depths must increase in {}", collar.hole_id);
            }
            for s in &stations {
                assert!((DIP_STEEPEST..=DIP_SHALLOWEST).contains(&s.dip));
                assert!((0.0..=360.0).contains(&s.azimuth));
            }
            let last = stations[stations.len() - 1].depth;
            assert!(last >= config.depth_min - 0.01 && last <= config.depth_max + 0.01);
        }
    }

    #[test]
    fn rejects_zero_holes() {
        let config = SampleConfig {
            holes: 0,
            ..SampleConfig::default()
        };
        let err = generate_sample(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
