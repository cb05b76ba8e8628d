//! Shared "trace pipeline" logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! column map -> ingest -> join/normalize/solve -> batch
//!
//! Front-ends (the CLI today) then focus on presentation and exports.

use tracing::info;

use crate::assemble::{AssembleOptions, assemble};
use crate::domain::{CollarRecord, SurveyStation, TraceBatch, TraceConfig};
use crate::error::AppError;
use crate::io::{ColumnMap, load_collars, load_surveys};

/// All computed outputs of a single `dht trace` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub batch: TraceBatch,
    pub collar_rows: usize,
    pub survey_rows: usize,
}

/// Execute the full trace pipeline and return the computed outputs.
pub fn run_traces(config: &TraceConfig) -> Result<RunOutput, AppError> {
    // 1) Resolve column names.
    let columns = ColumnMap::load_or_default(config.columns_path.as_deref())?;

    // 2) Ingest both tables; a validation error aborts before any solving.
    let collars = load_collars(&config.collar_path, &columns.collar)?;
    let surveys = load_surveys(&config.survey_path, &columns.survey)?;
    info!(collars = collars.len(), stations = surveys.len(), "tables loaded");

    // 3) Solve.
    let batch = run_traces_with_tables(config, &collars, &surveys)?;

    Ok(RunOutput {
        batch,
        collar_rows: collars.len(),
        survey_rows: surveys.len(),
    })
}

/// Execute the solve step on already-loaded tables.
///
/// With `config.jobs` set, the work runs on a dedicated pool of that size.
pub fn run_traces_with_tables(
    config: &TraceConfig,
    collars: &[CollarRecord],
    surveys: &[SurveyStation],
) -> Result<TraceBatch, AppError> {
    let opts = AssembleOptions::from(config);

    match config.jobs {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| AppError::new(4, format!("Failed to build worker pool: {e}")))?;
            Ok(pool.install(|| assemble(collars, surveys, &opts)))
        }
        None => Ok(assemble(collars, surveys, &opts)),
    }
}
