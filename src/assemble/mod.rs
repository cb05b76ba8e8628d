//! Trace assembly: join collars with surveys, solve every hole, collect results.
//!
//! The batch never fails as a whole. Each hole ends up in exactly one of:
//!
//! - `TraceBatch::traces` (solved, possibly collar-only)
//! - `TraceBatch::failures` (normalizer/solver error, duplicate collar)
//!
//! and join mismatches or implausible readings are reported as notices.
//!
//! Holes are independent, so the per-hole work runs on a rayon parallel
//! iterator. Collecting an indexed parallel iterator keeps collar input order.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::{
    CollarRecord, DEFAULT_MAX_DEPTH_WARNING, HoleFailure, HoleNotice, NoticeKind, Orientation, SurveyStation, Trace,
    TraceBatch, TraceConfig, VerticalGuard,
};
use crate::error::TraceError;
use crate::solver::{collar_only, solve};
use crate::survey::{SurveyGroup, check_ranges, normalize, partition_by_hole};

/// Options that affect how each hole is normalized and solved.
#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions {
    /// Tangent for the synthesized depth-0 station (default: first reading).
    pub start_orientation: Option<Orientation>,
    pub vertical_guard: VerticalGuard,
    /// Depth above which a notice is raised.
    pub max_depth_warning: f64,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            start_orientation: None,
            vertical_guard: VerticalGuard::default(),
            max_depth_warning: DEFAULT_MAX_DEPTH_WARNING,
        }
    }
}

impl From<&TraceConfig> for AssembleOptions {
    fn from(config: &TraceConfig) -> Self {
        Self {
            start_orientation: config.start_orientation,
            vertical_guard: config.vertical_guard,
            max_depth_warning: config.max_depth_warning,
        }
    }
}

enum Job<'a> {
    Solve(&'a CollarRecord, Option<&'a SurveyGroup<'a>>),
    DuplicateCollar(&'a CollarRecord),
}

struct HoleOutcome {
    hole_id: String,
    result: Result<Trace, TraceError>,
    notices: Vec<HoleNotice>,
}

/// Join, normalize and solve every hole.
pub fn assemble(collars: &[CollarRecord], surveys: &[SurveyStation], opts: &AssembleOptions) -> TraceBatch {
    let groups = partition_by_hole(surveys);
    let by_hole: HashMap<&str, &SurveyGroup<'_>> = groups.iter().map(|g| (g.hole_id, g)).collect();

    let mut seen: HashSet<&str> = HashSet::with_capacity(collars.len());
    let jobs: Vec<Job<'_>> = collars
        .iter()
        .map(|c| {
            if seen.insert(c.hole_id.as_str()) {
                Job::Solve(c, by_hole.get(c.hole_id.as_str()).copied())
            } else {
                Job::DuplicateCollar(c)
            }
        })
        .collect();

    let outcomes: Vec<HoleOutcome> = jobs.par_iter().map(|job| run_job(job, opts)).collect();

    let mut batch = TraceBatch::default();
    for outcome in outcomes {
        batch.notices.extend(outcome.notices);
        match outcome.result {
            Ok(trace) => {
                debug!(hole_id = %trace.hole_id, points = trace.points.len(), "traced hole");
                batch.traces.push(trace);
            }
            Err(error) => {
                warn!(hole_id = %outcome.hole_id, %error, "hole skipped");
                batch.failures.push(HoleFailure {
                    hole_id: outcome.hole_id,
                    error,
                });
            }
        }
    }

    for g in groups.iter().filter(|g| !seen.contains(g.hole_id)) {
        warn!(hole_id = %g.hole_id, stations = g.stations.len(), "survey has no matching collar; dropped");
        batch.notices.push(HoleNotice {
            hole_id: g.hole_id.to_string(),
            kind: NoticeKind::SurveyWithoutCollar {
                stations: g.stations.len(),
            },
        });
    }

    info!(
        traces = batch.traces.len(),
        failures = batch.failures.len(),
        notices = batch.notices.len(),
        "assembled drillhole traces"
    );
    batch
}

fn run_job(job: &Job<'_>, opts: &AssembleOptions) -> HoleOutcome {
    match *job {
        Job::DuplicateCollar(collar) => HoleOutcome {
            hole_id: collar.hole_id.clone(),
            result: Err(TraceError::DuplicateCollar {
                hole_id: collar.hole_id.clone(),
            }),
            notices: Vec::new(),
        },
        Job::Solve(collar, None) => HoleOutcome {
            hole_id: collar.hole_id.clone(),
            result: Ok(collar_only(collar)),
            notices: vec![HoleNotice {
                hole_id: collar.hole_id.clone(),
                kind: NoticeKind::CollarWithoutSurvey,
            }],
        },
        Job::Solve(collar, Some(group)) => {
            let mut notices = Vec::new();
            let result = normalize(&collar.hole_id, group.stations.iter().copied(), opts.start_orientation)
                .and_then(|survey| {
                    notices = check_ranges(&survey, opts.max_depth_warning);
                    solve(collar, &survey, opts.vertical_guard)
                });
            HoleOutcome {
                hole_id: collar.hole_id.clone(),
                result,
                notices,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collar(hole: &str) -> CollarRecord {
        CollarRecord {
            hole_id: hole.to_string(),
            x: 100.0,
            y: 200.0,
            z: 50.0,
        }
    }

    fn st(hole: &str, depth: f64) -> SurveyStation {
        SurveyStation {
            hole_id: hole.to_string(),
            depth,
            dip: -60.0,
            azimuth: 90.0,
        }
    }

    #[test]
    fn one_bad_hole_does_not_block_the_batch() {
        let collars = vec![collar("A"), collar("B"), collar("C")];
        let surveys = vec![
            st("A", 10.0),
            st("A", 20.0),
            st("B", 10.0),
            st("B", 10.0),
            st("C", 15.0),
        ];
        let batch = assemble(&collars, &surveys, &AssembleOptions::default());

        assert_eq!(batch.traces.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].hole_id, "B");
        assert!(matches!(batch.failures[0].error, TraceError::DuplicateDepth { .. }));
        let ids: Vec<&str> = batch.traces.iter().map(|t| t.hole_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn join_mismatches_become_notices() {
        let collars = vec![collar("A"), collar("LONE")];
        let surveys = vec![st("A", 10.0), st("ORPHAN", 10.0), st("ORPHAN", 20.0)];
        let batch = assemble(&collars, &surveys, &AssembleOptions::default());

        assert_eq!(batch.traces.len(), 2);
        assert!(batch.failures.is_empty());
        let lone = &batch.traces[1];
        assert_eq!(lone.hole_id, "LONE");
        assert_eq!(lone.points.len(), 1);

        let kinds: Vec<(&str, &str)> = batch
            .notices
            .iter()
            .map(|n| (n.hole_id.as_str(), n.kind_label()))
            .collect();
        assert!(kinds.contains(&("LONE", "collar_without_survey")));
        assert!(kinds.contains(&("ORPHAN", "survey_without_collar")));
    }

    #[test]
    fn repeated_collar_is_recorded_once_as_failure() {
        let collars = vec![collar("A"), collar("A")];
        let surveys = vec![st("A", 10.0)];
        let batch = assemble(&collars, &surveys, &AssembleOptions::default());
        assert_eq!(batch.traces.len(), 1);
        assert_eq!(batch.failures.len(), 1);
        assert!(matches!(batch.failures[0].error, TraceError::DuplicateCollar { .. }));
    }

    #[test]
    fn output_follows_collar_order() {
        let ids = ["Z9", "A1", "M5", "B2", "Q7", "C3"];
        let collars: Vec<CollarRecord> = ids.iter().map(|id| collar(id)).collect();
        let surveys: Vec<SurveyStation> = ids.iter().rev().map(|id| st(id, 30.0)).collect();
        let batch = assemble(&collars, &surveys, &AssembleOptions::default());
        let out: Vec<&str> = batch.traces.iter().map(|t| t.hole_id.as_str()).collect();
        assert_eq!(out, ids.to_vec());
    }
}
