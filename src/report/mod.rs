//! Reporting utilities: dataset statistics and formatted terminal output.
//!
//! Everything here works on plain `&[Trace]` and `&[IssueRecord]` so the same
//! summary can be printed for a fresh batch or a reloaded trace JSON.

pub mod format;

pub use format::*;

use crate::domain::{IssueRecord, Severity, Trace};

/// Aggregate figures over a set of traces.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStats {
    pub holes_traced: usize,
    /// Traces with at least one survey segment.
    pub holes_surveyed: usize,
    pub holes_skipped: usize,
    pub rows: usize,
    /// Sum of the deepest depth of every trace.
    pub total_meterage: f64,
    /// Mean deepest depth over surveyed traces.
    pub mean_depth: f64,
    pub deepest: Option<(String, f64)>,
    /// Highest dogleg severity (hole, segment end depth, degrees per 30 m).
    pub max_dls: Option<(String, f64, f64)>,
}

/// Compute summary statistics.
pub fn compute_stats(traces: &[Trace], issues: &[IssueRecord]) -> TraceStats {
    let surveyed: Vec<&Trace> = traces.iter().filter(|t| !t.segments.is_empty()).collect();
    let total_meterage: f64 = traces.iter().map(Trace::max_depth).sum();
    let mean_depth = if surveyed.is_empty() {
        0.0
    } else {
        surveyed.iter().map(|t| t.max_depth()).sum::<f64>() / surveyed.len() as f64
    };

    let mut deepest: Option<(String, f64)> = None;
    let mut max_dls: Option<(String, f64, f64)> = None;
    for t in traces {
        let depth = t.max_depth();
        if deepest.as_ref().is_none_or(|(_, d)| depth > *d) {
            deepest = Some((t.hole_id.clone(), depth));
        }
        for s in &t.segments {
            let dls = s.dogleg_severity();
            if max_dls.as_ref().is_none_or(|(_, _, v)| dls > *v) {
                max_dls = Some((t.hole_id.clone(), s.to_depth, dls));
            }
        }
    }

    TraceStats {
        holes_traced: traces.len(),
        holes_surveyed: surveyed.len(),
        holes_skipped: issues.iter().filter(|i| i.severity == Severity::Error).count(),
        rows: traces.iter().map(|t| t.points.len()).sum(),
        total_meterage,
        mean_depth,
        deepest,
        max_dls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Segment, TracePoint};

    fn trace(id: &str, depths: &[f64], dogleg_deg: f64) -> Trace {
        let points = depths
            .iter()
            .map(|&depth| TracePoint {
                hole_id: id.to_string(),
                depth,
                x: 0.0,
                y: 0.0,
                z: -depth,
                dx: 0.0,
                dy: 0.0,
                dz: 0.0,
            })
            .collect();
        let segments = depths
            .windows(2)
            .map(|w| Segment {
                from_depth: w[0],
                to_depth: w[1],
                md: w[1] - w[0],
                dogleg_rad: dogleg_deg.to_radians(),
                ratio_factor: 1.0,
                d_north: 0.0,
                d_east: 0.0,
                d_vertical: w[1] - w[0],
            })
            .collect();
        Trace {
            hole_id: id.to_string(),
            points,
            segments,
        }
    }

    #[test]
    fn stats_over_mixed_traces() {
        let traces = vec![
            trace("A", &[0.0, 30.0, 60.0], 1.0),
            trace("B", &[0.0, 120.0], 3.0),
            trace("C", &[0.0], 0.0),
        ];
        let issues = vec![IssueRecord {
            hole_id: "D".to_string(),
            severity: Severity::Error,
            kind: "duplicate_depth".to_string(),
            message: "x".to_string(),
        }];
        let stats = compute_stats(&traces, &issues);

        assert_eq!(stats.holes_traced, 3);
        assert_eq!(stats.holes_surveyed, 2);
        assert_eq!(stats.holes_skipped, 1);
        assert_eq!(stats.rows, 6);
        assert!((stats.total_meterage - 180.0).abs() < 1e-12);
        assert!((stats.mean_depth - 90.0).abs() < 1e-12);
        assert_eq!(stats.deepest, Some(("B".to_string(), 120.0)));
        // A: 1° over 30 m = 1.0; B: 3° over 120 m = 0.75.
        let (hole, _, dls) = stats.max_dls.unwrap();
        assert_eq!(hole, "A");
        assert!((dls - 1.0).abs() < 1e-9);
    }

    #[test]
    fn max_dls_includes_bend_out_of_vertical_collar() {
        use crate::domain::{CollarRecord, SurveyStation, VerticalGuard};
        use crate::solver::solve;
        use crate::survey::normalize;

        let collar = CollarRecord {
            hole_id: "V".to_string(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
        };
        let rows = [(0.0, -90.0, 0.0), (30.0, -60.0, 90.0), (60.0, -60.0, 90.0)].map(|(depth, dip, azimuth)| {
            SurveyStation {
                hole_id: "V".to_string(),
                depth,
                dip,
                azimuth,
            }
        });
        let survey = normalize("V", &rows, None).unwrap();
        let trace = solve(&collar, &survey, VerticalGuard::Start).unwrap();

        let stats = compute_stats(&[trace], &[]);
        let (hole, depth, dls) = stats.max_dls.unwrap();
        assert_eq!(hole, "V");
        assert_eq!(depth, 30.0);
        assert!((dls - 30.0).abs() < 1e-9, "dls {dls}");
    }
}
