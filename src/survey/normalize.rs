//! Survey normalization.
//!
//! Turns raw survey rows into an [`OrderedSurvey`] per hole:
//!
//! - rows are grouped by hole id (first-appearance order)
//! - depths must be finite and non-negative, angles finite
//! - stations are sorted by depth; two stations at the same depth are an error
//! - a depth-0 station is synthesized when the survey does not start at the collar
//!
//! Pure functions only; nothing here logs or allocates beyond the output.

use std::collections::HashMap;

use crate::domain::{Orientation, OrderedSurvey, Station, SurveyStation};
use crate::error::TraceError;

/// Survey rows for one hole, borrowed from the input table.
#[derive(Debug, Clone)]
pub struct SurveyGroup<'a> {
    pub hole_id: &'a str,
    pub stations: Vec<&'a SurveyStation>,
}

/// Partition a multi-hole survey table into one group per hole id.
///
/// Groups appear in the order their hole id first appears; rows keep input order.
pub fn partition_by_hole(stations: &[SurveyStation]) -> Vec<SurveyGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<SurveyGroup<'_>> = Vec::new();

    for s in stations {
        let slot = *index.entry(s.hole_id.as_str()).or_insert_with(|| {
            groups.push(SurveyGroup {
                hole_id: s.hole_id.as_str(),
                stations: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].stations.push(s);
    }

    groups
}

/// Normalize the stations of a single hole.
///
/// `start` is the tangent given to the synthesized depth-0 station; when `None`
/// the first measured station's orientation is used. A measured station at
/// depth 0 always wins over `start`.
pub fn normalize<'a>(
    hole_id: &str,
    stations: impl IntoIterator<Item = &'a SurveyStation>,
    start: Option<Orientation>,
) -> Result<OrderedSurvey, TraceError> {
    let mut ordered: Vec<Station> = Vec::new();

    for s in stations {
        if s.hole_id != hole_id {
            return Err(TraceError::MixedHoles {
                expected: hole_id.to_string(),
                found: s.hole_id.clone(),
            });
        }
        if !s.depth.is_finite() {
            return Err(TraceError::geometry(hole_id, s.depth, "non-finite depth"));
        }
        if s.depth < 0.0 {
            return Err(TraceError::NegativeDepth {
                hole_id: hole_id.to_string(),
                depth: s.depth,
            });
        }
        if !s.dip.is_finite() || !s.azimuth.is_finite() {
            return Err(TraceError::geometry(
                hole_id,
                s.depth,
                format!("non-finite angle (dip={}, azimuth={})", s.dip, s.azimuth),
            ));
        }
        ordered.push(Station {
            depth: s.depth,
            dip: s.dip,
            azimuth: s.azimuth,
        });
    }

    // Stable sort keeps input order among equal depths, which only matters for
    // the error message below.
    ordered.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    if let Some(pair) = ordered.windows(2).find(|w| w[0].depth == w[1].depth) {
        return Err(TraceError::DuplicateDepth {
            hole_id: hole_id.to_string(),
            depth: pair[0].depth,
        });
    }

    let Some(first) = ordered.first().copied() else {
        return Err(TraceError::EmptySurvey {
            hole_id: hole_id.to_string(),
        });
    };

    let implicit_collar_station = first.depth > 0.0;
    if implicit_collar_station {
        let o = start.unwrap_or_else(|| first.orientation());
        ordered.insert(
            0,
            Station {
                depth: 0.0,
                dip: o.dip,
                azimuth: o.azimuth,
            },
        );
    }

    Ok(OrderedSurvey {
        hole_id: hole_id.to_string(),
        stations: ordered,
        implicit_collar_station,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(hole: &str, depth: f64, dip: f64, azimuth: f64) -> SurveyStation {
        SurveyStation {
            hole_id: hole.to_string(),
            depth,
            dip,
            azimuth,
        }
    }

    #[test]
    fn sorts_and_inserts_collar_station() {
        let rows = vec![
            row("A", 60.0, -58.0, 92.0),
            row("A", 30.0, -59.0, 91.0),
            row("A", 90.0, -57.0, 93.0),
        ];
        let survey = normalize("A", &rows, None).unwrap();

        let depths: Vec<f64> = survey.stations.iter().map(|s| s.depth).collect();
        assert_eq!(depths, vec![0.0, 30.0, 60.0, 90.0]);
        assert!(survey.implicit_collar_station);
        assert_eq!(survey.measured_len(), 3);
        // Implicit station inherits the shallowest reading.
        assert_eq!(survey.stations[0].dip, -59.0);
        assert_eq!(survey.stations[0].azimuth, 91.0);
    }

    #[test]
    fn start_orientation_overrides_implicit_station_only() {
        let start = Some(Orientation {
            dip: -90.0,
            azimuth: 0.0,
        });

        let rows = vec![row("A", 10.0, -80.0, 45.0)];
        let survey = normalize("A", &rows, start).unwrap();
        assert_eq!(survey.stations[0].dip, -90.0);

        let rows = vec![row("A", 0.0, -70.0, 45.0), row("A", 10.0, -80.0, 45.0)];
        let survey = normalize("A", &rows, start).unwrap();
        assert!(!survey.implicit_collar_station);
        assert_eq!(survey.stations.len(), 2);
        assert_eq!(survey.stations[0].dip, -70.0);
    }

    #[test]
    fn duplicate_depth_is_an_error() {
        let rows = vec![row("A", 30.0, -60.0, 0.0), row("A", 30.0, -61.0, 0.0)];
        let err = normalize("A", &rows, None).unwrap_err();
        assert_eq!(
            err,
            TraceError::DuplicateDepth {
                hole_id: "A".to_string(),
                depth: 30.0
            }
        );
    }

    #[test]
    fn empty_survey_is_an_error() {
        let rows: Vec<SurveyStation> = Vec::new();
        let err = normalize("A", &rows, None).unwrap_err();
        assert!(matches!(err, TraceError::EmptySurvey { .. }));
    }

    #[test]
    fn rejects_negative_depth_and_foreign_rows() {
        let rows = vec![row("A", -1.0, -60.0, 0.0)];
        assert!(matches!(
            normalize("A", &rows, None).unwrap_err(),
            TraceError::NegativeDepth { .. }
        ));

        let rows = vec![row("A", 10.0, -60.0, 0.0), row("B", 20.0, -60.0, 0.0)];
        assert!(matches!(
            normalize("A", &rows, None).unwrap_err(),
            TraceError::MixedHoles { .. }
        ));
    }

    #[test]
    fn rejects_non_finite_angles() {
        let rows = vec![row("A", 10.0, f64::NAN, 0.0)];
        assert!(matches!(
            normalize("A", &rows, None).unwrap_err(),
            TraceError::Geometry { .. }
        ));
    }

    #[test]
    fn partition_keeps_first_appearance_order() {
        let rows = vec![
            row("B", 10.0, -60.0, 0.0),
            row("A", 10.0, -60.0, 0.0),
            row("B", 20.0, -60.0, 0.0),
        ];
        let groups = partition_by_hole(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].hole_id, "B");
        assert_eq!(groups[0].stations.len(), 2);
        assert_eq!(groups[1].hole_id, "A");

        let survey = normalize(groups[0].hole_id, groups[0].stations.iter().copied(), None).unwrap();
        assert_eq!(survey.stations.len(), 3);
    }
}
