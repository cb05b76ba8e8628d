//! Plausibility checks on normalized surveys.
//!
//! These never stop a hole from being traced; they only produce notices.

use crate::domain::{HoleNotice, NoticeKind, OrderedSurvey};

const DIP_RANGE: (f64, f64) = (-90.0, 90.0);
const AZIMUTH_RANGE: (f64, f64) = (0.0, 360.0);

/// Flag suspicious dips, azimuths and depths on the measured stations of `survey`.
pub fn check_ranges(survey: &OrderedSurvey, max_depth_warning: f64) -> Vec<HoleNotice> {
    let skip = usize::from(survey.implicit_collar_station);
    let mut notices = Vec::new();
    let notice = |kind| HoleNotice {
        hole_id: survey.hole_id.clone(),
        kind,
    };

    for s in survey.stations.iter().skip(skip) {
        if s.dip < DIP_RANGE.0 || s.dip > DIP_RANGE.1 {
            notices.push(notice(NoticeKind::DipOutOfRange {
                depth: s.depth,
                dip: s.dip,
            }));
        }
        if s.azimuth < AZIMUTH_RANGE.0 || s.azimuth > AZIMUTH_RANGE.1 {
            notices.push(notice(NoticeKind::AzimuthOutOfRange {
                depth: s.depth,
                azimuth: s.azimuth,
            }));
        }
    }

    // Only the deepest station is reported; one notice per hole is enough.
    if let Some(last) = survey.stations.last() {
        if last.depth > max_depth_warning {
            notices.push(notice(NoticeKind::DepthBeyondLimit {
                depth: last.depth,
                limit: max_depth_warning,
            }));
        }
    }

    notices
}
