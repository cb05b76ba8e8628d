//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during solving
//! - exported to JSON/CSV
//! - reloaded later for summaries
//!
//! Conventions (fixed for the whole crate):
//!
//! - **Dip** is measured from horizontal, negative downward: `-90` is straight
//!   down, `0` is horizontal, `+90` is straight up.
//! - **Azimuth** is a compass bearing, clockwise from grid north, in degrees.
//! - **X** is easting, **Y** northing, **Z** elevation (up-positive).
//! - `dX/dY/dZ` are the increments from the previous trace point, so
//!   `Z = Z_prev + dZ` (a downward step has a negative `dZ`).
//!   Tools that export `DH_dZ` as the unsigned downward step `dV` have the
//!   opposite sign: their `DH_dZ` equals `-dZ` here.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::TraceError;

/// One collar (surface origin) per hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollarRecord {
    pub hole_id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One raw survey reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyStation {
    pub hole_id: String,
    /// Measured depth along the hole from the collar.
    pub depth: f64,
    /// Degrees from horizontal, negative downward.
    pub dip: f64,
    /// Degrees clockwise from north.
    pub azimuth: f64,
}

/// A tangent direction expressed as dip/azimuth (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub dip: f64,
    pub azimuth: f64,
}

/// A station inside an [`OrderedSurvey`] (the hole id lives on the survey).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub depth: f64,
    pub dip: f64,
    pub azimuth: f64,
}

impl Station {
    pub fn orientation(&self) -> Orientation {
        Orientation {
            dip: self.dip,
            azimuth: self.azimuth,
        }
    }
}

/// Stations for a single hole, strictly ascending by depth, first station at depth 0.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedSurvey {
    pub hole_id: String,
    pub stations: Vec<Station>,
    /// `true` when the depth-0 station was synthesized (no real reading at the collar).
    pub implicit_collar_station: bool,
}

impl OrderedSurvey {
    /// Number of stations that came from the input table.
    pub fn measured_len(&self) -> usize {
        if self.implicit_collar_station {
            self.stations.len() - 1
        } else {
            self.stations.len()
        }
    }
}

/// One row of the output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    pub hole_id: String,
    pub depth: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

/// Minimum-curvature diagnostics for one station pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from_depth: f64,
    pub to_depth: f64,
    /// Measured length of the segment.
    pub md: f64,
    /// Dogleg (3D angle between the two tangents), radians.
    pub dogleg_rad: f64,
    pub ratio_factor: f64,
    pub d_north: f64,
    pub d_east: f64,
    /// Downward displacement (positive down).
    pub d_vertical: f64,
}

/// Course length used for dogleg severity (degrees per 30 m).
pub const DLS_COURSE_LENGTH: f64 = 30.0;

impl Segment {
    pub fn dogleg_deg(&self) -> f64 {
        self.dogleg_rad.to_degrees()
    }

    /// Dogleg severity in degrees per [`DLS_COURSE_LENGTH`]; zero for zero-length segments.
    pub fn dogleg_severity(&self) -> f64 {
        if self.md > 0.0 {
            self.dogleg_deg() * DLS_COURSE_LENGTH / self.md
        } else {
            0.0
        }
    }
}

/// The reconstructed path of one hole.
///
/// `points[0]` is always the collar; `segments[i]` connects `points[i]` and `points[i + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub hole_id: String,
    pub points: Vec<TracePoint>,
    pub segments: Vec<Segment>,
}

impl Trace {
    pub fn collar(&self) -> Option<&TracePoint> {
        self.points.first()
    }

    /// Deepest measured depth on the trace (0 for a collar-only trace).
    pub fn max_depth(&self) -> f64 {
        self.points.last().map(|p| p.depth).unwrap_or(0.0)
    }

    /// Position at an arbitrary depth, linearly interpolated between trace points.
    ///
    /// Returns `None` outside `[0, max_depth]` or for a non-finite depth.
    pub fn position_at(&self, depth: f64) -> Option<[f64; 3]> {
        if !depth.is_finite() || depth < 0.0 || depth > self.max_depth() {
            return None;
        }
        let idx = self.points.partition_point(|p| p.depth < depth);
        let hi = self.points.get(idx)?;
        if idx == 0 || hi.depth == depth {
            return Some([hi.x, hi.y, hi.z]);
        }
        let lo = &self.points[idx - 1];
        let u = (depth - lo.depth) / (hi.depth - lo.depth);
        Some([
            lo.x + u * (hi.x - lo.x),
            lo.y + u * (hi.y - lo.y),
            lo.z + u * (hi.z - lo.z),
        ])
    }
}

/// Which station(s) must be vertical before the pure-vertical shortcut applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VerticalGuard {
    /// Shortcut whenever the segment's *start* station has `|dip| = 90`.
    #[default]
    Start,
    /// Shortcut only when both stations have `|dip| = 90`; otherwise use the
    /// general formula (well defined at vertical thanks to clamping).
    Both,
}

/// How serious a hole-level issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A hole that could not be traced.
#[derive(Debug, Clone, PartialEq)]
pub struct HoleFailure {
    pub hole_id: String,
    pub error: TraceError,
}

/// Non-fatal observations made while assembling.
#[derive(Debug, Clone, PartialEq)]
pub enum NoticeKind {
    /// Survey rows whose hole has no collar; dropped.
    SurveyWithoutCollar { stations: usize },
    /// Collar without survey rows; traced as a single point.
    CollarWithoutSurvey,
    DipOutOfRange { depth: f64, dip: f64 },
    AzimuthOutOfRange { depth: f64, azimuth: f64 },
    DepthBeyondLimit { depth: f64, limit: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoleNotice {
    pub hole_id: String,
    pub kind: NoticeKind,
}

impl HoleNotice {
    pub fn severity(&self) -> Severity {
        match self.kind {
            NoticeKind::CollarWithoutSurvey => Severity::Info,
            _ => Severity::Warning,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            NoticeKind::SurveyWithoutCollar { .. } => "survey_without_collar",
            NoticeKind::CollarWithoutSurvey => "collar_without_survey",
            NoticeKind::DipOutOfRange { .. } => "dip_out_of_range",
            NoticeKind::AzimuthOutOfRange { .. } => "azimuth_out_of_range",
            NoticeKind::DepthBeyondLimit { .. } => "depth_beyond_limit",
        }
    }

    pub fn message(&self) -> String {
        match self.kind {
            NoticeKind::SurveyWithoutCollar { stations } => {
                format!("{stations} survey station(s) dropped: no matching collar")
            }
            NoticeKind::CollarWithoutSurvey => "no survey stations; traced as collar only".to_string(),
            NoticeKind::DipOutOfRange { depth, dip } => {
                format!("dip {dip} at depth {depth} is outside [-90, 90]")
            }
            NoticeKind::AzimuthOutOfRange { depth, azimuth } => {
                format!("azimuth {azimuth} at depth {depth} is outside [0, 360]")
            }
            NoticeKind::DepthBeyondLimit { depth, limit } => {
                format!("depth {depth} exceeds the {limit} warning limit")
            }
        }
    }
}

/// Flat, serializable view of a failure or notice (issue CSV + trace JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub hole_id: String,
    pub severity: Severity,
    pub kind: String,
    pub message: String,
}

impl From<&HoleFailure> for IssueRecord {
    fn from(f: &HoleFailure) -> Self {
        IssueRecord {
            hole_id: f.hole_id.clone(),
            severity: Severity::Error,
            kind: f.error.kind().to_string(),
            message: f.error.to_string(),
        }
    }
}

impl From<&HoleNotice> for IssueRecord {
    fn from(n: &HoleNotice) -> Self {
        IssueRecord {
            hole_id: n.hole_id.clone(),
            severity: n.severity(),
            kind: n.kind_label().to_string(),
            message: n.message(),
        }
    }
}

/// Everything one assembler run produces: successes and failures side by side.
#[derive(Debug, Clone, Default)]
pub struct TraceBatch {
    /// One trace per successfully solved collar, in collar input order.
    pub traces: Vec<Trace>,
    pub failures: Vec<HoleFailure>,
    pub notices: Vec<HoleNotice>,
}

impl TraceBatch {
    /// Flatten all traces into the output table (one row per hole and depth).
    pub fn to_rows(&self) -> Vec<&TracePoint> {
        self.traces.iter().flat_map(|t| t.points.iter()).collect()
    }

    pub fn issues(&self) -> Vec<IssueRecord> {
        self.failures
            .iter()
            .map(IssueRecord::from)
            .chain(self.notices.iter().map(IssueRecord::from))
            .collect()
    }
}

/// Input table kinds and the column roles each one requires.
///
/// Only collar and survey tables are consumed by the trace pipeline; point and
/// interval tables are listed so downstream tools share one contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Collar,
    Survey,
    Point,
    Interval,
}

pub const COLLAR_ROLES: [&str; 4] = ["HoleID", "DH_X", "DH_Y", "DH_Z"];
pub const SURVEY_ROLES: [&str; 4] = ["HoleID", "Depth", "Dip", "Azimuth"];

impl TableKind {
    pub fn required_roles(self) -> &'static [&'static str] {
        match self {
            TableKind::Collar => &COLLAR_ROLES,
            TableKind::Survey => &SURVEY_ROLES,
            TableKind::Point => &["HoleID", "Depth"],
            TableKind::Interval => &["HoleID", "From", "To"],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TableKind::Collar => "collar",
            TableKind::Survey => "survey",
            TableKind::Point => "point",
            TableKind::Interval => "interval",
        }
    }
}

/// Default depth (metres) above which a station is flagged as suspicious.
pub const DEFAULT_MAX_DEPTH_WARNING: f64 = 10_000.0;

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct TraceConfig {
    pub collar_path: PathBuf,
    pub survey_path: PathBuf,
    /// Optional TOML file overriding column names.
    pub columns_path: Option<PathBuf>,

    /// Starting tangent used for the implicit depth-0 station.
    pub start_orientation: Option<Orientation>,
    pub vertical_guard: VerticalGuard,
    pub max_depth_warning: f64,

    /// Size of a dedicated worker pool (`None` = rayon's global pool).
    pub jobs: Option<usize>,

    /// Max number of issue lines printed in the summary.
    pub top_issues: usize,

    pub export_csv: Option<PathBuf>,
    pub export_issues: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub debug: bool,
}

/// A saved trace file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub dip_convention: String,
    pub vertical_guard: VerticalGuard,
    pub traces: Vec<Trace>,
    pub issues: Vec<IssueRecord>,
}
