//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw inputs (`CollarRecord`, `SurveyStation`)
//! - the normalized survey (`OrderedSurvey`) and solved outputs (`Trace`, `TracePoint`, `Segment`)
//! - batch results (`TraceBatch`, `HoleFailure`, `HoleNotice`)
//! - run configuration (`TraceConfig`, `VerticalGuard`)

pub mod types;

pub use types::*;
