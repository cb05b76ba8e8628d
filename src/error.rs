//! Error types.
//!
//! Two layers:
//!
//! - [`TraceError`]: typed failures raised by the core (normalizer, solver,
//!   assembler). Most of them are scoped to a single hole and are collected by
//!   the assembler instead of aborting the batch.
//! - [`AppError`]: the application boundary. Carries the process exit code and a
//!   human-readable message; `main` prints it and exits.

use thiserror::Error;

/// Failures raised while normalizing or solving drillhole data.
///
/// `Validation` is batch-fatal (it is raised by ingest before any solving).
/// Every other variant is fatal for one hole only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("hole {hole_id} has no survey stations")]
    EmptySurvey { hole_id: String },

    #[error("hole {hole_id} has more than one survey station at depth {depth}")]
    DuplicateDepth { hole_id: String, depth: f64 },

    #[error("hole {hole_id} has a negative survey depth ({depth})")]
    NegativeDepth { hole_id: String, depth: f64 },

    #[error("survey station for hole {found} passed to the normalizer for hole {expected}")]
    MixedHoles { expected: String, found: String },

    #[error("hole {hole_id} appears more than once in the collar table")]
    DuplicateCollar { hole_id: String },

    #[error("geometry error in hole {hole_id} at depth {depth}: {reason}")]
    Geometry {
        hole_id: String,
        depth: f64,
        reason: String,
    },
}

impl TraceError {
    /// Short machine-friendly label, used in issue exports.
    pub fn kind(&self) -> &'static str {
        match self {
            TraceError::Validation(_) => "validation",
            TraceError::EmptySurvey { .. } => "empty_survey",
            TraceError::DuplicateDepth { .. } => "duplicate_depth",
            TraceError::NegativeDepth { .. } => "negative_depth",
            TraceError::MixedHoles { .. } => "mixed_holes",
            TraceError::DuplicateCollar { .. } => "duplicate_collar",
            TraceError::Geometry { .. } => "geometry",
        }
    }

    pub(crate) fn geometry(hole_id: &str, depth: f64, reason: impl Into<String>) -> Self {
        TraceError::Geometry {
            hole_id: hole_id.to_string(),
            depth,
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<TraceError> for AppError {
    fn from(err: TraceError) -> Self {
        let exit_code = match err {
            TraceError::Validation(_) => 2,
            _ => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
