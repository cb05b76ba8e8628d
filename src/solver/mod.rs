//! Minimum-curvature trace solver.
//!
//! Responsibilities:
//!
//! - walk a hole's ordered stations from the collar down
//! - apply one minimum-curvature increment per station pair
//! - emit absolute positions plus per-step increments and segment diagnostics

pub mod solve;

pub use solve::*;
