//! Mathematical utilities: angle conventions and the minimum-curvature increment.

pub mod min_curvature;

pub use min_curvature::*;
