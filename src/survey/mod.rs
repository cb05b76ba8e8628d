//! Survey normalization and plausibility checks.

pub mod checks;
pub mod normalize;

pub use checks::*;
pub use normalize::*;
