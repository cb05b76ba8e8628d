//! Data sources beyond user-supplied tables.
//!
//! - seeded synthetic collar/survey generator for demos and tests (`sample`)

pub mod sample;

pub use sample::*;
