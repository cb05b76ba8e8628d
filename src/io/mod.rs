//! Input/output helpers.
//!
//! - column-name mapping (`columns`)
//! - CSV ingest + validation (`ingest`)
//! - trace and issue exports (CSV) (`export`)
//! - trace JSON read/write (`trace_json`)

pub mod columns;
pub mod export;
pub mod ingest;
pub mod trace_json;

pub use columns::*;
pub use export::*;
pub use ingest::*;
pub use trace_json::*;
