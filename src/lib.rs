//! `dh-traces` library crate.
//!
//! Builds 3D drillhole traces from collar and survey tables with the minimum
//! curvature method.
//!
//! The binary (`dht`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the solver is reusable by other tools that need hole positions
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod assemble;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod solver;
pub mod survey;
