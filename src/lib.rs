//! `eoc-tables` library crate.
//!
//! The binary (`eoctab`) is a thin wrapper around this library so that:
//!
//! - the table logic is testable without spawning processes
//! - modules are reusable (e.g., other report formats later)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod compile;
pub mod domain;
pub mod eoc;
pub mod error;
pub mod io;
pub mod report;
pub mod reshape;
