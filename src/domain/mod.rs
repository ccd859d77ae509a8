//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - `Value`: one cell or one part of a row/column key
//! - `Table`: an ordered, multi-keyed table of convergence data

pub mod table;

pub use table::*;
