//! Dataset I/O.

pub mod loader;

pub use loader::*;
