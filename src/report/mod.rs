//! LaTeX table rendering: header label dictionary and the tabular writer.

pub mod headers;
pub mod latex;

pub use headers::*;
pub use latex::*;
