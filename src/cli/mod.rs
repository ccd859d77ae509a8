//! Command-line parsing for the convergence-table generator.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the table/reshaping code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "eoctab", version, about = "EOC convergence tables -> LaTeX")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build LaTeX tables (normal and transposed) from CSV datasets.
    Make(MakeArgs),
    /// Run pdflatex over the document that inputs the generated tables.
    Compile(CompileArgs),
}

/// Options for table generation.
#[derive(Debug, Parser, Clone)]
pub struct MakeArgs {
    /// Dataset files inside the data directory (default: 2d_grid.csv).
    pub files: Vec<String>,

    /// Directory holding the datasets; outputs are written next to them.
    #[arg(short = 'd', long, default_value = "data")]
    pub dir: PathBuf,

    /// Norm column names that get an EOC column.
    #[arg(long, value_delimiter = ',', default_value = "S_L1,S_L2")]
    pub norms: Vec<String>,

    /// The two model-variant labels to stack, in output order.
    #[arg(long, value_delimiter = ',', default_value = "BC,VG")]
    pub variants: Vec<String>,

    /// Leading columns that form the row key.
    #[arg(long, default_value_t = 3)]
    pub index_columns: usize,

    /// Header records at the top of each CSV block.
    #[arg(long, default_value_t = 2)]
    pub header_rows: usize,

    /// Table template ('eoc' or 'plain').
    #[arg(long, default_value = "eoc")]
    pub template: String,

    /// JSON file with header label overrides.
    #[arg(long)]
    pub headers: Option<PathBuf>,

    /// Skip the transposed table variant.
    #[arg(long)]
    pub no_transpose: bool,

    /// Run pdflatex after writing all tables.
    #[arg(long)]
    pub compile: bool,

    /// Document to compile (relative to the data directory).
    #[arg(long, default_value = "main.tex")]
    pub doc: String,
}

/// Options for the compile-only subcommand.
#[derive(Debug, Parser, Clone)]
pub struct CompileArgs {
    /// Directory to compile in.
    #[arg(short = 'd', long, default_value = "data")]
    pub dir: PathBuf,

    /// Document to compile.
    #[arg(long, default_value = "main.tex")]
    pub doc: String,
}
