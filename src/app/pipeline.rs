//! The table-generation pipeline shared by the CLI entry points.
//!
//! Per dataset file:
//! load blocks -> merge column-wise -> recalculate EOCs -> stack variants ->
//! write LaTeX (and the transposed variant), then optionally one pdflatex run
//! over the whole document.

use std::path::PathBuf;

use crate::domain::Table;
use crate::eoc::recalculate_eocs;
use crate::error::AppError;
use crate::io::loader::{LoadConfig, load_tables};
use crate::report::{HeaderDict, Template, write_latex};
use crate::reshape::{concat_columns, stack_top_level};

/// Resolved options for one `eoctab make` run.
#[derive(Debug, Clone)]
pub struct MakeConfig {
    pub dir: PathBuf,
    pub files: Vec<String>,
    pub norms: Vec<String>,
    /// Exactly two top-level variant labels, in output order.
    pub variants: Vec<String>,
    pub load: LoadConfig,
    pub template: Template,
    pub headers_override: Option<PathBuf>,
    pub transpose: bool,
    pub compile: bool,
    pub doc: String,
}

/// One written LaTeX fragment.
#[derive(Debug, Clone)]
pub struct TableOutput {
    pub path: PathBuf,
    pub rows: usize,
    pub cols: usize,
}

/// All outputs of a `make` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub outputs: Vec<TableOutput>,
    /// Row keys dropped while aligning blocks on the first block's index.
    pub dropped_rows: Vec<String>,
}

/// Execute the full pipeline over every configured dataset file.
pub fn run_make(config: &MakeConfig) -> Result<RunOutput, AppError> {
    if config.variants.len() != 2 {
        return Err(AppError::input(
            "Expected exactly two --variants labels (e.g. BC,VG)",
        ));
    }

    let mut dict = HeaderDict::builtin();
    if let Some(path) = &config.headers_override {
        dict.load_overrides(path)?;
    }

    let mut outputs = Vec::new();
    let mut dropped_rows = Vec::new();

    for file in &config.files {
        let path = config.dir.join(file);
        let parts = load_tables(&path, &config.load)?;
        if parts.is_empty() {
            return Err(AppError::input(format!(
                "No data blocks found in '{}'",
                path.display()
            )));
        }

        let outcome = concat_columns(&parts)?;
        dropped_rows.extend(outcome.dropped_rows);

        let mut table = outcome.table;
        recalculate_eocs(&mut table, &config.norms)?;
        let stacked = stack_top_level(&table, &config.variants)?;

        let tex_path = path.with_extension("tex");
        write_latex(&stacked, &tex_path, &dict, config.template)?;
        outputs.push(output_entry(tex_path, &stacked));

        if config.transpose {
            let flipped = stack_top_level(&stacked.transpose(), &config.variants)?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "table".to_string());
            let tex_path = path.with_file_name(format!("{stem}_transposed.tex"));
            write_latex(&flipped, &tex_path, &dict, config.template)?;
            outputs.push(output_entry(tex_path, &flipped));
        }
    }

    if config.compile {
        crate::compile::run_pdflatex(&config.dir, &config.doc)?;
    }

    Ok(RunOutput {
        outputs,
        dropped_rows,
    })
}

fn output_entry(path: PathBuf, table: &Table) -> TableOutput {
    TableOutput {
        path,
        rows: table.n_rows(),
        cols: table.n_cols(),
    }
}
