//! CSV ingest and normalization.
//!
//! A dataset file holds one or more **blocks** separated by blank lines (or
//! lines of bare commas). Each block is one table:
//!
//! - the first `header_rows` records are column-label rows; blank label cells
//!   continue the previous label to their left (spreadsheet-style merged
//!   headings), except on the last label row which is taken as-is
//! - the first `index_columns` columns form the multi-part row key
//!   (discretization label, mesh size `h`, DOF count by default)
//! - the remaining columns are data columns keyed by the stacked labels
//!
//! Design goals (mirroring the rest of the pipeline):
//! - **Strict schema** for block structure (clear errors + exit code 2)
//! - **Order preservation**: rows come out exactly in file order, since EOC
//!   estimation depends on it
//! - **Separation of concerns**: no EOC or reshaping logic here

use std::path::Path;

use crate::domain::{Table, Value};
use crate::error::AppError;

/// Block layout options.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Leading columns that form the row key.
    pub index_columns: usize,
    /// Records at the top of each block that form the column keys.
    pub header_rows: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            index_columns: 3,
            header_rows: 2,
        }
    }
}

/// Load every non-empty block of a dataset file as a canonical table.
pub fn load_tables(path: &Path, config: &LoadConfig) -> Result<Vec<Table>, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        AppError::input(format!("Failed to read dataset '{}': {e}", path.display()))
    })?;
    parse_tables(&text, config, &path.display().to_string())
}

/// Parse blank-line separated CSV blocks into canonical tables.
///
/// Blocks with header rows but no data rows are skipped, matching the
/// behavior of loading partially filled spreadsheets.
pub fn parse_tables(text: &str, config: &LoadConfig, source: &str) -> Result<Vec<Table>, AppError> {
    if config.index_columns == 0 {
        return Err(AppError::input("index_columns must be at least 1"));
    }
    if config.header_rows == 0 {
        return Err(AppError::input("header_rows must be at least 1"));
    }

    let mut tables = Vec::new();
    let mut block_lines: Vec<&str> = Vec::new();
    let mut block_no = 0;

    for line in text.lines().chain(std::iter::once("")) {
        if is_blank(line) {
            if !block_lines.is_empty() {
                block_no += 1;
                if let Some(table) = parse_block(&block_lines, config, source, block_no)? {
                    tables.push(table);
                }
                block_lines.clear();
            }
        } else {
            block_lines.push(line);
        }
    }

    Ok(tables)
}

/// A separator line: empty, or nothing but commas and whitespace.
fn is_blank(line: &str) -> bool {
    line.split(',').all(|field| field.trim().is_empty())
}

fn parse_block(
    lines: &[&str],
    config: &LoadConfig,
    source: &str,
    block_no: usize,
) -> Result<Option<Table>, AppError> {
    let text = lines.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            AppError::input(format!("Failed to parse block {block_no} of '{source}': {e}"))
        })?;
        records.push(record.iter().map(|f| f.to_string()).collect());
    }

    if records.len() < config.header_rows {
        return Err(AppError::input(format!(
            "Block {block_no} of '{source}' has {} record(s), fewer than the {} header row(s)",
            records.len(),
            config.header_rows
        )));
    }
    if records.len() == config.header_rows {
        // Header-only block: nothing to tabulate.
        return Ok(None);
    }

    let width = records[config.header_rows - 1].len();
    if width <= config.index_columns {
        return Err(AppError::input(format!(
            "Block {block_no} of '{source}' has no data columns beyond the {} index column(s)",
            config.index_columns
        )));
    }

    // Stack the header records into per-column keys, continuing merged labels
    // to the right on every row but the last.
    let mut header: Vec<Vec<String>> = Vec::with_capacity(config.header_rows);
    for (level, record) in records[..config.header_rows].iter().enumerate() {
        if record.len() > width {
            return Err(AppError::input(format!(
                "Header row {} of block {block_no} in '{source}' has {} fields, the label row has {width}",
                level + 1,
                record.len()
            )));
        }
        let mut row: Vec<String> = record.clone();
        row.resize(width, String::new());
        if level + 1 < config.header_rows {
            forward_fill(&mut row);
        }
        header.push(row);
    }

    let index_names: Vec<String> = header[config.header_rows - 1][..config.index_columns].to_vec();
    let column_names = vec![String::new(); config.header_rows];

    let mut columns = Vec::with_capacity(width - config.index_columns);
    for c in config.index_columns..width {
        let key: Vec<Value> = header.iter().map(|row| Value::parse(&row[c])).collect();
        columns.push(key);
    }

    let mut index = Vec::new();
    let mut cells = Vec::new();
    for (offset, record) in records[config.header_rows..].iter().enumerate() {
        if record.len() > width {
            return Err(AppError::input(format!(
                "Data row {} of block {block_no} in '{source}' has {} fields, header has {width}",
                offset + 1,
                record.len()
            )));
        }
        let mut row: Vec<String> = record.clone();
        row.resize(width, String::new());

        index.push(row[..config.index_columns].iter().map(|f| Value::parse(f)).collect());
        cells.push(row[config.index_columns..].iter().map(|f| Value::parse(f)).collect());
    }

    Ok(Some(Table {
        index_names,
        column_names,
        index,
        columns,
        cells,
    }))
}

/// Continue a non-empty label into the blank cells to its right.
///
/// Leading blanks (above the index columns) stay blank.
fn forward_fill(row: &mut [String]) {
    let mut last = String::new();
    for cell in row.iter_mut() {
        if cell.is_empty() {
            *cell = last.clone();
        } else {
            last = cell.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::key_label;

    const TWO_BLOCKS: &str = "\
,,,BC,BC
scheme,h,DOF,S_L1,S_L2
P1,0.1,121,0.0421,0.0634
P1,0.05,441,0.0112,0.0171

,,,VG,VG
scheme,h,DOF,S_L1,S_L2
P1,0.1,121,0.0388,0.0591
P1,0.05,441,0.0104,0.0159
";

    #[test]
    fn splits_blocks_and_stacks_headers() {
        let tables = parse_tables(TWO_BLOCKS, &LoadConfig::default(), "test").unwrap();
        assert_eq!(tables.len(), 2);

        let bc = &tables[0];
        assert_eq!(bc.n_rows(), 2);
        assert_eq!(bc.n_cols(), 2);
        assert_eq!(bc.index_names, vec!["scheme", "h", "DOF"]);
        assert_eq!(key_label(&bc.columns[0]), "BC/S_L1");
        assert_eq!(key_label(&bc.columns[1]), "BC/S_L2");
        assert_eq!(key_label(&bc.index[1]), "P1/0.05/441");
        assert_eq!(bc.cells[1][0], Value::Num(0.0112));

        let vg = &tables[1];
        assert_eq!(key_label(&vg.columns[0]), "VG/S_L1");
    }

    #[test]
    fn forward_fills_merged_labels() {
        // The variant label appears once and continues over both norm columns.
        let text = "\
,,,BC,
scheme,h,DOF,S_L1,S_L2
P1,0.1,121,0.0421,0.0634
";
        let tables = parse_tables(text, &LoadConfig::default(), "test").unwrap();
        assert_eq!(key_label(&tables[0].columns[1]), "BC/S_L2");
    }

    #[test]
    fn skips_header_only_blocks() {
        let text = "\
,,,BC,BC
scheme,h,DOF,S_L1,S_L2

,,,VG,VG
scheme,h,DOF,S_L1,S_L2
P1,0.1,121,0.0388,0.0591
";
        let tables = parse_tables(text, &LoadConfig::default(), "test").unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(key_label(&tables[0].columns[0]), "VG/S_L1");
    }

    #[test]
    fn comma_only_lines_separate_blocks() {
        let text = TWO_BLOCKS.replace("\n\n", "\n,,,,\n");
        let tables = parse_tables(&text, &LoadConfig::default(), "test").unwrap();
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn short_data_rows_are_padded() {
        let text = "\
,,,BC,BC
scheme,h,DOF,S_L1,S_L2
P1,0.1,121,0.0421
";
        let tables = parse_tables(text, &LoadConfig::default(), "test").unwrap();
        assert_eq!(tables[0].cells[0][1], Value::Empty);
    }

    #[test]
    fn over_wide_header_row_is_an_error() {
        let text = "\
,,,BC,BC,BC
scheme,h,DOF,S_L1,S_L2
P1,0.1,121,0.0421,0.0634
";
        let err = parse_tables(text, &LoadConfig::default(), "test").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn over_wide_data_row_is_an_error() {
        let text = "\
,,,BC,BC
scheme,h,DOF,S_L1,S_L2
P1,0.1,121,0.0421,0.0634,0.9
";
        let err = parse_tables(text, &LoadConfig::default(), "test").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn truncated_block_is_an_error() {
        let err = parse_tables(",,,BC,BC\n", &LoadConfig::default(), "test").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
