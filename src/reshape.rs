//! Table reshaping: horizontal merge of per-block tables and regrouping by
//! model variant.
//!
//! `concat_columns` aligns every block on the first block's row index, so one
//! combined table carries both variants side by side. `stack_top_level` then
//! splits the columns by their top-level variant label and stacks the two
//! groups vertically, which is how the published tables present
//! Brooks–Corey above van Genuchten instead of interleaved.

use crate::domain::{Key, Table, Value, key_label};
use crate::error::AppError;

/// Result of a horizontal merge, including rows that could not be aligned.
#[derive(Debug, Clone)]
pub struct ConcatOutcome {
    pub table: Table,
    /// Keys of rows present in a later block but absent from the first one.
    /// They carry no cells in the merged table; the caller decides how loudly
    /// to report them.
    pub dropped_rows: Vec<String>,
}

/// Merge tables column-wise, aligned on the first table's row index.
///
/// A table lacking a given row contributes `Empty` cells for its columns.
/// Duplicate column keys across tables are rejected.
pub fn concat_columns(parts: &[Table]) -> Result<ConcatOutcome, AppError> {
    let Some(base) = parts.first() else {
        return Err(AppError::shape("Cannot merge zero tables"));
    };
    for part in parts {
        if part.index_names.len() != base.index_names.len() {
            return Err(AppError::shape(format!(
                "Cannot merge tables with {} and {} row key parts",
                base.index_names.len(),
                part.index_names.len()
            )));
        }
        if part.column_levels() != base.column_levels() {
            return Err(AppError::shape(format!(
                "Cannot merge tables with {} and {} column label levels",
                base.column_levels(),
                part.column_levels()
            )));
        }
    }

    let index = base.index.clone();
    let mut columns: Vec<Key> = Vec::new();
    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); index.len()];
    let mut dropped_rows = Vec::new();

    for (i, part) in parts.iter().enumerate() {
        for (c, key) in part.columns.iter().enumerate() {
            if columns.iter().any(|k| k == key) {
                return Err(AppError::shape(format!(
                    "Duplicate column '{}' while merging blocks",
                    key_label(key)
                )));
            }
            columns.push(key.clone());
            for (r, row_key) in index.iter().enumerate() {
                let value = part
                    .row_position(row_key)
                    .map(|pr| part.cells[pr][c].clone())
                    .unwrap_or(Value::Empty);
                cells[r].push(value);
            }
        }
        if i > 0 {
            for row_key in &part.index {
                if base.row_position(row_key).is_none() {
                    dropped_rows.push(key_label(row_key));
                }
            }
        }
    }

    Ok(ConcatOutcome {
        table: Table {
            index_names: base.index_names.clone(),
            column_names: base.column_names.clone(),
            index,
            columns,
            cells,
        },
        dropped_rows,
    })
}

/// Split columns by their top-level label into the two named groups and stack
/// the groups vertically.
///
/// Each group keeps every row of the input with the group label prefixed to
/// the row key; all rows of the first group come strictly before the second.
/// Within a group the column keys lose the group label; the output columns
/// are the union of both groups' stripped keys (first group's order first,
/// missing cells `Empty`). Columns under neither label are not carried over.
pub fn stack_top_level(table: &Table, names: &[String]) -> Result<Table, AppError> {
    if names.len() != 2 {
        return Err(AppError::shape(format!(
            "Expected exactly two top-level labels to stack, got {}",
            names.len()
        )));
    }
    if table.column_levels() < 2 {
        return Err(AppError::shape(
            "Stacking needs at least two column label levels",
        ));
    }

    let mut groups: Vec<Vec<usize>> = Vec::with_capacity(names.len());
    for name in names {
        let cols: Vec<usize> = (0..table.n_cols())
            .filter(|&c| table.columns[c][0].label() == *name)
            .collect();
        if cols.is_empty() {
            return Err(AppError::shape(format!(
                "Top-level label '{name}' not found among the columns"
            )));
        }
        groups.push(cols);
    }

    let mut out_columns: Vec<Key> = Vec::new();
    for cols in &groups {
        for &c in cols {
            let stripped = table.columns[c][1..].to_vec();
            if !out_columns.contains(&stripped) {
                out_columns.push(stripped);
            }
        }
    }

    let mut index = Vec::with_capacity(names.len() * table.n_rows());
    let mut cells = Vec::with_capacity(names.len() * table.n_rows());
    for (name, cols) in names.iter().zip(&groups) {
        for (r, row_key) in table.index.iter().enumerate() {
            let mut key = Vec::with_capacity(row_key.len() + 1);
            key.push(Value::Text(name.clone()));
            key.extend(row_key.iter().cloned());

            let row: Vec<Value> = out_columns
                .iter()
                .map(|out_key| {
                    cols.iter()
                        .find(|&&c| table.columns[c][1..] == out_key[..])
                        .map(|&c| table.cells[r][c].clone())
                        .unwrap_or(Value::Empty)
                })
                .collect();

            index.push(key);
            cells.push(row);
        }
    }

    let mut index_names = Vec::with_capacity(table.index_names.len() + 1);
    index_names.push(String::new());
    index_names.extend(table.index_names.iter().cloned());

    Ok(Table {
        index_names,
        column_names: table.column_names.get(1..).map(<[String]>::to_vec).unwrap_or_default(),
        index,
        columns: out_columns,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn block(variant: &str, rows: &[(f64, f64)]) -> Table {
        Table {
            index_names: vec!["scheme".to_string(), "h".to_string(), "DOF".to_string()],
            column_names: vec![String::new(), String::new()],
            index: rows
                .iter()
                .enumerate()
                .map(|(i, (h, _))| vec![text("P1"), Value::Num(*h), Value::Num((i + 1) as f64)])
                .collect(),
            columns: vec![vec![text(variant), text("S_L1")]],
            cells: rows.iter().map(|(_, n)| vec![Value::Num(*n)]).collect(),
        }
    }

    #[test]
    fn concat_aligns_shared_index_without_loss() {
        let rows = [(0.1, 0.04), (0.05, 0.01)];
        let bc = block("BC", &rows);
        let vg = block("VG", &[(0.1, 0.03), (0.05, 0.009)]);

        let outcome = concat_columns(&[bc.clone(), vg]).unwrap();
        let merged = outcome.table;

        assert!(outcome.dropped_rows.is_empty());
        assert_eq!(merged.n_rows(), 2);
        assert_eq!(merged.n_cols(), 2);
        assert_eq!(merged.index, bc.index);
        assert_eq!(merged.cells[0], vec![Value::Num(0.04), Value::Num(0.03)]);
    }

    #[test]
    fn concat_reports_rows_missing_from_first_table() {
        let bc = block("BC", &[(0.1, 0.04)]);
        let vg = block("VG", &[(0.1, 0.03), (0.05, 0.009)]);

        let outcome = concat_columns(&[bc, vg]).unwrap();
        assert_eq!(outcome.table.n_rows(), 1);
        assert_eq!(outcome.dropped_rows, vec!["P1/0.05/2".to_string()]);
    }

    #[test]
    fn concat_fills_missing_rows_with_empty_cells() {
        let bc = block("BC", &[(0.1, 0.04), (0.05, 0.01)]);
        let vg = block("VG", &[(0.1, 0.03)]);

        let merged = concat_columns(&[bc, vg]).unwrap().table;
        assert_eq!(merged.cells[1][1], Value::Empty);
    }

    #[test]
    fn concat_rejects_duplicate_columns() {
        let bc = block("BC", &[(0.1, 0.04)]);
        let err = concat_columns(&[bc.clone(), bc]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn stack_orders_first_variant_before_second() {
        let rows = [(0.1, 0.04), (0.05, 0.01)];
        let merged = concat_columns(&[block("BC", &rows), block("VG", &rows)])
            .unwrap()
            .table;

        let names = vec!["BC".to_string(), "VG".to_string()];
        let stacked = stack_top_level(&merged, &names).unwrap();

        assert_eq!(stacked.n_rows(), 4);
        assert_eq!(stacked.n_cols(), 1);
        assert_eq!(stacked.columns[0], vec![text("S_L1")]);
        assert_eq!(stacked.index[0][0], text("BC"));
        assert_eq!(stacked.index[1][0], text("BC"));
        assert_eq!(stacked.index[2][0], text("VG"));
        assert_eq!(stacked.index[3][0], text("VG"));
        assert_eq!(stacked.index_names.len(), 4);
    }

    #[test]
    fn stack_requires_both_labels() {
        let merged = concat_columns(&[block("BC", &[(0.1, 0.04)])]).unwrap().table;
        let names = vec!["BC".to_string(), "VG".to_string()];
        let err = stack_top_level(&merged, &names).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn transpose_and_stack_twice_round_trips_cell_values() {
        let rows = [(0.1, 0.04), (0.05, 0.01)];
        let merged = concat_columns(&[block("BC", &rows), block("VG", &rows)])
            .unwrap()
            .table;
        let names = vec!["BC".to_string(), "VG".to_string()];
        let stacked = stack_top_level(&merged, &names).unwrap();

        let once = stack_top_level(&stacked.transpose(), &names).unwrap();
        let twice = stack_top_level(&once.transpose(), &names).unwrap();

        assert_eq!(twice.n_rows(), stacked.n_rows());
        assert_eq!(twice.n_cols(), stacked.n_cols());
        for (r, row_key) in twice.index.iter().enumerate() {
            let orig_r = stacked.row_position(row_key).unwrap();
            for (c, col_key) in twice.columns.iter().enumerate() {
                let orig_c = stacked.col_position(col_key).unwrap();
                assert_eq!(twice.cells[r][c], stacked.cells[orig_r][orig_c]);
            }
        }
    }
}
