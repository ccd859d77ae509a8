//! Estimated order of convergence.
//!
//! For each norm column the estimator appends a `<name>_eoc` column holding
//! the empirical convergence rate between successive refinement levels:
//!
//! ```text
//! eoc = ln(norm_i / norm_{i-1}) / ln(h_i / h_{i-1})
//! ```
//!
//! The rate is written onto the *previous* row, so the EOC reported alongside
//! a row is the order achieved by refining from that row to the next one. The
//! last row in the table is always left empty: there is no finer level to
//! compare against.

use crate::domain::{Table, Value, key_label};
use crate::error::AppError;

/// Append an EOC column for every column whose last key part is in
/// `norm_columns`.
///
/// The mesh size is taken from part 1 of each row key. Rows are walked in
/// existing order; group boundaries are the caller's responsibility (data
/// files list each discretization group contiguously, coarse to fine).
pub fn recalculate_eocs(table: &mut Table, norm_columns: &[String]) -> Result<(), AppError> {
    let n_rows = table.n_rows();
    if n_rows == 0 {
        return Ok(());
    }

    let existing = table.columns.clone();
    for key in existing {
        let name = match key.last() {
            Some(Value::Text(name)) => name.clone(),
            _ => continue,
        };
        if !norm_columns.iter().any(|n| *n == name) {
            continue;
        }
        let Some(col) = table.col_position(&key) else {
            continue;
        };

        let mut eoc_key = key[..key.len() - 1].to_vec();
        eoc_key.push(Value::Text(format!("{name}_eoc")));
        let eoc_col = match table.col_position(&eoc_key) {
            Some(c) => c,
            None => table.add_column(eoc_key),
        };

        let mut prev: Option<(f64, f64)> = None;
        for r in 0..n_rows {
            let row_label = key_label(&table.index[r]);
            let h = table.index[r]
                .get(1)
                .and_then(Value::as_num)
                .ok_or_else(|| {
                    AppError::domain(format!("Row '{row_label}' has no numeric mesh size"))
                })?;
            let norm = table.cells[r][col].as_num().ok_or_else(|| {
                AppError::domain(format!(
                    "Missing or non-numeric value in column '{}' at row '{row_label}'",
                    key_label(&key)
                ))
            })?;

            if let Some((prev_h, prev_norm)) = prev {
                if h <= 0.0 || prev_h <= 0.0 || h == prev_h {
                    return Err(AppError::domain(format!(
                        "Cannot compute EOC between mesh sizes {prev_h} and {h} at row '{row_label}'"
                    )));
                }
                if norm <= 0.0 || prev_norm <= 0.0 {
                    return Err(AppError::domain(format!(
                        "Non-positive norm in column '{}' at row '{row_label}'",
                        key_label(&key)
                    )));
                }
                let rate = (norm / prev_norm).ln() / (h / prev_h).ln();
                table.cells[r - 1][eoc_col] = Value::Num(rate);
            }
            prev = Some((h, norm));
        }

        // The final row never has a finer level to compare against, even when
        // re-running over a table that already carries an EOC column.
        table.cells[n_rows - 1][eoc_col] = Value::Empty;
    }

    Ok(())
}
