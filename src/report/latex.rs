//! LaTeX tabular writer.
//!
//! Serializes a `Table` into a `tabular` environment. Multi-part column keys
//! produce one header row per key part, with horizontally adjacent equal
//! labels merged into `\multicolumn` cells; the row key parts render as
//! leading body columns with repeated labels blanked, so stacked variant
//! groups read like merged cells.
//!
//! The emitted file is a fragment meant to be `\input` into a document that
//! loads `booktabs` (for the `eoc` template).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::domain::{Table, Value};
use crate::error::AppError;
use crate::report::headers::HeaderDict;

/// Named table template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Booktabs rules with a separator line between stacked variant groups.
    Eoc,
    /// Plain `\hline` rules, no group separators.
    Plain,
}

impl Template {
    pub fn from_name(name: &str) -> Result<Template, AppError> {
        match name {
            "eoc" => Ok(Template::Eoc),
            "plain" => Ok(Template::Plain),
            other => Err(AppError::input(format!(
                "Unknown template '{other}' (expected 'eoc' or 'plain')"
            ))),
        }
    }

    fn top_rule(self) -> &'static str {
        match self {
            Template::Eoc => "\\toprule",
            Template::Plain => "\\hline",
        }
    }

    fn mid_rule(self) -> &'static str {
        match self {
            Template::Eoc => "\\midrule",
            Template::Plain => "\\hline",
        }
    }

    fn bottom_rule(self) -> &'static str {
        match self {
            Template::Eoc => "\\bottomrule",
            Template::Plain => "\\hline",
        }
    }
}

/// Render a table to LaTeX source (deterministic; no timestamp).
pub fn render_latex(table: &Table, dict: &HeaderDict, template: Template) -> String {
    let n_index = table.index_names.len();
    let levels = table.column_levels();

    let mut out = String::new();
    let colspec = format!("{}{}", "l".repeat(n_index), "r".repeat(table.n_cols()));
    out.push_str(&format!("\\begin{{tabular}}{{{colspec}}}\n"));
    out.push_str(template.top_rule());
    out.push('\n');

    for level in 0..levels {
        let mut cells: Vec<String> = Vec::with_capacity(n_index + table.n_cols());
        for name in &table.index_names {
            // Index names sit on the last header row only.
            if level + 1 == levels {
                cells.push(dict.display(name));
            } else {
                cells.push(String::new());
            }
        }

        let mut c = 0;
        while c < table.n_cols() {
            let mut span = 1;
            while c + span < table.n_cols()
                && table.columns[c + span][..=level] == table.columns[c][..=level]
            {
                span += 1;
            }
            let (text, span_override) = header_cell(&table.columns[c][level], dict, level);
            let width = span_override.unwrap_or(span);
            if width > 1 {
                cells.push(format!("\\multicolumn{{{width}}}{{c}}{{{text}}}"));
            } else {
                cells.push(text);
            }
            c += span;
        }

        out.push_str(&cells.join(" & "));
        out.push_str(" \\\\\n");
    }

    if levels > 0 {
        out.push_str(template.mid_rule());
        out.push('\n');
    }

    for r in 0..table.n_rows() {
        if template == Template::Eoc
            && r > 0
            && n_index > 0
            && table.index[r][0] != table.index[r - 1][0]
        {
            out.push_str(template.mid_rule());
            out.push('\n');
        }

        let mut cells: Vec<String> = Vec::with_capacity(n_index + table.n_cols());
        for i in 0..n_index {
            let repeated = r > 0 && table.index[r][..=i] == table.index[r - 1][..=i];
            if repeated {
                cells.push(String::new());
            } else {
                cells.push(display_value(&table.index[r][i], dict));
            }
        }
        for value in &table.cells[r] {
            cells.push(format_cell(value));
        }

        out.push_str(&cells.join(" & "));
        out.push_str(" \\\\\n");
    }

    out.push_str(template.bottom_rule());
    out.push('\n');
    out.push_str("\\end{tabular}\n");
    out
}

/// Render and write `table` to `path`, stamped with a generation comment.
pub fn write_latex(
    table: &Table,
    path: &Path,
    dict: &HeaderDict,
    template: Template,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create '{}': {e}", path.display()))
    })?;
    writeln!(file, "% generated by eoctab on {}", Local::now().to_rfc3339())
        .map_err(|e| AppError::input(format!("Failed to write '{}': {e}", path.display())))?;
    file.write_all(render_latex(table, dict, template).as_bytes())
        .map_err(|e| AppError::input(format!("Failed to write '{}': {e}", path.display())))?;
    Ok(())
}

/// Header cell text plus an optional forced column span from the dictionary.
fn header_cell(value: &Value, dict: &HeaderDict, level: usize) -> (String, Option<usize>) {
    match value {
        Value::Text(raw) => match dict.lookup(raw) {
            Some(label) if label.level.is_none_or(|want| want as usize == level) => {
                (label.text.clone(), label.span)
            }
            _ => (raw.clone(), None),
        },
        Value::Num(v) => (format_number(*v), None),
        Value::Empty => (String::new(), None),
    }
}

/// Row key part display: text goes through the dictionary, numbers are
/// formatted like body cells.
fn display_value(value: &Value, dict: &HeaderDict) -> String {
    match value {
        Value::Text(raw) => dict.display(raw),
        Value::Num(v) => format_number(*v),
        Value::Empty => String::new(),
    }
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Empty => "--".to_string(),
        Value::Num(v) => format_number(*v),
        Value::Text(s) => s.clone(),
    }
}

/// Format a number for a table cell.
///
/// Integers render plainly, moderate magnitudes in fixed notation with
/// trailing zeros trimmed, everything else as `$ m \times 10^{e} $`.
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return "--".to_string();
    }
    if v == v.trunc() && v.abs() < 1e7 {
        return format!("{v:.0}");
    }
    let magnitude = v.abs();
    if (1e-3..1e6).contains(&magnitude) {
        return trim_zeros(format!("{v:.6}"));
    }
    let mut exp = magnitude.log10().floor() as i32;
    let mut mantissa = v / 10f64.powi(exp);
    if mantissa.abs() >= 10.0 {
        mantissa /= 10.0;
        exp += 1;
    }
    // Rounding to three decimals can carry the mantissa up to 10.
    if format!("{:.3}", mantissa.abs()).starts_with("10") {
        mantissa /= 10.0;
        exp += 1;
    }
    format!(
        "$ {} \\times 10^{{{exp}}} $",
        trim_zeros(format!("{mantissa:.3}"))
    )
}

fn trim_zeros(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
