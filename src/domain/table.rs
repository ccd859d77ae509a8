//! The labeled table that flows through the whole pipeline.
//!
//! A `Table` keeps:
//!
//! - an ordered sequence of rows, each keyed by a multi-part index
//!   (discretization label, mesh size `h`, DOF count)
//! - an ordered sequence of columns, each keyed by a multi-part label
//!   (model variant, quantity-norm name)
//! - row-major cells
//!
//! Row and column order are meaningful: the EOC estimator walks rows in
//! existing order, so rows must already be sorted by refinement level within
//! each discretization group (the loader preserves file order).

/// One cell value, or one part of a row/column key.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Empty,
    Num(f64),
    Text(String),
}

impl Value {
    /// Parse a raw CSV field: empty stays empty, numeric-looking fields become
    /// numbers, everything else is kept as text.
    pub fn parse(raw: &str) -> Value {
        let raw = raw.trim();
        if raw.is_empty() {
            return Value::Empty;
        }
        match raw.parse::<f64>() {
            Ok(v) => Value::Num(v),
            Err(_) => Value::Text(raw.to_string()),
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(v) => Some(*v),
            _ => None,
        }
    }

    /// Plain-text form used for key matching and diagnostics.
    pub fn label(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Num(v) => v.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

/// A multi-part row or column key.
pub type Key = Vec<Value>;

/// Join a key into a readable label for warnings and error messages.
pub fn key_label(key: &[Value]) -> String {
    let parts: Vec<String> = key.iter().map(Value::label).collect();
    parts.join("/")
}

/// An ordered table with multi-part row and column keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Names of the row key parts (from the last header record of a block).
    pub index_names: Vec<String>,
    /// Names of the column key levels (usually unnamed).
    pub column_names: Vec<String>,
    pub index: Vec<Key>,
    pub columns: Vec<Key>,
    /// Row-major cells; `cells[row][col]`.
    pub cells: Vec<Vec<Value>>,
}

impl Table {
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Number of column key parts (header rows when rendered).
    pub fn column_levels(&self) -> usize {
        self.columns.first().map(|k| k.len()).unwrap_or(0)
    }

    pub fn col_position(&self, key: &[Value]) -> Option<usize> {
        self.columns.iter().position(|k| k.as_slice() == key)
    }

    pub fn row_position(&self, key: &[Value]) -> Option<usize> {
        self.index.iter().position(|k| k.as_slice() == key)
    }

    /// Append a new column filled with `Empty` cells; returns its position.
    pub fn add_column(&mut self, key: Key) -> usize {
        self.columns.push(key);
        for row in &mut self.cells {
            row.push(Value::Empty);
        }
        self.columns.len() - 1
    }

    /// Swap rows and columns (keys, level names and cells).
    pub fn transpose(&self) -> Table {
        let mut cells = vec![vec![Value::Empty; self.index.len()]; self.columns.len()];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                cells[c][r] = v.clone();
            }
        }
        Table {
            index_names: self.column_names.clone(),
            column_names: self.index_names.clone(),
            index: self.columns.clone(),
            columns: self.index.clone(),
            cells,
        }
    }
}
