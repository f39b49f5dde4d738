//! In-memory tabular data: named columns over rows of [`Cell`]s.
//!
//! A [`Table`] is the single mutable source of truth during a run. The
//! spreadsheet file and the SQL mirror are both projections of it.

use chrono::NaiveDateTime;

use crate::error::CoreError;

/// Format used when a date-time cell is rendered as text.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One value in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A truly missing value, as produced by a blank spreadsheet cell.
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Borrow the string of a text cell. Every other variant yields `None`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The column type this value votes for, `None` for [`Cell::Empty`].
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Self::Empty => None,
            Self::Text(_) => Some(ColumnType::Text),
            Self::Integer(_) => Some(ColumnType::Integer),
            Self::Float(_) => Some(ColumnType::Float),
            Self::DateTime(_) => Some(ColumnType::DateTime),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

// ---------------------------------------------------------------------------
// ColumnType
// ---------------------------------------------------------------------------

/// The inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    DateTime,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::DateTime => "datetime",
        }
    }

    /// Infer a column type from its cells.
    ///
    /// Empty cells are ignored. Integers mixed with floats widen to
    /// [`ColumnType::Float`]; any other mix, or a column with no present
    /// cell at all, is [`ColumnType::Text`].
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut seen: Option<ColumnType> = None;
        for ty in cells.into_iter().filter_map(Cell::column_type) {
            seen = Some(match (seen, ty) {
                (None, ty) => ty,
                (Some(prev), ty) if prev == ty => prev,
                (Some(Self::Integer), Self::Float) | (Some(Self::Float), Self::Integer) => {
                    Self::Float
                }
                _ => return Self::Text,
            });
        }
        seen.unwrap_or(Self::Text)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// A borrowed view of one table row.
///
/// Values are in column order; [`get`](Self::get) addresses them by
/// column name instead.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Cell],
}

impl<'a> Row<'a> {
    pub fn new(columns: &'a [String], values: &'a [Cell]) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    /// Cell values in column order.
    pub fn values(&self) -> &'a [Cell] {
        self.values
    }

    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// Text of the named column. Missing columns and non-text cells give `None`.
    pub fn text(&self, column: &str) -> Option<&'a str> {
        self.get(column).and_then(Cell::as_text)
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Named columns over rows of cells. Every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// An empty table with the given header.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from a header and rows, padding short rows with
    /// [`Cell::Empty`]. Rows wider than the header are rejected.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = Vec<Cell>>,
    ) -> Result<Self, CoreError> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`column_index`](Self::column_index) but a missing column is an error.
    pub fn require_column(&self, name: &str) -> Result<usize, CoreError> {
        self.column_index(name)
            .ok_or_else(|| CoreError::MissingColumn(name.to_string()))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, padding it to the table width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) -> Result<(), CoreError> {
        if row.len() > self.columns.len() {
            return Err(CoreError::RowWidth {
                row: self.rows.len(),
                found: row.len(),
                expected: self.columns.len(),
            });
        }
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
        Ok(())
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|v| Row::new(&self.columns, v))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|v| Row::new(&self.columns, v))
    }

    /// Raw row storage, in column order.
    pub fn raw_rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(column))
    }

    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |r| r.get(column))
    }

    /// Every cell of the table, row by row.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.rows.iter_mut().flatten()
    }

    /// Keep only the rows for which `keep` returns true.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(Row<'_>) -> bool) {
        let columns = &self.columns;
        self.rows.retain(|values| keep(Row::new(columns, values)));
    }

    /// Set a whole column. An existing column of that name is overwritten
    /// in place; otherwise the column is appended at the end.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) -> Result<(), CoreError> {
        if values.len() != self.rows.len() {
            return Err(CoreError::Validation(format!(
                "column {name} has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Inferred type of one column.
    pub fn column_type(&self, column: usize) -> ColumnType {
        ColumnType::infer(self.column_values(column))
    }

    /// Inferred types of all columns, in column order.
    pub fn column_types(&self) -> Vec<ColumnType> {
        (0..self.columns.len()).map(|i| self.column_type(i)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
