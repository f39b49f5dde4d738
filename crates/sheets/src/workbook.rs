//! Reading and writing a [`Table`] as the first worksheet of a workbook.
//!
//! Reads go through `calamine` and render every cell as text, the way a
//! spreadsheet user sees it. Writes go through `rust_xlsxwriter` and
//! overwrite the target file.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use guestlist_core::{Cell, Table};
use rust_xlsxwriter::Workbook;

use crate::error::SheetError;

/// Floats with no fractional part below this magnitude are rendered as integers.
const INTEGRAL_FLOAT_LIMIT: f64 = 1e15;

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Load the first worksheet of `path`.
///
/// The first row is the header. Every other cell becomes [`Cell::Text`],
/// or [`Cell::Empty`] when the spreadsheet cell is blank. A sheet with no
/// rows loads as an empty table with no columns.
pub fn read_table(path: &Path) -> Result<Table, SheetError> {
    let read_err = |source| SheetError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(read_err)?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(SheetError::NoWorksheet(path.to_path_buf()));
    };
    let range = workbook.worksheet_range(&sheet).map_err(read_err)?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };

    let columns = header.iter().enumerate().map(|(i, data)| match data_to_cell(data) {
        Cell::Empty => format!("Unnamed: {i}"),
        cell => cell.to_string(),
    });
    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(data_to_cell).collect())?;
    }

    tracing::debug!(path = %path.display(), sheet = %sheet, rows = table.len(), "Loaded worksheet");
    Ok(table)
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(n) => Cell::Text(n.to_string()),
        Data::Float(f) => Cell::Text(format_float(*f)),
        Data::Bool(b) => Cell::text(if *b { "True" } else { "False" }),
        Data::DateTime(dt) => Cell::Text(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#ERR({e:?})")),
    }
}

/// Render a float the way it reads in a sheet: `1.0` is `"1"`.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < INTEGRAL_FLOAT_LIMIT {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// Write `table` to `path` as a single worksheet, replacing the file.
///
/// Empty cells and empty texts are left blank, numbers are written as
/// numbers and everything else as text.
pub fn write_table(table: &Table, path: &Path) -> Result<(), SheetError> {
    let write_err = |source| SheetError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        sheet
            .write_string(0, column_number(col)?, name.as_str())
            .map_err(write_err)?;
    }

    for (idx, row) in table.raw_rows().iter().enumerate() {
        let row_num = row_number(idx + 1)?;
        for (col, cell) in row.iter().enumerate() {
            let col_num = column_number(col)?;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) if s.is_empty() => {}
                Cell::Text(s) => {
                    sheet
                        .write_string(row_num, col_num, s.as_str())
                        .map_err(write_err)?;
                }
                Cell::Integer(n) => {
                    sheet
                        .write_number(row_num, col_num, *n as f64)
                        .map_err(write_err)?;
                }
                Cell::Float(x) => {
                    sheet
                        .write_number(row_num, col_num, *x)
                        .map_err(write_err)?;
                }
                Cell::DateTime(_) => {
                    sheet
                        .write_string(row_num, col_num, &cell.to_string())
                        .map_err(write_err)?;
                }
            }
        }
    }

    workbook.save(path).map_err(write_err)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "Wrote worksheet");
    Ok(())
}

fn row_number(idx: usize) -> Result<u32, SheetError> {
    u32::try_from(idx).map_err(|_| SheetError::TooLarge(format!("row {idx}")))
}

fn column_number(idx: usize) -> Result<u16, SheetError> {
    u16::try_from(idx).map_err(|_| SheetError::TooLarge(format!("column {idx}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
