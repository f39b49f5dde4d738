//! The capability shared by spreadsheet-backed record sources.

use std::path::{Path, PathBuf};

use guestlist_core::{Cell, Row, Table};

use crate::error::SheetError;

/// A table loaded from a spreadsheet that can be transformed row by row
/// and saved again.
///
/// Each source decides for itself what loading involves and where saved
/// results go.
pub trait RecordSource: Sized {
    /// Load the source from the spreadsheet at `path`.
    fn load(path: &Path) -> Result<Self, SheetError>;

    /// Persist the current table. Returns the file written.
    fn save(&self) -> Result<PathBuf, SheetError>;

    /// Apply `f` to every row, storing the results in column `name`.
    fn apply_to_rows<F>(&mut self, name: &str, f: F) -> Result<&Table, SheetError>
    where
        F: FnMut(Row<'_>) -> Cell;

    fn table(&self) -> &Table;

    fn table_mut(&mut self) -> &mut Table;
}
