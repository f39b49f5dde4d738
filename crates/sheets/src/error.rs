use std::path::PathBuf;

use guestlist_core::CoreError;

/// Errors raised while reading or writing spreadsheet files.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// The workbook could not be opened or parsed.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// The workbook has no worksheet to read.
    #[error("{} has no worksheets", .0.display())]
    NoWorksheet(PathBuf),

    /// The workbook could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// The table does not fit in a worksheet.
    #[error("Table too large for a worksheet: {0}")]
    TooLarge(String),

    /// The loaded data violates a table rule (e.g. a required column is missing).
    #[error(transparent)]
    Core(#[from] CoreError),
}
