#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}
