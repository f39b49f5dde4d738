//! The source guest list (`guest.xlsx`).
//!
//! Opening a [`GuestList`] reconciles it: blank identifiers are filled,
//! text is upper-cased and the result is written back to the source file
//! at once, so identifiers stay stable across runs. The file is then
//! reloaded and its missing values are folded into the `"NULL"` sentinel.

use std::path::{Path, PathBuf};

use guestlist_core::reconcile::{self, ReconcileReport};
use guestlist_core::{apply_to_rows, Cell, Row, Table};
use rand::Rng;

use crate::error::SheetError;
use crate::paths::GUEST_SNAPSHOT_FILE;
use crate::source::RecordSource;
use crate::workbook::{read_table, write_table};

/// The reconciled guest list.
#[derive(Debug, Clone)]
pub struct GuestList {
    path: PathBuf,
    table: Table,
    report: ReconcileReport,
}

impl GuestList {
    /// Open and reconcile the guest list at `path` using `rng` for new
    /// identifiers.
    ///
    /// Fails without touching the file if the sheet cannot be read or
    /// lacks the `ID`/`APELLIDOS` columns. A failed write is returned as
    /// an error; reconciliation is then incomplete.
    pub fn open_with_rng<R: Rng>(path: &Path, rng: &mut R) -> Result<Self, SheetError> {
        let mut table = read_table(path)?;
        let report = reconcile::reconcile(&mut table, rng)?;
        write_table(&table, path)?;

        let mut table = read_table(path)?;
        reconcile::normalize_absent(&mut table);

        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            dropped_rows = report.dropped_rows,
            generated_ids = report.generated_ids,
            "Guest list reconciled",
        );
        for id in &report.duplicate_ids {
            tracing::warn!(id = %id, "Guest identifier is shared by more than one row");
        }

        Ok(Self {
            path: path.to_path_buf(),
            table,
            report,
        })
    }

    /// The source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What the opening reconciliation changed.
    pub fn report(&self) -> &ReconcileReport {
        &self.report
    }

    /// Where [`save`](RecordSource::save) writes: `wsp_status.xlsx` next
    /// to the source file. The source itself is only written by
    /// reconciliation.
    pub fn snapshot_path(&self) -> PathBuf {
        self.path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(GUEST_SNAPSHOT_FILE)
    }

    pub fn into_table(self) -> Table {
        self.table
    }
}

impl RecordSource for GuestList {
    fn load(path: &Path) -> Result<Self, SheetError> {
        Self::open_with_rng(path, &mut rand::rng())
    }

    fn save(&self) -> Result<PathBuf, SheetError> {
        let target = self.snapshot_path();
        write_table(&self.table, &target)?;
        tracing::info!(path = %target.display(), rows = self.table.len(), "Guest snapshot saved");
        Ok(target)
    }

    fn apply_to_rows<F>(&mut self, name: &str, f: F) -> Result<&Table, SheetError>
    where
        F: FnMut(Row<'_>) -> Cell,
    {
        apply_to_rows(&mut self.table, name, f)?;
        Ok(&self.table)
    }

    fn table(&self) -> &Table {
        &self.table
    }

    fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }
}
