//! The outbound invitation targets (`to_wsp.xlsx`).
//!
//! Loaded as-is. Saving never overwrites the source: each save writes a
//! new `wsp_status__YYYYMMDD-HHMM.xlsx` next to it.

use std::path::{Path, PathBuf};

use chrono::Local;
use guestlist_core::{apply_to_rows, Cell, Row, Table};

use crate::error::SheetError;
use crate::paths::status_snapshot_in;
use crate::source::RecordSource;
use crate::workbook::{read_table, write_table};

/// Rows to send invitations to.
#[derive(Debug, Clone)]
pub struct OutboundList {
    path: PathBuf,
    table: Table,
}

impl OutboundList {
    /// Wrap an already-loaded table whose results belong next to `path`.
    pub fn from_table(path: impl Into<PathBuf>, table: Table) -> Self {
        Self {
            path: path.into(),
            table,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for OutboundList {
    fn load(path: &Path) -> Result<Self, SheetError> {
        let table = read_table(path)?;
        tracing::info!(path = %path.display(), rows = table.len(), "Outbound list loaded");
        Ok(Self::from_table(path, table))
    }

    fn save(&self) -> Result<PathBuf, SheetError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        let target = status_snapshot_in(dir, Local::now().naive_local());
        write_table(&self.table, &target)?;
        tracing::info!(path = %target.display(), rows = self.table.len(), "Status snapshot saved");
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
