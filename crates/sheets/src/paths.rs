//! Locations of the guest list data files.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "Data";

/// Source guest list.
pub const GUEST_FILE: &str = "guest.xlsx";

/// Outbound invitation targets.
pub const OUTBOUND_FILE: &str = "to_wsp.xlsx";

/// Delivery snapshot written from the guest list.
pub const GUEST_SNAPSHOT_FILE: &str = "wsp_status.xlsx";

/// Prefix of the timestamped delivery-status snapshots.
pub const STATUS_SNAPSHOT_PREFIX: &str = "wsp_status__";

/// Timestamp format embedded in status snapshot names.
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M";

/// Resolves the data files inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub data_dir: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the data directory from `GUESTLIST_DATA_DIR` (default `Data`).
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("GUESTLIST_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
        )
    }

    pub fn guest_list(&self) -> PathBuf {
        self.data_dir.join(GUEST_FILE)
    }

    pub fn outbound(&self) -> PathBuf {
        self.data_dir.join(OUTBOUND_FILE)
    }

    pub fn guest_snapshot(&self) -> PathBuf {
        self.data_dir.join(GUEST_SNAPSHOT_FILE)
    }

    /// Timestamped status snapshot for a batch run at `at`.
    pub fn status_snapshot(&self, at: NaiveDateTime) -> PathBuf {
        status_snapshot_in(&self.data_dir, at)
    }
}

/// `wsp_status__YYYYMMDD-HHMM.xlsx` inside `dir`.
pub fn status_snapshot_in(dir: &Path, at: NaiveDateTime) -> PathBuf {
    dir.join(format!(
        "{STATUS_SNAPSHOT_PREFIX}{}.xlsx",
        at.format(SNAPSHOT_TIMESTAMP_FORMAT)
    ))
}
