//! Spreadsheet-backed guest data.
//!
//! - [`workbook`] reads and writes the first worksheet of an `.xlsx` file
//!   as a [`Table`](guestlist_core::Table).
//! - [`RecordSource`] is the capability shared by the spreadsheet sources:
//!   [`GuestList`] (the reconciled guest list) and [`OutboundList`] (the
//!   invitation targets whose results go to a timestamped snapshot).
//! - [`DataPaths`] locates the data files.

pub mod error;
pub mod guests;
pub mod outbound;
pub mod paths;
pub mod source;
pub mod workbook;

pub use error::SheetError;
pub use guests::GuestList;
pub use outbound::OutboundList;
pub use paths::DataPaths;
pub use source::RecordSource;
