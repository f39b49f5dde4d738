//! Guest list core: the in-memory table model and the pure logic that
//! runs over it.
//!
//! Nothing in this crate touches the filesystem, the database or the
//! browser. Those collaborators live in the `sheets`, `db` and
//! `messaging` crates and feed [`Table`] values through the functions
//! here.

pub mod dispatch;
pub mod error;
pub mod guest;
pub mod message;
pub mod phone;
pub mod reconcile;
pub mod table;

pub use dispatch::{apply_to_rows, dispatch, RowAction};
pub use error::CoreError;
pub use table::{Cell, ColumnType, Row, Table};
