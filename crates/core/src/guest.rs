//! Guest list column names and the absent-value conventions.
//!
//! The spreadsheet headers are Spanish and fixed; every crate refers to
//! them through these constants.

/// Spreadsheet/SQL column names of a guest row.
pub mod columns {
    pub const ID: &str = "ID";
    pub const SEX: &str = "SEX";
    /// Last names.
    pub const LAST_NAME: &str = "APELLIDOS";
    /// First names.
    pub const FIRST_NAME: &str = "NOMBRES";
    /// Party size, stored as text.
    pub const PARTY_SIZE: &str = "NUMBER_GUEST";
    pub const TABLE_NUMBER: &str = "MESA";
    /// Free-text phone field, possibly several numbers.
    pub const PHONE: &str = "CELULAR";
    pub const CONFIRMED: &str = "CONFIRMADO";
}

/// Guest columns in their canonical order.
pub const GUEST_COLUMNS: [&str; 8] = [
    columns::ID,
    columns::SEX,
    columns::LAST_NAME,
    columns::FIRST_NAME,
    columns::PARTY_SIZE,
    columns::TABLE_NUMBER,
    columns::PHONE,
    columns::CONFIRMED,
];

/// Text stored in place of a missing value once a table is reconciled.
///
/// Consumers (the lookup API, the invitation site) treat this literal as
/// "absent". Note that it is indistinguishable from a guest whose data is
/// literally the word NULL.
pub const ABSENT_SENTINEL: &str = "NULL";

/// Cell texts folded into [`ABSENT_SENTINEL`] after a reload.
pub const RELOAD_ABSENT_MARKERS: [&str; 3] = ["", "none", "None"];

/// Texts written to SQL as a real `NULL` by update statements.
pub const SQL_NULL_MARKERS: [&str; 6] = ["None", "none", "NULL", "null", "Null", ""];

/// Phone texts (compared case-insensitively) that mean "no phone".
pub const PHONE_ABSENT_MARKERS: [&str; 3] = ["null", "none", "nan"];
