//! Column definitions and SQL statement text.
//!
//! Values are always bound as `?` parameters. Identifiers cannot be bound,
//! so every table and column name passes through [`quote_ident`] first.

use guestlist_core::{ColumnType, Table};

use crate::error::MirrorError;
use crate::filter::Filter;

/// MySQL's identifier length limit.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// One column of a mirrored table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn sql_type(&self) -> &'static str {
        sql_type(self.column_type)
    }
}

/// The fixed mapping from inferred cell types to MySQL column types.
pub fn sql_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Text => "VARCHAR(255)",
        ColumnType::Integer => "INT",
        ColumnType::Float => "FLOAT",
        ColumnType::DateTime => "DATETIME",
    }
}

/// Column definitions for `table`, one per column, in order.
pub fn derive_schema(table: &Table) -> Vec<ColumnDef> {
    table
        .columns()
        .iter()
        .zip(table.column_types())
        .map(|(name, column_type)| ColumnDef::new(name.clone(), column_type))
        .collect()
}

/// Validate `name` and wrap it in backticks.
pub fn quote_ident(name: &str) -> Result<String, MirrorError> {
    if name.is_empty()
        || name.len() > MAX_IDENTIFIER_LEN
        || name.contains('`')
        || name.contains('\0')
    {
        return Err(MirrorError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("`{name}`"))
}

fn quote_list<S: AsRef<str>>(names: &[S]) -> Result<String, MirrorError> {
    let quoted = names
        .iter()
        .map(|n| quote_ident(n.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(quoted.join(", "))
}

fn where_clause(filter: Option<&Filter>) -> Result<String, MirrorError> {
    match filter {
        Some(filter) => Ok(format!(" WHERE {}", filter.to_sql()?)),
        None => Ok(String::new()),
    }
}

pub fn drop_table_sql(table: &str) -> Result<String, MirrorError> {
    Ok(format!("DROP TABLE IF EXISTS {}", quote_ident(table)?))
}

pub fn create_table_sql(table: &str, columns: &[ColumnDef]) -> Result<String, MirrorError> {
    if columns.is_empty() {
        return Err(MirrorError::NoColumns(table.to_string()));
    }
    let defs = columns
        .iter()
        .map(|c| Ok(format!("{} {}", quote_ident(&c.name)?, c.sql_type())))
        .collect::<Result<Vec<_>, MirrorError>>()?;
    Ok(format!(
        "CREATE TABLE {} ({})",
        quote_ident(table)?,
        defs.join(", ")
    ))
}

pub fn insert_sql<S: AsRef<str>>(table: &str, columns: &[S]) -> Result<String, MirrorError> {
    if columns.is_empty() {
        return Err(MirrorError::NoColumns(table.to_string()));
    }
    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quote_ident(table)?,
        quote_list(columns)?
    ))
}

/// `SELECT` of `columns` (all when `None`), restricted by `filter`.
pub fn select_sql(
    table: &str,
    columns: Option<&[&str]>,
    filter: Option<&Filter>,
) -> Result<String, MirrorError> {
    let projection = match columns {
        Some(columns) if !columns.is_empty() => quote_list(columns)?,
        _ => "*".to_string(),
    };
    Ok(format!(
        "SELECT {projection} FROM {}{}",
        quote_ident(table)?,
        where_clause(filter)?
    ))
}

/// `UPDATE` setting each of `columns`. Without a filter every row is updated.
pub fn update_sql(
    table: &str,
    columns: &[&str],
    filter: Option<&Filter>,
) -> Result<String, MirrorError> {
    if columns.is_empty() {
        return Err(MirrorError::NoColumns(table.to_string()));
    }
    let assignments = columns
        .iter()
        .map(|c| Ok(format!("{} = ?", quote_ident(c)?)))
        .collect::<Result<Vec<_>, MirrorError>>()?;
    Ok(format!(
        "UPDATE {} SET {}{}",
        quote_ident(table)?,
        assignments.join(", "),
        where_clause(filter)?
    ))
}

/// `DELETE`. Without a filter every row is deleted.
pub fn delete_sql(table: &str, filter: Option<&Filter>) -> Result<String, MirrorError> {
    Ok(format!(
        "DELETE FROM {}{}",
        quote_ident(table)?,
        where_clause(filter)?
    ))
}
