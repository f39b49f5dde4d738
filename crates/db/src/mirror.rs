//! The relational copy of the guest table.
//!
//! A [`Mirror`] owns exactly one MySQL connection for its whole lifetime.
//! [`create_from_table`](Mirror::create_from_table) rebuilds the target
//! table from scratch; there is no incremental migration.

use chrono::NaiveDateTime;
use guestlist_core::guest::SQL_NULL_MARKERS;
use guestlist_core::{Cell, CoreError, Table};
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Connection, MySql, MySqlConnection, Row, TypeInfo};

use crate::config::DbConfig;
use crate::error::MirrorError;
use crate::filter::Filter;
use crate::models::guest::Guest;
use crate::repositories::guest_repo::GuestRepo;
use crate::schema::{self, ColumnDef};

type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// A single-connection session against the mirror database.
pub struct Mirror {
    conn: MySqlConnection,
}

impl Mirror {
    /// Open the session. Fails with [`MirrorError::Connection`] when the
    /// server cannot be reached or rejects the credentials.
    pub async fn connect(config: &DbConfig) -> Result<Self, MirrorError> {
        let options = config.connect_options()?;
        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(MirrorError::Connection)?;
        tracing::info!(database = %config.database, "Mirror connection established");
        Ok(Self { conn })
    }

    pub fn from_connection(conn: MySqlConnection) -> Self {
        Self { conn }
    }

    /// Release the connection.
    pub async fn close(self) -> Result<(), MirrorError> {
        self.conn.close().await.map_err(MirrorError::Connection)
    }

    // -----------------------------------------------------------------------
    // Schema
    // -----------------------------------------------------------------------

    pub async fn drop_table(&mut self, table: &str) -> Result<(), MirrorError> {
        let statement = schema::drop_table_sql(table)?;
        self.execute(&statement).await?;
        tracing::debug!(table, "Table dropped");
        Ok(())
    }

    pub async fn create_table(
        &mut self,
        table: &str,
        columns: &[ColumnDef],
    ) -> Result<(), MirrorError> {
        let statement = schema::create_table_sql(table, columns)?;
        self.execute(&statement).await?;
        tracing::debug!(table, columns = columns.len(), "Table created");
        Ok(())
    }

    /// Replace `table` with the contents of `data`.
    ///
    /// The table is dropped if present, recreated from the inferred column
    /// types and filled with one parameterized insert per row. The inserts
    /// run in one transaction committed after the last row.
    pub async fn create_from_table(&mut self, table: &str, data: &Table) -> Result<u64, MirrorError> {
        let columns = schema::derive_schema(data);
        self.drop_table(table).await?;
        self.create_table(table, &columns).await?;
        let inserted = self
            .insert_rows(table, data.columns(), data.raw_rows())
            .await?;
        tracing::info!(table, rows = inserted, "Mirror table rebuilt");
        Ok(inserted)
    }

    /// Insert `rows` in a single transaction. Each row must hold one cell
    /// per entry of `columns`.
    pub async fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Vec<Cell>],
    ) -> Result<u64, MirrorError> {
        let statement = schema::insert_sql(table, columns)?;
        let mut tx = self.conn.begin().await.map_err(MirrorError::Connection)?;

        let mut inserted = 0;
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(CoreError::RowWidth {
                    row: index,
                    found: row.len(),
                    expected: columns.len(),
                }
                .into());
            }
            let query = row
                .iter()
                .fold(sqlx::query(&statement), |q, cell| bind_cell(q, cell));
            let result = query
                .execute(&mut *tx)
                .await
                .map_err(|e| MirrorError::from_statement(&statement, e))?;
            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| MirrorError::from_statement("COMMIT", e))?;
        Ok(inserted)
    }

    // -----------------------------------------------------------------------
    // Rows
    // -----------------------------------------------------------------------

    /// Read `columns` (all when `None`) of the rows matching `filter`.
    ///
    /// Cells are decoded by the SQL type of each result column.
    pub async fn select(
        &mut self,
        table: &str,
        columns: Option<&[&str]>,
        filter: Option<&Filter>,
    ) -> Result<Table, MirrorError> {
        let statement = schema::select_sql(table, columns, filter)?;
        let query = bind_filter(sqlx::query(&statement), filter);
        let rows = query
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| MirrorError::from_statement(&statement, e))?;

        let header: Vec<String> = match (rows.first(), columns) {
            (Some(first), _) => first.columns().iter().map(|c| c.name().to_string()).collect(),
            (None, Some(columns)) => columns.iter().map(|c| c.to_string()).collect(),
            (None, None) => Vec::new(),
        };
        let mut result = Table::new(header);
        for row in &rows {
            let cells = decode_row(row).map_err(|e| MirrorError::from_statement(&statement, e))?;
            result.push_row(cells)?;
        }
        Ok(result)
    }

    /// Set each `(column, value)` on the rows matching `filter`, or on
    /// every row when `filter` is `None`.
    ///
    /// Absent-like values ([`Cell::Empty`] and the [`SQL_NULL_MARKERS`]
    /// texts) are written as SQL `NULL`.
    pub async fn update(
        &mut self,
        table: &str,
        assignments: &[(&str, Cell)],
        filter: Option<&Filter>,
    ) -> Result<u64, MirrorError> {
        let columns: Vec<&str> = assignments.iter().map(|(c, _)| *c).collect();
        let statement = schema::update_sql(table, &columns, filter)?;

        let query = assignments
            .iter()
            .fold(sqlx::query(&statement), |q, (_, value)| {
                if is_sql_null(value) {
                    q.bind(None::<String>)
                } else {
                    bind_cell(q, value)
                }
            });
        let result = bind_filter(query, filter)
            .execute(&mut self.conn)
            .await
            .map_err(|e| MirrorError::from_statement(&statement, e))?;
        tracing::info!(table, rows = result.rows_affected(), "Rows updated");
        Ok(result.rows_affected())
    }

    /// Delete the rows matching `filter`, or every row when `None`.
    pub async fn delete(&mut self, table: &str, filter: Option<&Filter>) -> Result<u64, MirrorError> {
        let statement = schema::delete_sql(table, filter)?;
        let result = bind_filter(sqlx::query(&statement), filter)
            .execute(&mut self.conn)
            .await
            .map_err(|e| MirrorError::from_statement(&statement, e))?;
        tracing::info!(table, rows = result.rows_affected(), "Rows deleted");
        Ok(result.rows_affected())
    }

    /// The guest with invitation code `id`, if any.
    pub async fn fetch_by_id(&mut self, table: &str, id: &str) -> Result<Option<Guest>, MirrorError> {
        GuestRepo::find_by_id(&mut self.conn, table, id).await
    }

    async fn execute(&mut self, statement: &str) -> Result<u64, MirrorError> {
        sqlx::query(statement)
            .execute(&mut self.conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| MirrorError::from_statement(statement, e))
    }
}

// ---------------------------------------------------------------------------
// Binding and decoding
// ---------------------------------------------------------------------------

/// Whether `value` is written to SQL as `NULL` by updates.
pub fn is_sql_null(value: &Cell) -> bool {
    match value {
        Cell::Empty => true,
        Cell::Text(s) => SQL_NULL_MARKERS.contains(&s.as_str()),
        _ => false,
    }
}

fn bind_cell<'q>(query: MySqlQuery<'q>, cell: &'q Cell) -> MySqlQuery<'q> {
    match cell {
        Cell::Empty => query.bind(None::<String>),
        Cell::Text(s) => query.bind(s.as_str()),
        Cell::Integer(n) => query.bind(*n),
        Cell::Float(x) => query.bind(*x),
        Cell::DateTime(dt) => query.bind(*dt),
    }
}

fn bind_filter<'q>(query: MySqlQuery<'q>, filter: Option<&'q Filter>) -> MySqlQuery<'q> {
    filter
        .map(Filter::params)
        .unwrap_or_default()
        .iter()
        .fold(query, |q, cell| bind_cell(q, cell))
}

fn decode_row(row: &MySqlRow) -> Result<Vec<Cell>, sqlx::Error> {
    row.columns()
        .iter()
        .map(|column| decode_cell(row, column.ordinal(), column.type_info().name()))
        .collect()
}

fn decode_cell(row: &MySqlRow, index: usize, type_name: &str) -> Result<Cell, sqlx::Error> {
    let cell = match type_name {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<Option<i64>, _>(index)?.map(Cell::Integer)
        }
        "FLOAT" | "DOUBLE" => row.try_get::<Option<f64>, _>(index)?.map(Cell::Float),
        "DATETIME" | "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(Cell::DateTime),
        _ => row.try_get::<Option<String>, _>(index)?.map(Cell::Text),
    };
    Ok(cell.unwrap_or(Cell::Empty))
}
