//! Single-record reads from the mirrored guest table.

use guestlist_core::guest::GUEST_COLUMNS;
use sqlx::{Executor, MySql};

use crate::error::MirrorError;
use crate::models::guest::Guest;
use crate::schema::quote_ident;

/// Reads guests by their invitation code.
pub struct GuestRepo;

impl GuestRepo {
    /// Find the guest whose `ID` equals `id` in `table`.
    pub async fn find_by_id<'e, E>(
        executor: E,
        table: &str,
        id: &str,
    ) -> Result<Option<Guest>, MirrorError>
    where
        E: Executor<'e, Database = MySql>,
    {
        let query = find_by_id_sql(table)?;
        sqlx::query_as::<_, Guest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| MirrorError::from_statement(&query, e))
    }
}

fn find_by_id_sql(table: &str) -> Result<String, MirrorError> {
    let columns = GUEST_COLUMNS
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");
    Ok(format!(
        "SELECT {columns} FROM {} WHERE `ID` = ? LIMIT 1",
        quote_ident(table)?
    ))
}
