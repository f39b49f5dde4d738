//! Row-action dispatch: run a function over every row of a [`Table`]
//! and store the results as a new column named after the function.
//!
//! The dispatcher has no skip or retry policy. Every row is visited and
//! produces exactly one result cell; actions that can fail are expected
//! to encode the failure in the cell they return.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::table::{Cell, Row, Table};

/// An asynchronous per-row action.
#[async_trait]
pub trait RowAction: Send {
    /// Name of the result column.
    fn name(&self) -> &str;

    /// Compute the result for one row.
    async fn apply(&mut self, row: Row<'_>) -> Cell;
}

/// Apply `f` to every row and store the results in column `name`.
///
/// Returns the number of rows visited. An existing column called `name`
/// is overwritten in place.
pub fn apply_to_rows<F>(table: &mut Table, name: &str, mut f: F) -> Result<usize, CoreError>
where
    F: FnMut(Row<'_>) -> Cell,
{
    let results: Vec<Cell> = table.rows().map(&mut f).collect();
    let visited = results.len();
    table.set_column(name, results)?;
    Ok(visited)
}

/// Run a [`RowAction`] over every row, one row at a time, and store the
/// results in the column named by [`RowAction::name`].
pub async fn dispatch<A>(table: &mut Table, action: &mut A) -> Result<usize, CoreError>
where
    A: RowAction + ?Sized,
{
    let mut results = Vec::with_capacity(table.len());
    for row in table.rows() {
        results.push(action.apply(row).await);
    }
    let visited = results.len();
    let name = action.name().to_string();
    table.set_column(&name, results)?;
    Ok(visited)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        Table::from_rows(
            ["NAME", "SIZE"],
            [
                vec![Cell::text("ana"), Cell::text("1")],
                vec![Cell::text("luis"), Cell::text("3")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn appends_one_named_column() {
        let mut table = people();
        let before = table.clone();

        let visited = apply_to_rows(&mut table, "name_length", |row| {
            Cell::Integer(row.text("NAME").map_or(0, str::len) as i64)
        })
        .unwrap();

        assert_eq!(visited, 2);
        assert_eq!(table.len(), before.len());
        assert_eq!(table.columns().last().map(String::as_str), Some("name_length"));
        assert_eq!(table.cell(0, 2), Some(&Cell::Integer(3)));
        assert_eq!(table.cell(1, 2), Some(&Cell::Integer(4)));
    }

    #[test]
    fn receives_values_in_column_order() {
        let mut table = people();

        apply_to_rows(&mut table, "joined", |row| {
            let parts: Vec<String> = row.values().iter().map(|c| c.to_string()).collect();
            Cell::text(parts.join("|"))
        })
        .unwrap();

        assert_eq!(table.cell(1, 2), Some(&Cell::text("luis|3")));
    }

    struct Counter {
        calls: usize,
    }

    #[async_trait]
    impl RowAction for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        async fn apply(&mut self, _row: Row<'_>) -> Cell {
            self.calls += 1;
            Cell::Integer(self.calls as i64)
        }
    }

    #[tokio::test]
    async fn dispatch_visits_every_row_in_order() {
        let mut table = people();
        let mut action = Counter { calls: 0 };

        let visited = dispatch(&mut table, &mut action).await.unwrap();

        assert_eq!(visited, 2);
        assert_eq!(table.columns()[2], "counter");
        assert_eq!(table.cell(0, 2), Some(&Cell::Integer(1)));
        assert_eq!(table.cell(1, 2), Some(&Cell::Integer(2)));
    }
}
