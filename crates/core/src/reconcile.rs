//! Guest identifier reconciliation.
//!
//! Fills blank `ID` cells with fresh random identifiers and normalizes
//! cell values. The in-memory half of the process lives here; persisting
//! the result and reloading it is done by the spreadsheet source, which
//! then calls [`normalize_absent`].

use std::collections::HashSet;

use rand::Rng;

use crate::error::CoreError;
use crate::guest::{columns, ABSENT_SENTINEL, RELOAD_ABSENT_MARKERS};
use crate::table::{Cell, Table};

/// Length of a generated guest identifier.
pub const ID_LENGTH: usize = 6;

/// Identifier alphabet: uppercase ASCII letters and digits.
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// What a [`reconcile`] pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Rows dropped for having no last name.
    pub dropped_rows: usize,
    /// Identifiers generated for rows that had none.
    pub generated_ids: usize,
    /// Pre-existing identifiers that appear on more than one row.
    ///
    /// These are left untouched; assigned identifiers are never rewritten.
    pub duplicate_ids: Vec<String>,
}

/// Draw one identifier of [`ID_LENGTH`] characters uniformly from
/// `A-Z0-9`.
pub fn generate_id<R: Rng>(rng: &mut R) -> String {
    (0..ID_LENGTH)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}

/// Keep drawing candidates from `next` until one is not in `taken`.
pub fn unique_id(taken: &HashSet<String>, mut next: impl FnMut() -> String) -> String {
    loop {
        let candidate = next();
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
}

/// Reconcile a guest table in memory.
///
/// 1. Drops rows whose `APELLIDOS` cell is absent.
/// 2. Replaces remaining absent cells with empty text.
/// 3. Assigns a unique identifier to every row whose `ID` is empty,
///    checked against every identifier in the table, including those
///    generated earlier in the same pass.
/// 4. Upper-cases every text cell.
pub fn reconcile<R: Rng>(table: &mut Table, rng: &mut R) -> Result<ReconcileReport, CoreError> {
    let id_col = table.require_column(columns::ID)?;
    let last_name_col = table.require_column(columns::LAST_NAME)?;

    let before = table.len();
    table.retain_rows(|row| !row.values()[last_name_col].is_empty());
    let dropped_rows = before - table.len();

    for cell in table.cells_mut() {
        if cell.is_empty() {
            *cell = Cell::text("");
        }
    }

    // Existing ids are compared in their upper-cased form, which is what
    // they become in step 4.
    let mut taken = HashSet::new();
    let mut duplicate_ids = Vec::new();
    for cell in table.column_values(id_col) {
        let id = cell.to_string().to_uppercase();
        if id.is_empty() {
            continue;
        }
        if !taken.insert(id.clone()) && !duplicate_ids.contains(&id) {
            duplicate_ids.push(id);
        }
    }

    let mut generated_ids = 0;
    for row in 0..table.len() {
        let Some(cell) = table.cell_mut(row, id_col) else {
            continue;
        };
        if matches!(cell, Cell::Text(s) if s.is_empty()) {
            let id = unique_id(&taken, || generate_id(rng));
            taken.insert(id.clone());
            *cell = Cell::Text(id);
            generated_ids += 1;
        }
    }

    uppercase_text(table);

    Ok(ReconcileReport {
        dropped_rows,
        generated_ids,
        duplicate_ids,
    })
}

/// Upper-case every text cell in place.
pub fn uppercase_text(table: &mut Table) {
    for cell in table.cells_mut() {
        if let Cell::Text(s) = cell {
            *s = s.to_uppercase();
        }
    }
}

/// Fold every missing-value representation into [`ABSENT_SENTINEL`].
///
/// Absent cells and the texts `""`, `"none"` and `"None"` all become the
/// literal `"NULL"`.
pub fn normalize_absent(table: &mut Table) {
    for cell in table.cells_mut() {
        let absent = match cell {
            Cell::Empty => true,
            Cell::Text(s) => RELOAD_ABSENT_MARKERS.contains(&s.as_str()),
            _ => false,
        };
        if absent {
            *cell = Cell::text(ABSENT_SENTINEL);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::guest::GUEST_COLUMNS;

    fn guest_row(id: &str, sex: &str, last: Option<&str>, first: &str) -> Vec<Cell> {
        let text_or_empty = |s: &str| {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::text(s)
            }
        };
        vec![
            text_or_empty(id),
            Cell::text(sex),
            last.map(Cell::text).unwrap_or(Cell::Empty),
            Cell::text(first),
            Cell::text("2"),
            Cell::text("5"),
            Cell::Empty,
            Cell::Empty,
        ]
    }

    fn is_valid_id(id: &str) -> bool {
        id.len() == ID_LENGTH
            && id
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }

    #[test]
    fn generated_ids_use_the_alphabet() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            assert!(is_valid_id(&generate_id(&mut rng)));
        }
    }

    #[test]
    fn unique_id_retries_on_collision() {
        let taken: HashSet<String> = ["AAAAAA".to_string(), "BBBBBB".to_string()].into();
        let mut script = ["AAAAAA", "BBBBBB", "AAAAAA", "CCCCCC"].into_iter();
        let mut calls = 0;
        let id = unique_id(&taken, || {
            calls += 1;
            script.next().unwrap().to_string()
        });
        assert_eq!(id, "CCCCCC");
        assert_eq!(calls, 4);
    }

    #[test]
    fn fills_blank_id_and_uppercases() {
        let mut table = Table::from_rows(
            GUEST_COLUMNS,
            [guest_row("", "F", Some("gomez"), "ana")],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let report = reconcile(&mut table, &mut rng).unwrap();

        let row = table.row(0).unwrap();
        assert!(is_valid_id(row.text(columns::ID).unwrap()));
        assert_eq!(row.text(columns::LAST_NAME), Some("GOMEZ"));
        assert_eq!(row.text(columns::FIRST_NAME), Some("ANA"));
        assert_eq!(report.generated_ids, 1);
        assert_eq!(report.dropped_rows, 0);
    }

    #[test]
    fn drops_rows_without_last_name() {
        let mut table = Table::from_rows(
            GUEST_COLUMNS,
            [
                guest_row("AB12CD", "M", Some("perez"), "juan"),
                guest_row("", "F", None, "sin apellido"),
            ],
        )
        .unwrap();

        let report = reconcile(&mut table, &mut StdRng::seed_from_u64(0)).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.generated_ids, 0);
    }

    #[test]
    fn existing_ids_pass_through() {
        let mut table = Table::from_rows(
            GUEST_COLUMNS,
            [guest_row("ZZ99ZZ", "M", Some("perez"), "juan")],
        )
        .unwrap();

        reconcile(&mut table, &mut StdRng::seed_from_u64(0)).unwrap();

        assert_eq!(table.row(0).unwrap().text(columns::ID), Some("ZZ99ZZ"));
    }

    #[test]
    fn second_pass_keeps_identifiers() {
        let rows = (0..50).map(|i| guest_row("", "F", Some(&format!("apellido{i}")), "x"));
        let mut table = Table::from_rows(GUEST_COLUMNS, rows).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        reconcile(&mut table, &mut rng).unwrap();
        let first: Vec<String> = table.column_values(0).map(|c| c.to_string()).collect();

        let report = reconcile(&mut table, &mut rng).unwrap();
        let second: Vec<String> = table.column_values(0).map(|c| c.to_string()).collect();

        assert_eq!(first, second);
        assert_eq!(report.generated_ids, 0);
    }

    #[test]
    fn identifiers_are_pairwise_distinct() {
        let rows = (0..500).map(|i| guest_row("", "M", Some(&format!("g{i}")), "x"));
        let mut table = Table::from_rows(GUEST_COLUMNS, rows).unwrap();

        reconcile(&mut table, &mut StdRng::seed_from_u64(3)).unwrap();

        let ids: HashSet<String> = table.column_values(0).map(|c| c.to_string()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn duplicate_existing_ids_are_reported() {
        let mut table = Table::from_rows(
            GUEST_COLUMNS,
            [
                guest_row("abc123", "M", Some("a"), "x"),
                guest_row("ABC123", "F", Some("b"), "y"),
            ],
        )
        .unwrap();

        let report = reconcile(&mut table, &mut StdRng::seed_from_u64(0)).unwrap();

        assert_eq!(report.duplicate_ids, vec!["ABC123".to_string()]);
    }

    #[test]
    fn missing_id_column_is_rejected() {
        let mut table = Table::new([columns::LAST_NAME]);
        assert_matches!(
            reconcile(&mut table, &mut StdRng::seed_from_u64(0)),
            Err(CoreError::MissingColumn(c)) if c == columns::ID
        );
    }

    #[test]
    fn every_text_cell_is_uppercase() {
        let mut table = Table::from_rows(
            GUEST_COLUMNS,
            [guest_row("", "f", Some("muñoz"), "maría josé")],
        )
        .unwrap();

        reconcile(&mut table, &mut StdRng::seed_from_u64(5)).unwrap();

        for cell in table.raw_rows().iter().flatten() {
            let text = cell.to_string();
            assert_eq!(text, text.to_uppercase());
        }
        assert_eq!(table.row(0).unwrap().text(columns::LAST_NAME), Some("MUÑOZ"));
    }

    #[test]
    fn normalize_folds_absent_markers() {
        let mut table = Table::from_rows(
            ["A", "B", "C", "D", "E"],
            [vec![
                Cell::Empty,
                Cell::text(""),
                Cell::text("none"),
                Cell::text("None"),
                Cell::text("NONE"),
            ]],
        )
        .unwrap();

        normalize_absent(&mut table);

        let values: Vec<String> = table.raw_rows()[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(values, ["NULL", "NULL", "NULL", "NULL", "NONE"]);
    }
}
