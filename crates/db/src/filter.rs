use guestlist_core::Cell;

use crate::error::MirrorError;
use crate::schema::quote_ident;

/// Row restriction for select, update and delete.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A condition inserted verbatim after `WHERE`. The caller owns its
    /// contents; nothing is escaped.
    Raw(String),
    /// `column = value`, with the value bound as a parameter.
    Eq { column: String, value: Cell },
}

impl Filter {
    pub fn raw(condition: impl Into<String>) -> Self {
        Self::Raw(condition.into())
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Cell>) -> Self {
        Self::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    /// The condition text, without the `WHERE` keyword.
    pub fn to_sql(&self) -> Result<String, MirrorError> {
        match self {
            Self::Raw(condition) => Ok(condition.clone()),
            Self::Eq { column, .. } => Ok(format!("{} = ?", quote_ident(column)?)),
        }
    }

    /// Values to bind after any bound by the statement itself.
    pub fn params(&self) -> &[Cell] {
        match self {
            Self::Raw(_) => &[],
            Self::Eq { value, .. } => std::slice::from_ref(value),
        }
    }
}
