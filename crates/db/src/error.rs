use guestlist_core::CoreError;

/// Failures of the relational mirror.
///
/// A session that cannot be established (or is lost mid-statement) is a
/// [`Connection`](MirrorError::Connection) failure; a statement the server
/// rejects is a [`Command`](MirrorError::Command) failure and carries the
/// SQL text.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("Database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Statement failed ({statement}): {source}")]
    Command {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Table {0} has no columns")]
    NoColumns(String),

    #[error("Invalid database configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl MirrorError {
    /// Classify a driver error raised while running `statement`.
    pub fn from_statement(statement: &str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Connection(err),
            source => Self::Command {
                statement: statement.to_string(),
                source,
            },
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
