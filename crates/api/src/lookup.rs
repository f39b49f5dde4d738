//! Where guest records come from.

use async_trait::async_trait;
use guestlist_db::{DbPool, Guest, GuestRepo, MirrorError};

/// Finds one guest by invitation code.
#[async_trait]
pub trait GuestLookup: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<Guest>, MirrorError>;
}

/// Reads from the mirrored guest table over a connection pool.
pub struct PoolLookup {
    pool: DbPool,
    table: String,
}

impl PoolLookup {
    pub fn new(pool: DbPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }
}

#[async_trait]
impl GuestLookup for PoolLookup {
    async fn find(&self, id: &str) -> Result<Option<Guest>, MirrorError> {
        GuestRepo::find_by_id(&self.pool, &self.table, id).await
    }
}
