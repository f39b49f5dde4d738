//! MySQL persistence for the guest list.
//!
//! The [`Mirror`] keeps a relational copy of the in-memory guest table on a
//! single connection. The lookup API reads through [`GuestRepo`] over a
//! pool created by [`create_pool`].

pub mod config;
pub mod error;
pub mod filter;
pub mod mirror;
pub mod models;
pub mod repositories;
pub mod schema;

use sqlx::mysql::MySqlPoolOptions;

pub use config::DbConfig;
pub use error::MirrorError;
pub use filter::Filter;
pub use mirror::Mirror;
pub use models::guest::Guest;
pub use repositories::guest_repo::GuestRepo;

pub type DbPool = sqlx::MySqlPool;

/// Create a connection pool for read-side consumers such as the lookup API.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, MirrorError> {
    let options = config.connect_options()?;
    MySqlPoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(MirrorError::Connection)
}
