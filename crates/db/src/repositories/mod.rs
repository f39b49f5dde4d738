//! Repository layer.
//!
//! Each repository is a zero-sized struct with async query methods that
//! take any MySQL executor (a pool, a connection or a transaction).

pub mod guest_repo;
