//! Guest lookup API.
//!
//! Serves single guest records from the MySQL mirror to the invitation
//! website: the page sends the code a guest typed in and renders the
//! returned names.

pub mod config;
pub mod error;
pub mod lookup;
pub mod router;
pub mod routes;
pub mod state;
