pub mod guests;
pub mod health;
