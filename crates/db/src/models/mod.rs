//! Row models read back from the mirror.

pub mod guest;
