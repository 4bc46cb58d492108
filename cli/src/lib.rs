//! vmship CLI library.

pub mod commands;
