//! Subcommand implementations

pub mod close;
pub mod create;
pub mod open;
