//! Subcommands of the respool CLI

pub mod check;
pub mod run;
