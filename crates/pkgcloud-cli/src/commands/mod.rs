//! CLI commands

pub mod out;
