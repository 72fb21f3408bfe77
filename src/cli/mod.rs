//! CLI module for loops - command-line interface and subcommands.
//!
//! Provides the argument definitions and the terminal rendering used by the
//! command handlers in `main.rs`.

pub mod commands;
pub mod render;

pub use commands::Cli;
