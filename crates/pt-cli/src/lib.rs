//! Player online-time CLI library.
//!
//! This crate provides the CLI interface for the online-time report.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, OutputFormat};
pub use config::Config;
