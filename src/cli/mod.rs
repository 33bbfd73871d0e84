//! CLI module for tablegate
//!
//! Provides command-line interface for:
//! - check-config: validate a configuration file
//! - render: print the SQL of a read
//! - tables-statement: print a dialect's table enumeration statement

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_config, render, render_read, run, run_command, tables_statement, RenderRequest};
pub use errors::{CliError, CliErrorCode, CliResult};
