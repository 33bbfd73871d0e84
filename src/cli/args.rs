//! CLI argument definitions using clap
//!
//! Commands:
//! - tablegate check-config --config <path>
//! - tablegate render --config <path> --alias <a> --resource <r> [--finder <expr> --arg <v>...]
//! - tablegate tables-statement --dialect <d>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// tablegate - database tables as REST resources
#[derive(Parser, Debug)]
#[command(name = "tablegate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a configuration file and print its aliases
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },

    /// Print the SQL a read would run, with its bind values
    Render {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        #[arg(long)]
        alias: String,

        #[arg(long)]
        resource: String,

        /// Dynamic finder expression, e.g. findAllByMakerLike
        #[arg(long)]
        finder: Option<String>,

        /// Finder argument, repeatable
        #[arg(long = "arg")]
        args: Vec<String>,

        #[arg(long)]
        limit: Option<String>,

        #[arg(long)]
        offset: Option<String>,
    },

    /// Print a dialect's table enumeration statement
    TablesStatement {
        /// hsql, h2, derby, postgresql, mysql, oracle or sqlserver
        #[arg(long)]
        dialect: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
