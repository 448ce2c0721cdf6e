//! Command-line entry points.

use clap::{Parser, Subcommand};

/// cinetrack - movie catalog and viewing history API
#[derive(Parser)]
#[command(name = "cinetrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run migrations and serve the HTTP API (default)
    #[command(alias = "s")]
    Serve,

    /// Insert the default categories
    Seed,

    /// Write a default config.toml to the working directory
    Init,

    /// Load and validate the configuration
    CheckConfig,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
