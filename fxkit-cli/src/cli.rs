//! Command-line definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::Language;

/// Scaffold bot projects and samples from published templates
#[derive(Debug, Parser)]
#[command(name = "fxkit")]
#[command(version)]
#[command(about = "Scaffold bot projects and samples from published templates", long_about = None)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from this file instead of the default locations
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create project code from templates
    New {
        #[command(subcommand)]
        command: NewCommands,
    },
    /// Download a sample into a fresh directory
    Sample {
        /// Sample name, as it appears in the samples repository
        name: String,
        /// Parent directory for the sample
        #[arg(long, default_value = ".")]
        dest: PathBuf,
    },
    /// Inspect published templates
    Templates {
        #[command(subcommand)]
        command: TemplatesCommands,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// `fxkit new` subcommands
#[derive(Debug, Subcommand)]
pub enum NewCommands {
    /// Scaffold bot code into a project
    Bot {
        /// Application name
        app_name: String,
        /// Programming language
        #[arg(short, long, value_enum, default_value_t = Language::default())]
        language: Language,
        /// Scenario to scaffold; repeat for several
        #[arg(short, long = "scenario", default_value = "default")]
        scenarios: Vec<String>,
        /// Bot folder inside the project (defaults to `bot`, or the root for C#)
        #[arg(long)]
        folder: Option<String>,
        /// Identifier-safe project name (defaults to the app name without
        /// non-alphanumerics)
        #[arg(long)]
        safe_name: Option<String>,
        /// Project root
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
}

/// `fxkit templates` subcommands
#[derive(Debug, Subcommand)]
pub enum TemplatesCommands {
    /// List published tags and show which one is selected
    Tags,
    /// Print the download URL for a template
    Resolve {
        /// Template group, e.g. `bot`
        group: String,
        /// Language key, e.g. `ts`
        language: String,
        /// Scenario name
        scenario: String,
    },
}

/// `fxkit config` subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the user configuration file location
    Path,
}
