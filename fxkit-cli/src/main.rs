//! fxkit CLI tool

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Result;
use clap::Parser;
use fxkit::observability::{self, Verbosity};
use fxkit_cli_lib::commands::{
    load_config, ConfigCommand, NewBotCommand, SampleCommand, TemplatesCommand,
};
use fxkit_cli_lib::{Cli, Commands, NewCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    observability::init(Verbosity::from_occurrences(cli.verbose))?;
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::New { command } => match command {
            NewCommands::Bot {
                app_name,
                language,
                scenarios,
                folder,
                safe_name,
                path,
            } => {
                let cmd = NewBotCommand::new(app_name, language, scenarios, folder, safe_name, path)?;
                cmd.execute(&config).await?;
            }
        },
        Commands::Sample { name, dest } => {
            SampleCommand::new(name, dest).execute(&config).await?;
        }
        Commands::Templates { command } => {
            TemplatesCommand::new(command).execute(&config).await?;
        }
        Commands::Config { command } => {
            ConfigCommand::new(command).execute(&config)?;
        }
    }

    Ok(())
}
