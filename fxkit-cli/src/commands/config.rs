//! Configuration inspection commands

use anyhow::{Context, Result};
use console::style;
use fxkit::config::FxkitConfig;

use crate::ConfigCommands;

/// `fxkit config ...`
pub struct ConfigCommand {
    command: ConfigCommands,
}

impl ConfigCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(command: ConfigCommands) -> Self {
        Self { command }
    }

    /// Effective configuration rendered as TOML
    pub fn render(config: &FxkitConfig) -> Result<String> {
        toml::to_string_pretty(config).context("Failed to serialize configuration")
    }

    /// Execute the command
    pub fn execute(&self, config: &FxkitConfig) -> Result<()> {
        match self.command {
            ConfigCommands::Show => print!("{}", Self::render(config)?),
            ConfigCommands::Path => match FxkitConfig::recommended_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("{}", style("No user configuration directory on this platform").yellow()),
            },
        }
        Ok(())
    }
}
