//! Bot scaffolding command

use anyhow::Result;
use console::style;
use fxkit::config::FxkitConfig;
use fxkit::generator::{BotCodeGenerator, BotCodeInputs, ERROR_SOURCE};
use fxkit::templates::ZipOrigin;
use std::path::PathBuf;
use std::sync::Arc;

use super::{report, scaffolder, spinner};
use crate::{is_valid_app_name, Language, MAX_APP_NAME_LEN};

/// Scaffold bot code into a project
pub struct NewBotCommand {
    inputs: BotCodeInputs,
}

impl NewBotCommand {
    /// Create a new command instance
    ///
    /// # Errors
    ///
    /// Fails if the app name is invalid or no scenario is given.
    pub fn new(
        app_name: String,
        language: Language,
        scenarios: Vec<String>,
        folder: Option<String>,
        safe_name: Option<String>,
        path: PathBuf,
    ) -> Result<Self> {
        if !is_valid_app_name(&app_name) {
            anyhow::bail!(
                "Invalid app name: {app_name}. Must start with a letter, be at most {MAX_APP_NAME_LEN} characters and contain only letters, digits, spaces, hyphens and underscores"
            );
        }
        if scenarios.is_empty() {
            anyhow::bail!("At least one --scenario is required");
        }

        Ok(Self {
            inputs: BotCodeInputs {
                project_path: path,
                app_name,
                language: language.into(),
                folder,
                safe_project_name: safe_name,
                scenarios,
            },
        })
    }

    /// Inputs passed to the generator
    #[must_use]
    pub const fn inputs(&self) -> &BotCodeInputs {
        &self.inputs
    }

    /// Execute the command
    pub async fn execute(&self, config: &FxkitConfig) -> Result<()> {
        println!(
            "{} {} {}",
            style("Scaffolding").green().bold(),
            style(format!("{} bot:", self.inputs.language)).bold(),
            style(&self.inputs.app_name).cyan().bold()
        );
        println!();

        let generator = BotCodeGenerator::new(Arc::new(scaffolder(config)?));
        let progress = spinner("Fetching templates...")?;
        let result = generator.generate(&self.inputs).await;
        progress.finish_and_clear();

        let outcomes = result.map_err(|e| report(ERROR_SOURCE, &e))?;
        for (scenario, outcome) in self.inputs.scenarios.iter().zip(&outcomes) {
            let origin = match outcome.origin {
                Some(ZipOrigin::Local) => " (bundled templates)",
                _ => "",
            };
            println!(
                "  {} {} {}{}",
                style("✓").green(),
                style(scenario).cyan(),
                style(format!("{} file(s)", outcome.files.len())).dim(),
                style(origin).yellow()
            );
        }

        println!();
        println!(
            "{} {}",
            style("✓ Bot code created in").green().bold(),
            style(self.inputs.working_dir().display()).cyan()
        );
        Ok(())
    }
}
