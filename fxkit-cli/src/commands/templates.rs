//! Template inspection commands

use anyhow::Result;
use console::style;
use fxkit::config::FxkitConfig;
use fxkit::templates::{select_tag, template_name};

use super::{report, scaffolder};
use crate::TemplatesCommands;

const ERROR_SOURCE: &str = "templates";

/// `fxkit templates ...`
pub struct TemplatesCommand {
    command: TemplatesCommands,
}

impl TemplatesCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(command: TemplatesCommands) -> Self {
        Self { command }
    }

    /// Execute the command
    pub async fn execute(&self, config: &FxkitConfig) -> Result<()> {
        let scaffolder = scaffolder(config)?;
        let fetcher = scaffolder.fetcher();

        match &self.command {
            TemplatesCommands::Tags => {
                let tags = fetcher
                    .fetch_tag_list()
                    .await
                    .map_err(|e| report(ERROR_SOURCE, &e))?;
                let selected = select_tag(tags.as_slice(), fetcher.channel());
                for tag in &tags {
                    if selected.as_deref() == Some(tag.as_str()) {
                        println!("{} {}", style("*").green().bold(), style(tag).green().bold());
                    } else {
                        println!("  {tag}");
                    }
                }
                if selected.is_none() {
                    println!("{}", style("No tag matches the configured channel").yellow());
                }
            }
            TemplatesCommands::Resolve {
                group,
                language,
                scenario,
            } => {
                let name = template_name(group, language, scenario);
                let url = fetcher
                    .resolve_url(&name)
                    .await
                    .map_err(|e| report(ERROR_SOURCE, &e))?;
                println!("{url}");
            }
        }
        Ok(())
    }
}
