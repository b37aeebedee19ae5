//! Sample download command

use anyhow::Result;
use console::style;
use fxkit::config::FxkitConfig;
use fxkit::scaffold::{valid_sample_destination, SampleErrorPolicy, SampleRequest};
use std::path::PathBuf;

use super::{report, scaffolder, spinner};

const ERROR_SOURCE: &str = "sample";

/// Download a sample into a fresh directory under `dest`
pub struct SampleCommand {
    name: String,
    dest: PathBuf,
}

impl SampleCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(name: String, dest: PathBuf) -> Self {
        Self { name, dest }
    }

    /// Execute the command
    pub async fn execute(&self, config: &FxkitConfig) -> Result<()> {
        let dst = valid_sample_destination(&self.name, &self.dest)
            .await
            .map_err(|e| report(ERROR_SOURCE, &e))?;

        println!(
            "{} {} {}",
            style("Downloading").green().bold(),
            style("sample:").bold(),
            style(&self.name).cyan().bold()
        );

        let scaffolder = scaffolder(config)?;
        let progress = spinner("Downloading sample...")?;
        let result = scaffolder
            .scaffold_from_sample(
                SampleRequest {
                    name: self.name.clone(),
                    dst,
                },
                &SampleErrorPolicy,
            )
            .await;
        progress.finish_and_clear();

        let outcome = result.map_err(|e| report(ERROR_SOURCE, &e))?;
        println!(
            "{} {} {}",
            style("✓ Sample downloaded to").green().bold(),
            style(outcome.dst.display()).cyan(),
            style(format!("({} files)", outcome.files.len())).dim()
        );
        Ok(())
    }
}
