//! CLI command implementations

pub mod config;
pub mod new;
pub mod sample;
pub mod templates;

pub use config::ConfigCommand;
pub use new::NewBotCommand;
pub use sample::SampleCommand;
pub use templates::TemplatesCommand;

use anyhow::{Context, Result};
use console::style;
use fxkit::config::FxkitConfig;
use fxkit::error::{Failure, FailureKind, ScaffoldError};
use fxkit::net::{HttpClient, ReqwestClient};
use fxkit::scaffold::Scaffolder;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Connection timeout for template and sample downloads
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Load configuration from `path`, or from the default locations
pub fn load_config(path: Option<&Path>) -> Result<FxkitConfig> {
    let config = match path {
        Some(path) => FxkitConfig::load_from(path),
        None => FxkitConfig::load(),
    };
    config.context("Failed to load configuration")
}

/// Scaffolder talking to the real template host
pub fn scaffolder(config: &FxkitConfig) -> Result<Scaffolder> {
    let client: Arc<dyn HttpClient> =
        Arc::new(ReqwestClient::new(CONNECT_TIMEOUT).context("Failed to create HTTP client")?);
    Ok(Scaffolder::new(client, config)?)
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Failed to set progress style")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    Ok(spinner)
}

/// Print a scaffold failure and turn it into the command's error
fn report(source: &str, err: &ScaffoldError) -> anyhow::Error {
    let failure = Failure::from_error(source, err);
    eprintln!("{} {}", style("✗").red().bold(), style(&failure).red());
    if failure.kind == FailureKind::System {
        eprintln!(
            "  {}",
            style("Check your network connection, or rerun with -vv for details.").dim()
        );
    }
    anyhow::Error::new(failure)
}
