//! Bot project code generation
//!
//! Scaffolds one template per requested scenario into the bot folder of a
//! project, substituting the project name into file names and `.tpl` files.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::scaffold::{ScaffoldOutcome, Scaffolder, TemplateErrorPolicy, TemplateRequest};
use crate::templates::render::TEMPLATE_FILE_EXT;
use crate::templates::{file_data_replace_fn, NameReplaceFn, TemplateVars};

/// Source tag used when reporting bot scaffold failures
pub const ERROR_SOURCE: &str = "bot";

/// Template group for bot projects
pub const BOT_GROUP: &str = "bot";

/// Default working folder for non-.NET bots
pub const BOT_FOLDER: &str = "bot";

/// Placeholder in template file names replaced by the app name
const PROJECT_NAME_PLACEHOLDER: &str = "ProjectName";

/// Programming language of a bot project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotLanguage {
    /// JavaScript
    #[default]
    JavaScript,
    /// TypeScript
    TypeScript,
    /// C#
    CSharp,
}

impl BotLanguage {
    /// Key used in template names
    #[must_use]
    pub const fn template_key(self) -> &'static str {
        match self {
            Self::JavaScript => "js",
            Self::TypeScript => "ts",
            Self::CSharp => "csharp",
        }
    }

    /// Folder the bot lives in when none is given
    #[must_use]
    pub const fn default_folder(self) -> &'static str {
        match self {
            Self::CSharp => "",
            Self::JavaScript | Self::TypeScript => BOT_FOLDER,
        }
    }
}

impl fmt::Display for BotLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::CSharp => "csharp",
        })
    }
}

impl FromStr for BotLanguage {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "csharp" | "c#" | "cs" => Ok(Self::CSharp),
            other => Err(ScaffoldError::Generic(format!(
                "unsupported programming language `{other}`"
            ))),
        }
    }
}

/// Inputs for [`BotCodeGenerator::generate`]
#[derive(Debug, Clone)]
pub struct BotCodeInputs {
    /// Project root
    pub project_path: PathBuf,
    /// Application name
    pub app_name: String,
    /// Programming language
    pub language: BotLanguage,
    /// Bot folder relative to the project root
    pub folder: Option<String>,
    /// Identifier-safe project name
    pub safe_project_name: Option<String>,
    /// Scenarios to scaffold, in order
    pub scenarios: Vec<String>,
}

impl BotCodeInputs {
    /// Directory the templates are written into
    #[must_use]
    pub fn working_dir(&self) -> PathBuf {
        let folder = self
            .folder
            .as_deref()
            .unwrap_or_else(|| self.language.default_folder());
        self.project_path.join(folder)
    }

    /// Explicit safe name, else the app name with non-alphanumerics removed
    #[must_use]
    pub fn safe_project_name(&self) -> String {
        self.safe_project_name
            .clone()
            .unwrap_or_else(|| alphanumeric_only(&self.app_name))
    }
}

/// Drop every character that is not an ASCII letter or digit
#[must_use]
pub fn alphanumeric_only(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).collect()
}

fn bot_name_replace_fn(app_name: &str) -> NameReplaceFn {
    let app_name = app_name.to_string();
    Arc::new(move |name: &str, _data: &[u8]| {
        Ok(name
            .replacen(PROJECT_NAME_PLACEHOLDER, &app_name, 1)
            .replacen(TEMPLATE_FILE_EXT, "", 1))
    })
}

/// Scaffolds bot project code
pub struct BotCodeGenerator {
    scaffolder: Arc<Scaffolder>,
}

impl BotCodeGenerator {
    /// Create a generator on top of a scaffolder
    #[must_use]
    pub const fn new(scaffolder: Arc<Scaffolder>) -> Self {
        Self { scaffolder }
    }

    /// Scaffold every scenario in order into the bot working directory
    ///
    /// Scenarios run one after another, never concurrently, and the first
    /// failure stops the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Generic`] for an empty scenario list, and
    /// otherwise the errors of [`TemplateErrorPolicy`].
    pub async fn generate(&self, inputs: &BotCodeInputs) -> ScaffoldResult<Vec<ScaffoldOutcome>> {
        if inputs.scenarios.is_empty() {
            return Err(ScaffoldError::Generic(
                "at least one bot scenario is required".to_string(),
            ));
        }

        let dst = inputs.working_dir();
        let vars = TemplateVars::from([
            ("ProjectName".to_string(), inputs.app_name.clone()),
            ("SafeProjectName".to_string(), inputs.safe_project_name()),
        ]);
        let data_replace = file_data_replace_fn(&vars);
        let name_replace = bot_name_replace_fn(&inputs.app_name);

        let mut outcomes = Vec::with_capacity(inputs.scenarios.len());
        for scenario in &inputs.scenarios {
            tracing::info!(%scenario, language = %inputs.language, "scaffolding bot");
            let request = TemplateRequest::new(
                BOT_GROUP,
                inputs.language.template_key(),
                scenario.as_str(),
                dst.clone(),
            )
            .with_name_replace(Arc::clone(&name_replace))
            .with_data_replace(Arc::clone(&data_replace));

            outcomes.push(
                self.scaffolder
                    .scaffold_from_templates(request, &TemplateErrorPolicy)
                    .await?,
            );
        }
        Ok(outcomes)
    }
}
