//! fxkit CLI library

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, ConfigCommands, NewCommands, TemplatesCommands};

/// Programming language accepted by `fxkit new bot`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Language {
    /// JavaScript (default)
    #[default]
    Javascript,
    /// TypeScript
    Typescript,
    /// C#, scaffolded into the project root
    Csharp,
}

impl From<Language> for fxkit::generator::BotLanguage {
    fn from(language: Language) -> Self {
        match language {
            Language::Javascript => Self::JavaScript,
            Language::Typescript => Self::TypeScript,
            Language::Csharp => Self::CSharp,
        }
    }
}

/// Maximum length of an app name
pub const MAX_APP_NAME_LEN: usize = 30;

/// Validate an app name
///
/// Names start with a letter and contain only letters, digits, spaces,
/// hyphens and underscores.
#[must_use]
pub fn is_valid_app_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.chars().count() <= MAX_APP_NAME_LEN
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
}
