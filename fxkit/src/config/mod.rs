//! Configuration management for fxkit
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `FXKIT_` prefix, `__` for nesting)
//! 2. `./fxkit.toml` (project-local)
//! 3. `~/.config/fxkit/config.toml` (user config)
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # fxkit.toml
//! [templates]
//! tag_list_url = "https://example.com/templates/tags.txt"
//! base_url = "https://example.com/templates/download"
//! fallback_dir = "/usr/share/fxkit/templates/fallback"
//! try_limits = 3
//! timeout_ms = 20000
//! version_req = "^1.0"
//! prerelease = "alpha"
//!
//! [samples]
//! base_url = "https://github.com/OfficeDev/TeamsFx-Samples/archive/refs/tags"
//! repo_name = "TeamsFx-Samples"
//! tag = "v2.2.0"
//! ```
//!
//! Switching to pre-release templates for a single run:
//!
//! ```bash
//! FXKIT_TEMPLATES__PRERELEASE=alpha fxkit new bot my-app --language typescript --scenario default
//! ```

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use semver::VersionReq;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::templates::tags::TagChannel;

/// Project-local configuration file name
pub const LOCAL_CONFIG_FILE: &str = "fxkit.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FXKIT_";

/// Template download settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateSettings {
    /// Endpoint returning newline-separated template tags
    pub tag_list_url: String,

    /// Base URL; archives live at `<base_url>/<tag>/<name>.zip`
    pub base_url: String,

    /// Directory holding the bundled `<name>.zip` fallback archives
    pub fallback_dir: Option<PathBuf>,

    /// Maximum number of attempts per remote request
    pub try_limits: u32,

    /// Per-attempt timeout for the tag list request, in milliseconds
    pub timeout_ms: u64,

    /// Pause between attempts, in milliseconds
    pub retry_delay_ms: u64,

    /// Semver requirement used to pick a stable tag
    pub version_req: String,

    /// Pre-release channel (e.g. `alpha`, `rc`); overrides `version_req`
    pub prerelease: Option<String>,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            tag_list_url:
                "https://github.com/OfficeDev/TeamsFx/releases/download/template-tag-list/template-tags.txt"
                    .to_string(),
            base_url: "https://github.com/OfficeDev/TeamsFx/releases/download".to_string(),
            fallback_dir: None,
            try_limits: 3,
            timeout_ms: 20_000,
            retry_delay_ms: 500,
            version_req: "^1.0".to_string(),
            prerelease: None,
        }
    }
}

impl TemplateSettings {
    /// Per-attempt timeout for the tag list request
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Pause between attempts
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Tag selection channel derived from `prerelease` and `version_req`
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Config`] if `version_req` is not a valid
    /// semver requirement or `prerelease` is blank.
    pub fn channel(&self) -> ScaffoldResult<TagChannel> {
        if let Some(pre) = &self.prerelease {
            let pre = pre.trim();
            if pre.is_empty() {
                return Err(ScaffoldError::config("templates.prerelease must not be empty"));
            }
            return Ok(TagChannel::Prerelease(pre.to_string()));
        }

        VersionReq::parse(&self.version_req)
            .map(TagChannel::Stable)
            .map_err(|e| {
                ScaffoldError::config(format!(
                    "invalid templates.version_req `{}`: {e}",
                    self.version_req
                ))
            })
    }
}

/// Sample download settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SampleSettings {
    /// Base URL of the sample repository archives
    pub base_url: String,

    /// Repository name, used as the top-level folder inside the archive
    pub repo_name: String,

    /// Sample repository tag
    pub tag: String,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            base_url: "https://github.com/OfficeDev/TeamsFx-Samples/archive/refs/tags".to_string(),
            repo_name: "TeamsFx-Samples".to_string(),
            tag: "v2.2.0".to_string(),
        }
    }
}

/// Complete fxkit configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FxkitConfig {
    /// Template download settings
    #[serde(default)]
    pub templates: TemplateSettings,

    /// Sample download settings
    #[serde(default)]
    pub samples: SampleSettings,
}

impl FxkitConfig {
    /// Load configuration from the default locations
    ///
    /// Precedence (highest first): `FXKIT_*` environment variables,
    /// `./fxkit.toml`, the user config file, defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Config`] if a source cannot be parsed.
    pub fn load() -> ScaffoldResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(user) = Self::recommended_path() {
            figment = figment.merge(Toml::file(user));
        }
        figment = figment.merge(Toml::file(LOCAL_CONFIG_FILE));
        Self::extract(figment)
    }

    /// Load configuration from a specific file, still honouring env overrides
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Config`] if the file does not exist or
    /// cannot be parsed.
    pub fn load_from(path: &Path) -> ScaffoldResult<Self> {
        if !path.is_file() {
            return Err(ScaffoldError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let figment = Figment::from(Serialized::defaults(Self::default())).merge(Toml::file(path));
        Self::extract(figment)
    }

    /// User config path: `<config dir>/fxkit/config.toml`
    #[must_use]
    pub fn recommended_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fxkit").join("config.toml"))
    }

    fn extract(figment: Figment) -> ScaffoldResult<Self> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ScaffoldError::config(e.to_string()))
    }
}
