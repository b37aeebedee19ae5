//! Scaffold actions and the context they share
//!
//! Each action reads what earlier actions wrote into [`ScaffoldContext`] and
//! writes its own result for later ones. An action whose output is already
//! present does nothing, which is how the local fallback is skipped after a
//! successful download.

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::SampleSettings;
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::templates::{
    template_name, unzip, DataReplaceFn, NameReplaceFn, TemplateArchive, TemplateFetcher,
    UnzipOptions, ZipOrigin, ZipRetriever,
};

/// Identity of a scaffold action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaffoldActionName {
    /// Resolve the template archive URL from the tag list
    FetchTemplateUrlWithTag,
    /// Download the template archive
    FetchTemplateZipFromUrl,
    /// Read the bundled template archive
    FetchTemplateZipFromLocal,
    /// Resolve the sample archive URL
    FetchSampleUrlWithTag,
    /// Download the sample archive
    FetchSampleZipFromUrl,
    /// Extract the archive into the destination
    Unzip,
}

impl ScaffoldActionName {
    /// Kebab-case identifier used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchTemplateUrlWithTag => "fetch-template-url-with-tag",
            Self::FetchTemplateZipFromUrl => "fetch-template-zip-from-url",
            Self::FetchTemplateZipFromLocal => "fetch-template-zip-from-local",
            Self::FetchSampleUrlWithTag => "fetch-sample-url-with-tag",
            Self::FetchSampleZipFromUrl => "fetch-sample-zip-from-url",
            Self::Unzip => "unzip",
        }
    }
}

impl fmt::Display for ScaffoldActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State threaded through one run of an action list
///
/// Created per scaffold invocation and dropped when the run ends.
#[derive(Default)]
pub struct ScaffoldContext {
    /// Component group, e.g. `bot`
    pub group: Option<String>,
    /// Language key, e.g. `ts`
    pub language: Option<String>,
    /// Scenario name
    pub scenario: Option<String>,
    /// Sample name, for sample downloads
    pub sample_name: Option<String>,
    /// Destination directory
    pub dst: PathBuf,
    /// Archive sub-folder to extract
    pub app_folder: Option<String>,
    /// Entry name rewrite
    pub name_replace: Option<NameReplaceFn>,
    /// Entry content rewrite
    pub data_replace: Option<DataReplaceFn>,
    /// Resolved archive URL
    pub zip_url: Option<String>,
    /// Retrieved archive
    pub zip: Option<TemplateArchive>,
    /// Where the archive came from
    pub zip_origin: Option<ZipOrigin>,
    /// Files written by the unzip action, relative to `dst`
    pub written: Vec<PathBuf>,
}

impl fmt::Debug for ScaffoldContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaffoldContext")
            .field("group", &self.group)
            .field("language", &self.language)
            .field("scenario", &self.scenario)
            .field("sample_name", &self.sample_name)
            .field("dst", &self.dst)
            .field("app_folder", &self.app_folder)
            .field("zip_url", &self.zip_url)
            .field("zip_origin", &self.zip_origin)
            .finish_non_exhaustive()
    }
}

impl ScaffoldContext {
    /// Context for a template scaffold
    #[must_use]
    pub fn for_template(
        group: impl Into<String>,
        language: impl Into<String>,
        scenario: impl Into<String>,
        dst: impl Into<PathBuf>,
    ) -> Self {
        Self {
            group: Some(group.into()),
            language: Some(language.into()),
            scenario: Some(scenario.into()),
            dst: dst.into(),
            ..Self::default()
        }
    }

    /// Context for a sample download
    #[must_use]
    pub fn for_sample(name: impl Into<String>, dst: impl Into<PathBuf>) -> Self {
        Self {
            sample_name: Some(name.into()),
            dst: dst.into(),
            ..Self::default()
        }
    }

    /// `<group>.<language>.<scenario>`
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::MissingContext`] if any part is unset.
    pub fn template_name(&self) -> ScaffoldResult<String> {
        let group = self.group.as_deref().ok_or(ScaffoldError::MissingContext("group"))?;
        let language = self
            .language
            .as_deref()
            .ok_or(ScaffoldError::MissingContext("language"))?;
        let scenario = self
            .scenario
            .as_deref()
            .ok_or(ScaffoldError::MissingContext("scenario"))?;
        Ok(template_name(group, language, scenario))
    }
}

/// A named step in a scaffold run
#[async_trait]
pub trait ScaffoldAction: Send + Sync {
    /// Action identity, passed to the error handler on failure
    fn name(&self) -> ScaffoldActionName;

    /// Run against the shared context
    async fn run(&self, ctx: &mut ScaffoldContext) -> ScaffoldResult<()>;
}

/// Resolves the template URL from the tag list
pub struct FetchTemplateUrlWithTag {
    fetcher: Arc<TemplateFetcher>,
}

impl FetchTemplateUrlWithTag {
    /// Create the action
    #[must_use]
    pub const fn new(fetcher: Arc<TemplateFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ScaffoldAction for FetchTemplateUrlWithTag {
    fn name(&self) -> ScaffoldActionName {
        ScaffoldActionName::FetchTemplateUrlWithTag
    }

    async fn run(&self, ctx: &mut ScaffoldContext) -> ScaffoldResult<()> {
        if ctx.zip_url.is_some() {
            return Ok(());
        }
        let name = ctx.template_name()?;
        ctx.zip_url = Some(self.fetcher.resolve_url(&name).await?);
        Ok(())
    }
}

/// Downloads the archive at `ctx.zip_url`
pub struct FetchZipFromUrl {
    name: ScaffoldActionName,
    retriever: Arc<ZipRetriever>,
}

impl FetchZipFromUrl {
    /// Template download step
    #[must_use]
    pub const fn template(retriever: Arc<ZipRetriever>) -> Self {
        Self {
            name: ScaffoldActionName::FetchTemplateZipFromUrl,
            retriever,
        }
    }

    /// Sample download step
    #[must_use]
    pub const fn sample(retriever: Arc<ZipRetriever>) -> Self {
        Self {
            name: ScaffoldActionName::FetchSampleZipFromUrl,
            retriever,
        }
    }
}

#[async_trait]
impl ScaffoldAction for FetchZipFromUrl {
    fn name(&self) -> ScaffoldActionName {
        self.name
    }

    async fn run(&self, ctx: &mut ScaffoldContext) -> ScaffoldResult<()> {
        if ctx.zip.is_some() {
            return Ok(());
        }
        let url = ctx
            .zip_url
            .as_deref()
            .ok_or(ScaffoldError::MissingContext("zip_url"))?;
        let archive = self.retriever.fetch_remote(url).await?;
        ctx.zip = Some(archive);
        ctx.zip_origin = Some(ZipOrigin::Remote);
        Ok(())
    }
}

/// Reads the bundled template archive when no archive was downloaded
pub struct FetchTemplateZipFromLocal {
    retriever: Arc<ZipRetriever>,
}

impl FetchTemplateZipFromLocal {
    /// Create the action
    #[must_use]
    pub const fn new(retriever: Arc<ZipRetriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl ScaffoldAction for FetchTemplateZipFromLocal {
    fn name(&self) -> ScaffoldActionName {
        ScaffoldActionName::FetchTemplateZipFromLocal
    }

    async fn run(&self, ctx: &mut ScaffoldContext) -> ScaffoldResult<()> {
        if ctx.zip.is_some() {
            return Ok(());
        }
        let name = ctx.template_name()?;
        tracing::info!(template = %name, "using bundled template");
        let archive = self.retriever.read_fallback(&name).await?;
        ctx.zip = Some(archive);
        ctx.zip_origin = Some(ZipOrigin::Local);
        Ok(())
    }
}

/// Resolves the sample repository archive URL and the sample's folder in it
pub struct FetchSampleUrlWithTag {
    settings: SampleSettings,
}

impl FetchSampleUrlWithTag {
    /// Create the action
    #[must_use]
    pub const fn new(settings: SampleSettings) -> Self {
        Self { settings }
    }
}

/// Sample names are single path segments
fn is_valid_sample_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

#[async_trait]
impl ScaffoldAction for FetchSampleUrlWithTag {
    fn name(&self) -> ScaffoldActionName {
        ScaffoldActionName::FetchSampleUrlWithTag
    }

    async fn run(&self, ctx: &mut ScaffoldContext) -> ScaffoldResult<()> {
        let name = ctx
            .sample_name
            .as_deref()
            .ok_or(ScaffoldError::MissingContext("sample_name"))?;
        if !is_valid_sample_name(name) {
            return Err(ScaffoldError::Generic(format!("invalid sample name `{name}`")));
        }

        let tag = self.settings.tag.as_str();
        // GitHub tag archives drop the leading `v` from the top-level folder
        let version = tag.strip_prefix('v').unwrap_or(tag);
        ctx.zip_url = Some(format!(
            "{}/{tag}.zip",
            self.settings.base_url.trim_end_matches('/')
        ));
        ctx.app_folder = Some(format!("{}-{version}/{name}/", self.settings.repo_name));
        Ok(())
    }
}

/// Extracts `ctx.zip` into `ctx.dst`
#[derive(Debug, Default)]
pub struct Unzip;

#[async_trait]
impl ScaffoldAction for Unzip {
    fn name(&self) -> ScaffoldActionName {
        ScaffoldActionName::Unzip
    }

    async fn run(&self, ctx: &mut ScaffoldContext) -> ScaffoldResult<()> {
        let options = UnzipOptions {
            app_folder: ctx.app_folder.clone(),
            name_replace: ctx.name_replace.clone(),
            data_replace: ctx.data_replace.clone(),
            ..UnzipOptions::default()
        };
        let archive = ctx.zip.as_mut().ok_or(ScaffoldError::MissingContext("zip"))?;
        ctx.written = unzip(archive, &ctx.dst, &options).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_name_requires_all_parts() {
        let ctx = ScaffoldContext::for_template("bot", "ts", "default", "/tmp/x");
        assert_eq!(ctx.template_name().unwrap(), "bot.ts.default");

        let ctx = ScaffoldContext::for_sample("hello-world", "/tmp/x");
        assert!(matches!(ctx.template_name(), Err(ScaffoldError::MissingContext("group"))));
    }

    #[test]
    fn test_action_names_display() {
        assert_eq!(ScaffoldActionName::Unzip.to_string(), "unzip");
        assert_eq!(
            ScaffoldActionName::FetchTemplateZipFromLocal.to_string(),
            "fetch-template-zip-from-local"
        );
    }

    #[tokio::test]
    async fn test_sample_url_and_folder() {
        let action = FetchSampleUrlWithTag::new(SampleSettings {
            base_url: "https://github.com/org/Samples/archive/refs/tags/".into(),
            repo_name: "Samples".into(),
            tag: "v2.2.0".into(),
        });
        let mut ctx = ScaffoldContext::for_sample("hello-world-tab", "/tmp/out");
        action.run(&mut ctx).await.unwrap();

        assert_eq!(
            ctx.zip_url.as_deref(),
            Some("https://github.com/org/Samples/archive/refs/tags/v2.2.0.zip")
        );
        assert_eq!(ctx.app_folder.as_deref(), Some("Samples-2.2.0/hello-world-tab/"));
    }

    #[tokio::test]
    async fn test_sample_name_must_be_single_segment() {
        let action = FetchSampleUrlWithTag::new(SampleSettings::default());
        let mut ctx = ScaffoldContext::for_sample("../escape", "/tmp/out");
        assert!(action.run(&mut ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_unzip_without_archive_is_missing_context() {
        let mut ctx = ScaffoldContext::for_template("bot", "js", "default", "/tmp/out");
        let err = Unzip.run(&mut ctx).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::MissingContext("zip")));
    }
}
