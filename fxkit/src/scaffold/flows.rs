//! The two standard scaffold flows
//!
//! Templates: resolve URL, download, fall back to the bundled copy, unzip.
//! Samples: resolve URL, download, unzip the sample's sub-folder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::action::{
    FetchSampleUrlWithTag, FetchTemplateUrlWithTag, FetchTemplateZipFromLocal, FetchZipFromUrl,
    ScaffoldAction, ScaffoldContext, Unzip,
};
use super::runner::{ActionErrorHandler, ScaffoldRunner};
use crate::config::{FxkitConfig, SampleSettings};
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::net::HttpClient;
use crate::templates::{DataReplaceFn, NameReplaceFn, TemplateFetcher, ZipOrigin, ZipRetriever};

/// Inputs for a template scaffold
#[derive(Clone, Default)]
pub struct TemplateRequest {
    /// Component group, e.g. `bot`
    pub group: String,
    /// Language key, e.g. `ts`
    pub language: String,
    /// Scenario name
    pub scenario: String,
    /// Destination directory
    pub dst: PathBuf,
    /// Entry name rewrite
    pub name_replace: Option<NameReplaceFn>,
    /// Entry content rewrite
    pub data_replace: Option<DataReplaceFn>,
}

impl TemplateRequest {
    /// Request without rewrites
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        language: impl Into<String>,
        scenario: impl Into<String>,
        dst: impl Into<PathBuf>,
    ) -> Self {
        Self {
            group: group.into(),
            language: language.into(),
            scenario: scenario.into(),
            dst: dst.into(),
            ..Self::default()
        }
    }

    /// Set the entry name rewrite
    #[must_use]
    pub fn with_name_replace(mut self, f: NameReplaceFn) -> Self {
        self.name_replace = Some(f);
        self
    }

    /// Set the entry content rewrite
    #[must_use]
    pub fn with_data_replace(mut self, f: DataReplaceFn) -> Self {
        self.data_replace = Some(f);
        self
    }
}

/// Inputs for a sample download
#[derive(Debug, Clone)]
pub struct SampleRequest {
    /// Sample folder name in the samples repository
    pub name: String,
    /// Destination directory
    pub dst: PathBuf,
}

/// What a completed scaffold produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    /// Destination directory
    pub dst: PathBuf,
    /// Files written, relative to `dst`
    pub files: Vec<PathBuf>,
    /// Where the archive came from
    pub origin: Option<ZipOrigin>,
}

impl ScaffoldOutcome {
    fn from_context(ctx: ScaffoldContext) -> Self {
        Self {
            dst: ctx.dst,
            files: ctx.written,
            origin: ctx.zip_origin,
        }
    }
}

/// Entry point for the template and sample flows
pub struct Scaffolder {
    fetcher: Arc<TemplateFetcher>,
    retriever: Arc<ZipRetriever>,
    samples: SampleSettings,
}

impl Scaffolder {
    /// Build from configuration, using `client` for every request
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Config`] if the template channel settings
    /// are invalid.
    pub fn new(client: Arc<dyn HttpClient>, config: &FxkitConfig) -> ScaffoldResult<Self> {
        let fetcher = TemplateFetcher::new(Arc::clone(&client), &config.templates)?;
        let retriever = ZipRetriever::new(client, &config.templates);
        Ok(Self {
            fetcher: Arc::new(fetcher),
            retriever: Arc::new(retriever),
            samples: config.samples.clone(),
        })
    }

    /// Template fetcher shared by the template flow
    #[must_use]
    pub fn fetcher(&self) -> &TemplateFetcher {
        &self.fetcher
    }

    fn template_runner(&self) -> ScaffoldRunner {
        let actions: Vec<Box<dyn ScaffoldAction>> = vec![
            Box::new(FetchTemplateUrlWithTag::new(Arc::clone(&self.fetcher))),
            Box::new(FetchZipFromUrl::template(Arc::clone(&self.retriever))),
            Box::new(FetchTemplateZipFromLocal::new(Arc::clone(&self.retriever))),
            Box::new(Unzip),
        ];
        ScaffoldRunner::new(actions)
    }

    fn sample_runner(&self) -> ScaffoldRunner {
        let actions: Vec<Box<dyn ScaffoldAction>> = vec![
            Box::new(FetchSampleUrlWithTag::new(self.samples.clone())),
            Box::new(FetchZipFromUrl::sample(Arc::clone(&self.retriever))),
            Box::new(Unzip),
        ];
        ScaffoldRunner::new(actions)
    }

    /// Scaffold a template into `request.dst`
    ///
    /// # Errors
    ///
    /// Returns the error `handler` produces for the first failure it does
    /// not swallow.
    pub async fn scaffold_from_templates(
        &self,
        request: TemplateRequest,
        handler: &dyn ActionErrorHandler,
    ) -> ScaffoldResult<ScaffoldOutcome> {
        let mut ctx = ScaffoldContext::for_template(
            request.group,
            request.language,
            request.scenario,
            request.dst,
        );
        ctx.name_replace = request.name_replace;
        ctx.data_replace = request.data_replace;

        tracing::info!(template = %ctx.template_name()?, dst = %ctx.dst.display(), "scaffolding from template");
        self.template_runner().run(&mut ctx, handler).await?;
        Ok(ScaffoldOutcome::from_context(ctx))
    }

    /// Download a sample into `request.dst`
    ///
    /// # Errors
    ///
    /// Returns the error `handler` produces for the first failure.
    pub async fn scaffold_from_sample(
        &self,
        request: SampleRequest,
        handler: &dyn ActionErrorHandler,
    ) -> ScaffoldResult<ScaffoldOutcome> {
        let mut ctx = ScaffoldContext::for_sample(request.name, request.dst);
        tracing::info!(sample = ?ctx.sample_name, dst = %ctx.dst.display(), "downloading sample");
        self.sample_runner().run(&mut ctx, handler).await?;
        Ok(ScaffoldOutcome::from_context(ctx))
    }
}

async fn is_missing_or_empty(path: &Path) -> ScaffoldResult<bool> {
    match tokio::fs::read_dir(path).await {
        Ok(mut entries) => Ok(entries
            .next_entry()
            .await
            .map_err(|e| ScaffoldError::Generic(format!("{}: {e}", path.display())))?
            .is_none()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(ScaffoldError::Generic(format!("{}: {e}", path.display()))),
    }
}

/// Destination for a sample under `parent`
///
/// `<parent>/<sample>` when it is missing or empty. Otherwise the first
/// `<parent>/<sample>_<n>`, counting from 1, that does not exist at all;
/// an existing empty `_<n>` directory is skipped.
///
/// # Errors
///
/// Returns [`ScaffoldError::Generic`] if a candidate cannot be inspected,
/// e.g. it exists but is a regular file.
pub async fn valid_sample_destination(sample: &str, parent: &Path) -> ScaffoldResult<PathBuf> {
    let base = parent.join(sample);
    if is_missing_or_empty(&base).await? {
        return Ok(base);
    }
    for suffix in 1u32.. {
        let candidate = parent.join(format!("{sample}_{suffix}"));
        let exists = tokio::fs::try_exists(&candidate)
            .await
            .map_err(|e| ScaffoldError::Generic(format!("{}: {e}", candidate.display())))?;
        if !exists {
            return Ok(candidate);
        }
    }
    Err(ScaffoldError::Generic(format!(
        "no free destination for sample `{sample}` under {}",
        parent.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::MockHttpClient;

    #[tokio::test]
    async fn test_valid_sample_destination() {
        let dir = tempfile::tempdir().unwrap();

        let first = valid_sample_destination("hello", dir.path()).await.unwrap();
        assert_eq!(first, dir.path().join("hello"));

        // existing but empty is reusable
        std::fs::create_dir(&first).unwrap();
        assert_eq!(valid_sample_destination("hello", dir.path()).await.unwrap(), first);

        std::fs::write(first.join("README.md"), "x").unwrap();
        std::fs::create_dir(dir.path().join("hello_1")).unwrap();
        std::fs::write(dir.path().join("hello_1").join("a"), "x").unwrap();
        assert_eq!(
            valid_sample_destination("hello", dir.path()).await.unwrap(),
            dir.path().join("hello_2")
        );

        // an empty suffixed folder still counts as taken
        std::fs::create_dir(dir.path().join("hello_2")).unwrap();
        assert_eq!(
            valid_sample_destination("hello", dir.path()).await.unwrap(),
            dir.path().join("hello_3")
        );
    }

    #[test]
    fn test_flow_action_order() {
        let client: Arc<dyn HttpClient> = Arc::new(MockHttpClient::new());
        let scaffolder = Scaffolder::new(client, &FxkitConfig::default()).unwrap();

        let names: Vec<&str> = scaffolder
            .template_runner()
            .action_names()
            .into_iter()
            .map(|n| n.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "fetch-template-url-with-tag",
                "fetch-template-zip-from-url",
                "fetch-template-zip-from-local",
                "unzip"
            ]
        );
        assert_eq!(scaffolder.sample_runner().action_names().len(), 3);
    }
}
