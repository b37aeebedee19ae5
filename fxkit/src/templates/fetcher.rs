//! Template URL resolution
//!
//! Fetches the tag list, selects a tag and composes the archive URL
//! `<base_url>/<tag>/<template_name>.zip`.

use std::sync::Arc;
use std::time::Duration;

use super::retry::{classify_response, run_with_retries, Attempt, RetryOutcome, RetryPolicy};
use super::tags::{parse_tag_list, select_tag, TagChannel};
use crate::config::TemplateSettings;
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::net::{HttpClient, TransportError};

/// Archive name for a template
#[must_use]
pub fn template_zip_name(template_name: &str) -> String {
    format!("{template_name}.zip")
}

/// Template name for a component group, language and scenario
///
/// ```rust
/// assert_eq!(fxkit::templates::template_name("bot", "ts", "default"), "bot.ts.default");
/// ```
#[must_use]
pub fn template_name(group: &str, language: &str, scenario: &str) -> String {
    format!("{group}.{language}.{scenario}")
}

/// Resolves template download URLs from a remote tag list
pub struct TemplateFetcher {
    client: Arc<dyn HttpClient>,
    tag_list_url: String,
    base_url: String,
    policy: RetryPolicy,
    timeout: Duration,
    channel: TagChannel,
}

impl TemplateFetcher {
    /// Create a fetcher from template settings
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Config`] if the tag channel is invalid.
    pub fn new(client: Arc<dyn HttpClient>, settings: &TemplateSettings) -> ScaffoldResult<Self> {
        Ok(Self {
            client,
            tag_list_url: settings.tag_list_url.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            policy: RetryPolicy::new(settings.try_limits, settings.retry_delay()),
            timeout: settings.timeout(),
            channel: settings.channel()?,
        })
    }

    /// Tag selection channel in use
    #[must_use]
    pub const fn channel(&self) -> &TagChannel {
        &self.channel
    }

    /// Fetch and parse the tag list
    ///
    /// Each attempt is bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::TagListFetchFailed`] once the attempt budget
    /// is spent or a non-retryable response is received.
    pub async fn fetch_tag_list(&self) -> ScaffoldResult<Vec<String>> {
        tracing::debug!(url = %self.tag_list_url, "fetching template tag list");

        let outcome = run_with_retries(self.policy, move |_| async move {
            let response = tokio::time::timeout(self.timeout, self.client.get(&self.tag_list_url))
                .await
                .unwrap_or(Err(TransportError::Timeout(self.timeout)));
            match classify_response(response) {
                Attempt::Success(body) => match String::from_utf8(body) {
                    Ok(text) => Attempt::Success(parse_tag_list(&text)),
                    Err(e) => Attempt::Retryable(format!("tag list is not UTF-8: {e}")),
                },
                Attempt::Retryable(reason) => Attempt::Retryable(reason),
                Attempt::Terminal(reason) => Attempt::Terminal(reason),
            }
        })
        .await;

        match outcome {
            RetryOutcome::Succeeded(tags) => {
                tracing::debug!(count = tags.len(), "fetched template tag list");
                Ok(tags)
            }
            RetryOutcome::Exhausted { attempts, reason }
            | RetryOutcome::Aborted { attempts, reason } => {
                Err(ScaffoldError::TagListFetchFailed { attempts, reason })
            }
        }
    }

    /// Fetch the tag list and select a tag
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::TagListFetchFailed`] if the list cannot be
    /// fetched, or [`ScaffoldError::TemplateNotFound`] if no tag matches.
    pub async fn resolve_tag(&self, template_name: &str) -> ScaffoldResult<String> {
        let tags = self.fetch_tag_list().await?;
        select_tag(tags.as_slice(), &self.channel)
            .ok_or_else(|| ScaffoldError::TemplateNotFound(template_name.to_string()))
    }

    /// Resolve the download URL for a template
    ///
    /// # Errors
    ///
    /// See [`TemplateFetcher::resolve_tag`].
    pub async fn resolve_url(&self, template_name: &str) -> ScaffoldResult<String> {
        let tag = self.resolve_tag(template_name).await?;
        let url = self.url_for(&tag, template_name);
        tracing::debug!(%tag, %url, "resolved template url");
        Ok(url)
    }

    /// Compose the archive URL for a known tag
    #[must_use]
    pub fn url_for(&self, tag: &str, template_name: &str) -> String {
        format!("{}/{tag}/{}", self.base_url, template_zip_name(template_name))
    }
}
