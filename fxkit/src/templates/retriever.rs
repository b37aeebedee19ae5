//! Zip retrieval with local fallback
//!
//! Two tiers: the remote archive (retried), then a bundled archive shipped
//! with the tool. The whole archive is buffered and validated before it is
//! handed on; there is no streaming.

use std::path::PathBuf;
use std::sync::Arc;

use super::archive::TemplateArchive;
use super::fetcher::template_zip_name;
use super::retry::{classify_response, run_with_retries, Attempt, RetryOutcome, RetryPolicy};
use crate::config::TemplateSettings;
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::net::HttpClient;

/// Where an archive came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZipOrigin {
    /// Downloaded from the template host
    Remote,
    /// Read from the bundled fallback directory
    Local,
}

/// States of [`ZipRetriever::retrieve`]
#[derive(Debug)]
pub enum RetrievalState {
    /// Downloading from the given URL
    FetchingRemote(String),
    /// Reading the bundled archive
    FallingBackLocal,
    /// Finished with an archive
    Succeeded(RetrievedZip),
    /// Both tiers failed
    Failed(ScaffoldError),
}

/// An archive together with its origin
#[derive(Debug, Clone)]
pub struct RetrievedZip {
    /// The validated archive
    pub archive: TemplateArchive,
    /// Which tier produced it
    pub origin: ZipOrigin,
}

/// Downloads template archives, falling back to bundled copies
pub struct ZipRetriever {
    client: Arc<dyn HttpClient>,
    policy: RetryPolicy,
    fallback_dir: Option<PathBuf>,
}

impl ZipRetriever {
    /// Create a retriever from template settings
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>, settings: &TemplateSettings) -> Self {
        Self {
            client,
            policy: RetryPolicy::new(settings.try_limits, settings.retry_delay()),
            fallback_dir: settings.fallback_dir.clone(),
        }
    }

    /// Path of the bundled archive for a template, if a fallback directory is set
    #[must_use]
    pub fn fallback_path(&self, template_name: &str) -> Option<PathBuf> {
        self.fallback_dir
            .as_ref()
            .map(|dir| dir.join(template_zip_name(template_name)))
    }

    /// Download and validate a remote archive
    ///
    /// Transport errors and transient statuses are retried; a malformed
    /// archive is not.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::RemoteZipFetchFailed`] on any failure.
    pub async fn fetch_remote(&self, url: &str) -> ScaffoldResult<TemplateArchive> {
        tracing::debug!(%url, "downloading template zip");

        let outcome = run_with_retries(self.policy, move |_| async move {
            match classify_response(self.client.get(url).await) {
                Attempt::Success(bytes) => match TemplateArchive::from_bytes(bytes) {
                    Ok(archive) => Attempt::Success(archive),
                    Err(e) => Attempt::Terminal(format!("malformed zip: {e}")),
                },
                Attempt::Retryable(reason) => Attempt::Retryable(reason),
                Attempt::Terminal(reason) => Attempt::Terminal(reason),
            }
        })
        .await;

        match outcome {
            RetryOutcome::Succeeded(archive) => Ok(archive),
            RetryOutcome::Exhausted { reason, .. } | RetryOutcome::Aborted { reason, .. } => {
                Err(ScaffoldError::RemoteZipFetchFailed {
                    url: url.to_string(),
                    reason,
                })
            }
        }
    }

    /// Read the bundled archive for a template
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::FallbackZipMissing`] if no bundled archive
    /// exists, or [`ScaffoldError::FallbackZipUnreadable`] if it cannot be
    /// read or parsed.
    pub async fn read_fallback(&self, template_name: &str) -> ScaffoldResult<TemplateArchive> {
        let path = self
            .fallback_path(template_name)
            .ok_or_else(|| ScaffoldError::FallbackZipMissing(PathBuf::from(template_zip_name(template_name))))?;

        tracing::debug!(path = %path.display(), "reading bundled template zip");

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScaffoldError::FallbackZipMissing(path));
            }
            Err(e) => {
                return Err(ScaffoldError::FallbackZipUnreadable {
                    path,
                    reason: e.to_string(),
                });
            }
        };

        TemplateArchive::from_bytes(bytes).map_err(|e| ScaffoldError::FallbackZipUnreadable {
            path,
            reason: e.to_string(),
        })
    }

    /// Run the remote → local state machine
    ///
    /// Standalone entry point for callers that want an archive without the
    /// action runner. The scaffold flows do not go through it: their fetch
    /// actions call [`Self::fetch_remote`] and [`Self::read_fallback`]
    /// directly and leave the fallback decision to the error policy.
    ///
    /// With no URL the remote tier is skipped.
    ///
    /// # Errors
    ///
    /// Returns the local-tier error when both tiers fail.
    pub async fn retrieve(&self, url: Option<&str>, template_name: &str) -> ScaffoldResult<RetrievedZip> {
        let mut state = url.map_or(RetrievalState::FallingBackLocal, |url| {
            RetrievalState::FetchingRemote(url.to_string())
        });

        loop {
            state = match state {
                RetrievalState::FetchingRemote(url) => match self.fetch_remote(&url).await {
                    Ok(archive) => RetrievalState::Succeeded(RetrievedZip {
                        archive,
                        origin: ZipOrigin::Remote,
                    }),
                    Err(e) => {
                        tracing::info!(error = %e, "remote template unavailable, using bundled copy");
                        RetrievalState::FallingBackLocal
                    }
                },
                RetrievalState::FallingBackLocal => match self.read_fallback(template_name).await {
                    Ok(archive) => RetrievalState::Succeeded(RetrievedZip {
                        archive,
                        origin: ZipOrigin::Local,
                    }),
                    Err(e) => RetrievalState::Failed(e),
                },
                RetrievalState::Succeeded(zip) => return Ok(zip),
                RetrievalState::Failed(e) => return Err(e),
            };
        }
    }
}
