//! Error translation policies for the standard scaffold flows

use super::action::{ScaffoldActionName, ScaffoldContext};
use super::runner::ActionErrorHandler;
use crate::error::{ScaffoldError, ScaffoldResult};

fn unzip_error(ctx: &ScaffoldContext, error: ScaffoldError) -> ScaffoldError {
    match error {
        ScaffoldError::Unzip { .. } => error,
        other => ScaffoldError::unzip(&ctx.dst, other),
    }
}

/// Policy for template scaffolds
///
/// URL resolution and download failures are swallowed because the bundled
/// archive covers them; a failed fallback aborts with
/// [`ScaffoldError::TemplateZipFallback`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateErrorPolicy;

impl ActionErrorHandler for TemplateErrorPolicy {
    fn on_action_error(
        &self,
        action: ScaffoldActionName,
        ctx: &ScaffoldContext,
        error: ScaffoldError,
    ) -> ScaffoldResult<()> {
        match action {
            ScaffoldActionName::FetchTemplateUrlWithTag
            | ScaffoldActionName::FetchTemplateZipFromUrl => Ok(()),
            ScaffoldActionName::FetchTemplateZipFromLocal => {
                tracing::error!(%error, "bundled template unavailable");
                Err(ScaffoldError::TemplateZipFallback)
            }
            ScaffoldActionName::Unzip => Err(unzip_error(ctx, error)),
            ScaffoldActionName::FetchSampleUrlWithTag
            | ScaffoldActionName::FetchSampleZipFromUrl => Err(ScaffoldError::Generic(error.to_string())),
        }
    }
}

/// Policy for sample downloads; every failure aborts
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleErrorPolicy;

impl ActionErrorHandler for SampleErrorPolicy {
    fn on_action_error(
        &self,
        action: ScaffoldActionName,
        ctx: &ScaffoldContext,
        error: ScaffoldError,
    ) -> ScaffoldResult<()> {
        let sample = ctx.sample_name.clone().unwrap_or_default();
        match action {
            ScaffoldActionName::FetchSampleUrlWithTag => Err(ScaffoldError::FetchSampleUrl(sample)),
            ScaffoldActionName::FetchSampleZipFromUrl => {
                tracing::error!(%error, "sample download failed");
                Err(ScaffoldError::FetchZipFromUrl(sample))
            }
            ScaffoldActionName::Unzip => Err(unzip_error(ctx, error)),
            ScaffoldActionName::FetchTemplateUrlWithTag
            | ScaffoldActionName::FetchTemplateZipFromUrl
            | ScaffoldActionName::FetchTemplateZipFromLocal => {
                Err(ScaffoldError::Generic(error.to_string()))
            }
        }
    }
}

/// Policy that aborts with the original error
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughPolicy;

impl ActionErrorHandler for PassthroughPolicy {
    fn on_action_error(
        &self,
        _action: ScaffoldActionName,
        _ctx: &ScaffoldContext,
        error: ScaffoldError,
    ) -> ScaffoldResult<()> {
        Err(error)
    }
}
