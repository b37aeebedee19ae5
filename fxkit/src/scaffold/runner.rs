//! Sequential action runner with pluggable error translation

use super::action::{ScaffoldAction, ScaffoldActionName, ScaffoldContext};
use crate::error::{ScaffoldError, ScaffoldResult};

/// Decides what a failed action means for the run
///
/// Returning `Ok(())` swallows the failure and continues with the next
/// action; returning `Err` aborts the run with that error, which may be a
/// translated domain error or the original one.
pub trait ActionErrorHandler: Send + Sync {
    /// Handle a failure of `action`
    ///
    /// # Errors
    ///
    /// Returns the error the run should abort with.
    fn on_action_error(
        &self,
        action: ScaffoldActionName,
        ctx: &ScaffoldContext,
        error: ScaffoldError,
    ) -> ScaffoldResult<()>;
}

impl<F> ActionErrorHandler for F
where
    F: Fn(ScaffoldActionName, &ScaffoldContext, ScaffoldError) -> ScaffoldResult<()> + Send + Sync,
{
    fn on_action_error(
        &self,
        action: ScaffoldActionName,
        ctx: &ScaffoldContext,
        error: ScaffoldError,
    ) -> ScaffoldResult<()> {
        self(action, ctx, error)
    }
}

/// Runs a fixed, ordered list of actions
pub struct ScaffoldRunner {
    actions: Vec<Box<dyn ScaffoldAction>>,
}

impl ScaffoldRunner {
    /// Create a runner for the given actions, executed in order
    #[must_use]
    pub fn new(actions: Vec<Box<dyn ScaffoldAction>>) -> Self {
        Self { actions }
    }

    /// Names of the actions, in execution order
    #[must_use]
    pub fn action_names(&self) -> Vec<ScaffoldActionName> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Run every action against `ctx`
    ///
    /// Actions run one at a time; each is awaited before the next starts.
    ///
    /// # Errors
    ///
    /// Returns whatever `handler` returns for the first failure it does not
    /// swallow.
    pub async fn run(
        &self,
        ctx: &mut ScaffoldContext,
        handler: &dyn ActionErrorHandler,
    ) -> ScaffoldResult<()> {
        for action in &self.actions {
            let name = action.name();
            tracing::debug!(action = %name, "running scaffold action");

            if let Err(error) = action.run(ctx).await {
                tracing::warn!(action = %name, %error, "scaffold action failed");
                handler.on_action_error(name, ctx, error)?;
                tracing::debug!(action = %name, "failure handled, continuing");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Recording {
        name: ScaffoldActionName,
        fail: bool,
        log: Arc<Mutex<Vec<ScaffoldActionName>>>,
    }

    #[async_trait]
    impl ScaffoldAction for Recording {
        fn name(&self) -> ScaffoldActionName {
            self.name
        }

        async fn run(&self, _ctx: &mut ScaffoldContext) -> ScaffoldResult<()> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                Err(ScaffoldError::Generic(format!("{} broke", self.name)))
            } else {
                Ok(())
            }
        }
    }

    fn runner(
        failing: &[ScaffoldActionName],
    ) -> (ScaffoldRunner, Arc<Mutex<Vec<ScaffoldActionName>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let actions: Vec<Box<dyn ScaffoldAction>> = [
            ScaffoldActionName::FetchTemplateUrlWithTag,
            ScaffoldActionName::FetchTemplateZipFromUrl,
            ScaffoldActionName::Unzip,
        ]
        .into_iter()
        .map(|name| {
            Box::new(Recording {
                name,
                fail: failing.contains(&name),
                log: Arc::clone(&log),
            }) as Box<dyn ScaffoldAction>
        })
        .collect();
        (ScaffoldRunner::new(actions), log)
    }

    #[tokio::test]
    async fn test_runs_in_order() {
        let (runner, log) = runner(&[]);
        let mut ctx = ScaffoldContext::default();
        runner
            .run(&mut ctx, &|_: ScaffoldActionName, _: &ScaffoldContext, e: ScaffoldError| -> ScaffoldResult<()> { Err(e) })
            .await
            .unwrap();
        assert_eq!(*log.lock().unwrap(), runner.action_names());
    }

    #[tokio::test]
    async fn test_swallowed_failure_continues() {
        let (runner, log) = runner(&[ScaffoldActionName::FetchTemplateUrlWithTag]);
        let mut ctx = ScaffoldContext::default();
        let handler = |name: ScaffoldActionName,
                       _: &ScaffoldContext,
                       e: ScaffoldError|
         -> ScaffoldResult<()> {
            match name {
                ScaffoldActionName::FetchTemplateUrlWithTag => Ok(()),
                _ => Err(e),
            }
        };
        runner.run(&mut ctx, &handler).await.unwrap();
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_translated_failure_aborts() {
        let (runner, log) = runner(&[ScaffoldActionName::FetchTemplateZipFromUrl]);
        let mut ctx = ScaffoldContext::default();
        let handler = |_: ScaffoldActionName,
                       _: &ScaffoldContext,
                       _: ScaffoldError|
         -> ScaffoldResult<()> { Err(ScaffoldError::TemplateZipFallback) };
        let err = runner.run(&mut ctx, &handler).await.unwrap_err();

        assert!(matches!(err, ScaffoldError::TemplateZipFallback));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ScaffoldActionName::FetchTemplateUrlWithTag,
                ScaffoldActionName::FetchTemplateZipFromUrl
            ]
        );
    }
}
