//! Error types and error handling
//!
//! Library code returns [`ScaffoldError`]. Callers that need to show the
//! error to a user convert it into a [`Failure`], which carries the source
//! tag, a stable error code and the human-readable message.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Scaffold pipeline error type
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The tag list could not be fetched within the retry budget
    #[error("failed to fetch template tag list after {attempts} attempt(s): {reason}")]
    TagListFetchFailed {
        /// Number of attempts made
        attempts: u32,
        /// Last failure seen
        reason: String,
    },

    /// No tag in the tag list matches the selection rule
    #[error("failed to find valid template for {0}")]
    TemplateNotFound(String),

    /// The remote zip could not be downloaded or was malformed
    #[error("failed to fetch zip from {url}: {reason}")]
    RemoteZipFetchFailed {
        /// Download URL
        url: String,
        /// Last failure seen
        reason: String,
    },

    /// The bundled fallback zip does not exist
    #[error("fallback template zip not found: {}", .0.display())]
    FallbackZipMissing(PathBuf),

    /// The bundled fallback zip exists but could not be read or parsed
    #[error("fallback template zip {} is unreadable: {reason}", path.display())]
    FallbackZipUnreadable {
        /// Path of the bundled asset
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Neither the remote template nor the local fallback could be used
    #[error("failed to download the template zip and the local fallback could not be used")]
    TemplateZipFallback,

    /// The sample download URL could not be resolved
    #[error("failed to resolve download url for sample {0}")]
    FetchSampleUrl(String),

    /// The sample archive could not be downloaded
    #[error("failed to download sample archive {0}")]
    FetchZipFromUrl(String),

    /// Extracting the archive into the destination failed
    #[error("failed to unzip templates into {}: {reason}", dst.display())]
    Unzip {
        /// Destination directory
        dst: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// A template file or file name failed to render
    #[error("failed to render template {name}: {reason}")]
    Render {
        /// Entry name being rendered
        name: String,
        /// Renderer message
        reason: String,
    },

    /// An action ran before the context value it depends on was set
    #[error("scaffold context is missing `{0}`")]
    MissingContext(&'static str),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Unclassified action failure, carries the original message
    #[error("{0}")]
    Generic(String),
}

impl ScaffoldError {
    /// Create a configuration error from a string message
    #[must_use]
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unzip error for a destination
    #[must_use]
    pub fn unzip<T: ToString>(dst: impl Into<PathBuf>, reason: T) -> Self {
        Self::Unzip {
            dst: dst.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable error code, suitable for matching in scripts and telemetry
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TagListFetchFailed { .. } => "TagListFetchError",
            Self::TemplateNotFound(_) => "TemplateNotFoundError",
            Self::RemoteZipFetchFailed { .. } => "RemoteZipFetchError",
            Self::FallbackZipMissing(_) => "FallbackZipMissingError",
            Self::FallbackZipUnreadable { .. } => "FallbackZipUnreadableError",
            Self::TemplateZipFallback => "TemplateZipFallbackError",
            Self::FetchSampleUrl(_) => "FetchSampleUrlWithTagError",
            Self::FetchZipFromUrl(_) => "FetchZipFromUrlError",
            Self::Unzip { .. } => "UnzipError",
            Self::Render { .. } => "RenderTemplateError",
            Self::MissingContext(_) => "MissingContextError",
            Self::Config(_) => "ConfigError",
            Self::Generic(_) => "ScaffoldError",
        }
    }

    /// Whether the user can act on this error (bad input, local files)
    /// rather than it being a fault of the tool or the network
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound(_)
                | Self::FetchSampleUrl(_)
                | Self::Unzip { .. }
                | Self::Config(_)
        )
    }
}

/// Result type alias for scaffold operations
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Whether a failure was caused by the user or by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Caused by user input or the user's environment
    User,
    /// Caused by the tool, the network or a remote service
    System,
}

/// User-visible failure: source tag, stable code and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Component that raised the failure (e.g. `bot`, `sample`)
    pub source: String,
    /// Stable error code
    pub code: &'static str,
    /// Human-readable message
    pub message: String,
    /// User or system failure
    pub kind: FailureKind,
}

impl Failure {
    /// Build a failure from a scaffold error, tagged with its source
    #[must_use]
    pub fn from_error(source: impl Into<String>, err: &ScaffoldError) -> Self {
        Self {
            source: source.into(),
            code: err.code(),
            message: err.to_string(),
            kind: if err.is_user_error() {
                FailureKind::User
            } else {
                FailureKind::System
            },
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}.{}] {}", self.source, self.code, self.message)
    }
}

impl std::error::Error for Failure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ScaffoldError::TemplateZipFallback.code(), "TemplateZipFallbackError");
        assert_eq!(ScaffoldError::unzip("/tmp/x", "denied").code(), "UnzipError");
        assert_eq!(
            ScaffoldError::TemplateNotFound("bot.js.default".into()).code(),
            "TemplateNotFoundError"
        );
    }

    #[test]
    fn test_failure_display() {
        let err = ScaffoldError::unzip("/work/bot", "permission denied");
        let failure = Failure::from_error("bot", &err);

        assert_eq!(failure.kind, FailureKind::User);
        assert_eq!(
            failure.to_string(),
            "[bot.UnzipError] failed to unzip templates into /work/bot: permission denied"
        );
    }

    #[test]
    fn test_network_failures_are_system_errors() {
        let err = ScaffoldError::RemoteZipFetchFailed {
            url: "https://example.com/a.zip".into(),
            reason: "503".into(),
        };
        assert_eq!(Failure::from_error("generator", &err).kind, FailureKind::System);
    }
}
