//! Observability (logging)
//!
//! Structured logging via `tracing`. Scaffold actions, retries and fallbacks
//! emit events; the subscriber installed here decides what reaches stderr.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How chatty the default filter is when `RUST_LOG` is not set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Warnings and errors only
    #[default]
    Quiet,
    /// Info for fxkit crates
    Normal,
    /// Debug for everything, trace for fxkit crates
    Verbose,
}

impl Verbosity {
    /// Map a repeated `-v` count to a verbosity
    #[must_use]
    pub const fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Self::Quiet,
            1 => Self::Normal,
            _ => Self::Verbose,
        }
    }

    const fn default_directives(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "warn,fxkit=info,fxkit_cli_lib=info",
            Self::Verbose => "debug,fxkit=trace,fxkit_cli_lib=trace",
        }
    }
}

/// Initialize logging
///
/// `RUST_LOG` takes precedence over `verbosity`. Output goes to stderr so
/// it never mixes with command output on stdout.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use fxkit::observability::{self, Verbosity};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// observability::init(Verbosity::Normal)?;
/// tracing::info!("scaffold started");
/// # Ok(())
/// # }
/// ```
pub fn init(verbosity: Verbosity) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directives()));

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    }
}
