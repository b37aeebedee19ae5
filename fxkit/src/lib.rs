//! fxkit: template fetch, fallback and scaffold pipeline for app projects
//!
//! Project templates are published as zip archives under versioned release
//! tags. fxkit resolves the newest matching tag, downloads the archive with
//! bounded retries, falls back to a bundled copy when the network fails, and
//! unpacks the result into a destination directory while rewriting names and
//! `.tpl` contents.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use fxkit::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = FxkitConfig::load()?;
//!     let client = Arc::new(ReqwestClient::new(Duration::from_secs(10))?);
//!     let scaffolder = Scaffolder::new(client, &config)?;
//!
//!     let outcome = scaffolder
//!         .scaffold_from_templates(
//!             TemplateRequest::new("bot", "ts", "default", "./my-app/bot"),
//!             &TemplateErrorPolicy,
//!         )
//!         .await?;
//!     println!("wrote {} files", outcome.files.len());
//!     Ok(())
//! }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod generator;
pub mod net;
pub mod observability;
pub mod scaffold;
pub mod templates;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use fxkit::prelude::*;
    //! ```

    pub use crate::config::{FxkitConfig, SampleSettings, TemplateSettings};
    pub use crate::error::{Failure, FailureKind, ScaffoldError, ScaffoldResult};
    pub use crate::generator::{BotCodeGenerator, BotCodeInputs, BotLanguage};
    pub use crate::net::{HttpClient, HttpResponse, ReqwestClient, TransportError};
    pub use crate::observability::Verbosity;
    pub use crate::scaffold::{
        valid_sample_destination, ActionErrorHandler, PassthroughPolicy, SampleErrorPolicy,
        SampleRequest, ScaffoldAction, ScaffoldActionName, ScaffoldContext, ScaffoldOutcome,
        Scaffolder, TemplateErrorPolicy, TemplateRequest,
    };
    pub use crate::templates::{
        file_data_replace_fn, file_name_replace_fn, template_name, unzip, DataReplaceFn,
        NameReplaceFn, TemplateArchive, TemplateVars, UnzipOptions, ZipOrigin,
    };
}
