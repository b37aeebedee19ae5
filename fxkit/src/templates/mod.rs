//! Template resolution, download and extraction
//!
//! - [`TemplateFetcher`] resolves `<base_url>/<tag>/<name>.zip` from a tag list
//! - [`ZipRetriever`] downloads the archive or falls back to a bundled copy
//! - [`unzip`] writes the archive into a destination, rewriting as it goes

pub mod archive;
pub mod fetcher;
pub mod render;
pub mod retriever;
pub mod retry;
pub mod tags;
pub mod unpacker;

pub use archive::{ArchiveEntry, TemplateArchive};
pub use fetcher::{template_name, template_zip_name, TemplateFetcher};
pub use render::{
    file_data_replace_fn, file_name_replace_fn, DataReplaceFn, NameReplaceFn, TemplateRenderer,
    TemplateVars,
};
pub use retriever::{RetrievedZip, ZipOrigin, ZipRetriever};
pub use retry::RetryPolicy;
pub use tags::{select_tag, TagChannel};
pub use unpacker::{unzip, UnzipOptions};
