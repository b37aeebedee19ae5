//! Archive extraction into a destination directory
//!
//! Every non-directory entry is written under the destination, creating
//! parent directories as needed. Names and contents can be rewritten on the
//! way out, entries can be scoped to a sub-folder, and a small set of files
//! (ignore files) are appended to instead of overwritten when they already
//! exist. Nothing is rolled back on failure.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::archive::TemplateArchive;
use super::render::{DataReplaceFn, NameReplaceFn};
use crate::error::{ScaffoldError, ScaffoldResult};

/// Files merged into an existing copy rather than overwritten
pub const DEFAULT_APPEND_FILES: &[&str] = &[".gitignore"];

/// Separator inserted before appended content
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Separator inserted before appended content
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Extraction options
#[derive(Clone)]
pub struct UnzipOptions {
    /// Only keep entries under this prefix, and strip it from their names
    pub app_folder: Option<String>,
    /// Entry name rewrite
    pub name_replace: Option<NameReplaceFn>,
    /// Entry content rewrite
    pub data_replace: Option<DataReplaceFn>,
    /// Output names appended to when they already exist
    pub append_files: Vec<String>,
}

impl Default for UnzipOptions {
    fn default() -> Self {
        Self {
            app_folder: None,
            name_replace: None,
            data_replace: None,
            append_files: DEFAULT_APPEND_FILES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl std::fmt::Debug for UnzipOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnzipOptions")
            .field("app_folder", &self.app_folder)
            .field("name_replace", &self.name_replace.is_some())
            .field("data_replace", &self.data_replace.is_some())
            .field("append_files", &self.append_files)
            .finish()
    }
}

impl UnzipOptions {
    /// Scope extraction to a sub-folder prefix
    #[must_use]
    pub fn with_app_folder(mut self, prefix: impl Into<String>) -> Self {
        self.app_folder = Some(prefix.into());
        self
    }

    /// Set the name rewrite
    #[must_use]
    pub fn with_name_replace(mut self, f: NameReplaceFn) -> Self {
        self.name_replace = Some(f);
        self
    }

    /// Set the content rewrite
    #[must_use]
    pub fn with_data_replace(mut self, f: DataReplaceFn) -> Self {
        self.data_replace = Some(f);
        self
    }
}

/// Relative output path for an entry, rejecting anything that would
/// escape the destination
fn safe_relative_path(name: &str) -> Option<PathBuf> {
    let path = Path::new(name);
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Extract `archive` into `dst`
///
/// Returns the relative paths written, in archive order.
///
/// # Errors
///
/// Returns [`ScaffoldError::Unzip`] tagged with `dst` on any read, rewrite
/// or write failure. Entries written before the failure are left in place.
pub async fn unzip(
    archive: &mut TemplateArchive,
    dst: &Path,
    options: &UnzipOptions,
) -> ScaffoldResult<Vec<PathBuf>> {
    let fail = |reason: String| ScaffoldError::unzip(dst, reason);

    let entries = archive
        .file_entries_with_prefix(options.app_folder.as_deref())
        .map_err(|e| fail(e.to_string()))?;

    let mut written = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut entry_name = match &options.name_replace {
            Some(f) => f(&entry.name, &entry.data).map_err(|e| fail(e.to_string()))?,
            None => entry.name.clone(),
        };
        if let Some(prefix) = &options.app_folder {
            entry_name = entry_name.replacen(prefix.as_str(), "", 1);
        }
        let data = match &options.data_replace {
            Some(f) => f(&entry.name, &entry.data).map_err(|e| fail(e.to_string()))?,
            None => entry.data,
        };

        let Some(relative) = safe_relative_path(&entry_name) else {
            return Err(fail(format!("refusing to write entry `{entry_name}`")));
        };
        let file_path = dst.join(&relative);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| fail(format!("{}: {e}", parent.display())))?;
        }

        let append = should_append(options, &entry_name, &file_path)
            .await
            .map_err(|e| fail(format!("{}: {e}", file_path.display())))?;
        if append {
            tracing::debug!(file = %relative.display(), "appending to existing file");
            append_file(&file_path, &data)
                .await
                .map_err(|e| fail(format!("{}: {e}", file_path.display())))?;
        } else {
            fs::write(&file_path, &data)
                .await
                .map_err(|e| fail(format!("{}: {e}", file_path.display())))?;
        }
        written.push(relative);
    }

    tracing::debug!(dst = %dst.display(), files = written.len(), "unzipped archive");
    Ok(written)
}

/// Append-list files are appended to only when already on disk
async fn should_append(options: &UnzipOptions, entry_name: &str, path: &Path) -> std::io::Result<bool> {
    if options.append_files.iter().any(|f| f == entry_name) {
        fs::try_exists(path).await
    } else {
        Ok(false)
    }
}

async fn append_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new().append(true).open(path).await?;
    file.write_all(LINE_ENDING.as_bytes()).await?;
    file.write_all(data).await?;
    file.flush().await
}
